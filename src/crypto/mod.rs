/// Dlog group trait and operations.
pub mod group;
/// Cryptographically secure random number generation.
pub mod rng;

pub use group::DlogGroup;
pub use rng::SecureRng;
