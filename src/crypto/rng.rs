//! Cryptographically secure random number generation.

use rand_core::{CryptoRng, OsRng, RngCore};

/// The crate's default sampler: a stateless handle that draws every value
/// from the operating system's entropy source.
///
/// Every protocol role takes its sampler by value, so tests can substitute
/// a deterministic generator; production code passes `SecureRng`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng;

impl SecureRng {
    /// Creates the handle. Holds no state; each call reaches `OsRng`.
    pub fn new() -> Self {
        SecureRng
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        OsRng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        OsRng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        OsRng.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}
