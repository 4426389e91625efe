pub mod zp;

pub use zp::{ZpElement, ZpGroup};
