#![allow(clippy::len_without_is_empty)]

pub use stark101_field as field;

pub mod fri;
pub mod hash;
pub mod iop;
pub mod util;
