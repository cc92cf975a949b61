#![allow(clippy::len_without_is_empty)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::return_self_not_must_use)]

pub mod error;
pub mod interpolation;
pub mod polynomial;
pub mod types;

pub use error::FieldError;
pub use types::{FieldElement, PrimeField};
