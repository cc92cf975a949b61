//! A minimal STARK proving that the quadratic recurrence `a_i = a_{i-1}^2 + a_{i-2}^2`, started
//! from `1, seed`, reaches a claimed value. The proof is a labelled Fiat-Shamir transcript built
//! from Merkle commitments and the FRI low-degree test of the [`stark101`] crate.

#![allow(clippy::len_without_is_empty)]

pub mod config;
pub mod constraints;
pub mod error;
pub mod proof;
pub mod prover;
pub mod trace;

pub use config::StarkConfig;
pub use error::ProofError;
pub use proof::StarkProof;
pub use prover::{prove, prove_default};
