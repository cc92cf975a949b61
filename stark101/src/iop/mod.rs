//! Fiat-Shamir plumbing shared by the prover stages.
pub mod transcript;
