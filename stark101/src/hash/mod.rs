//! SHA-256 hashing and the Merkle commitment built on it.

pub mod hashing;
pub mod merkle_proofs;
pub mod merkle_tree;
