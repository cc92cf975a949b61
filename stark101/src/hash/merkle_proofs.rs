use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::field::FieldElement;
use crate::hash::hashing::{hash_leaf, two_to_one};

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct MerkleProof {
    /// The Merkle digest of each sibling subtree, staying from the bottommost layer.
    pub siblings: Vec<String>,
}

impl MerkleProof {
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The path as it enters the transcript: space-separated digests, leaf side first.
    pub fn to_transcript_string(&self) -> String {
        self.siblings.join(" ")
    }

    /// Same as `to_transcript_string`, but root side first.
    pub fn to_transcript_string_root_first(&self) -> String {
        self.siblings
            .iter()
            .rev()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Verifies that the given leaf is present at the given index in the Merkle tree with the given
/// root.
pub fn verify_merkle_proof(
    leaf: &FieldElement,
    leaf_index: usize,
    merkle_root: &str,
    proof: &MerkleProof,
) -> Result<()> {
    let mut index = leaf_index;
    let mut current_digest = hash_leaf(leaf);
    for sibling_digest in &proof.siblings {
        let bit = index & 1;
        index >>= 1;
        current_digest = if bit == 1 {
            two_to_one(sibling_digest, &current_digest)
        } else {
            two_to_one(&current_digest, sibling_digest)
        }
    }
    ensure!(current_digest == merkle_root, "Invalid Merkle proof.");

    Ok(())
}
