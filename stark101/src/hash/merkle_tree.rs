use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::field::FieldElement;
use crate::hash::hashing::{hash_leaf, two_to_one};
use crate::hash::merkle_proofs::MerkleProof;

/// A node of the tree. Internal nodes record the positions of their children in the level below,
/// so the tree is an arena indexed by `(level, position)`.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct MerkleNode {
    pub hash: String,
    /// `(left, right)` positions in the previous level, or `None` for a leaf. An unpaired node is
    /// its own right child.
    pub children: Option<(usize, usize)>,
}

#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// The committed values, unpadded.
    pub leaves: Vec<FieldElement>,

    /// `levels[0]` holds the leaf digests, padded to even length by repeating the last one.
    /// Each following level halves the previous, rounding up, and the last level is the root.
    pub levels: Vec<Vec<MerkleNode>>,
}

impl MerkleTree {
    pub fn new(leaves: Vec<FieldElement>) -> Self {
        assert!(!leaves.is_empty(), "Cannot commit to an empty vector");

        let mut bottom = leaves
            .iter()
            .map(|leaf| MerkleNode {
                hash: hash_leaf(leaf),
                children: None,
            })
            .collect_vec();
        if bottom.len() % 2 == 1 {
            let last = bottom[bottom.len() - 1].clone();
            bottom.push(last);
        }

        let mut levels = vec![bottom];
        while levels[levels.len() - 1].len() > 1 {
            let level = &levels[levels.len() - 1];
            let next = (0..level.len())
                .step_by(2)
                .map(|left| {
                    let right = if left + 1 < level.len() { left + 1 } else { left };
                    MerkleNode {
                        hash: two_to_one(&level[left].hash, &level[right].hash),
                        children: Some((left, right)),
                    }
                })
                .collect_vec();
            levels.push(next);
        }

        Self { leaves, levels }
    }

    pub fn root(&self) -> &str {
        &self.levels[self.levels.len() - 1][0].hash
    }

    pub fn get(&self, i: usize) -> &FieldElement {
        &self.leaves[i]
    }

    pub fn leaves_len(&self) -> usize {
        self.leaves.len()
    }

    /// Number of levels above the leaves, which is also the length of every proof.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    /// Create a Merkle proof from a leaf index. The padding leaf of an odd-length tree has a path
    /// too, which authenticates the last value.
    pub fn prove(&self, leaf_index: usize) -> MerkleProof {
        let padded_len = self.levels[0].len();
        assert!(
            leaf_index < padded_len,
            "Leaf index {leaf_index} out of range for a tree of {padded_len} padded leaves"
        );

        let mut index = leaf_index;
        let siblings = self.levels[..self.height()]
            .iter()
            .map(|level| {
                let sibling = index ^ 1;
                // The last node of an odd level was hashed with itself.
                let sibling = if sibling < level.len() { sibling } else { index };
                index >>= 1;
                level[sibling].hash.clone()
            })
            .collect();
        MerkleProof { siblings }
    }
}
