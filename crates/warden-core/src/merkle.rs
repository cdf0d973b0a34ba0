//! Salted Merkle trees over Keccak-256
//!
//! One tree shape serves both uses in the system: credential claim
//! leaves (selective disclosure) and guardian commitment leaves (the
//! policy root). Interior nodes are `keccak256(left || right)`; a level
//! with an odd node count duplicates its last node as its own right
//! sibling. The empty tree has the fixed sentinel root
//! `keccak256("empty")`.
//!
//! Proof verification is pure recomputation: fold the leaf through the
//! sibling path and compare against the anchored root. A verifier needs
//! nothing but the leaf preimage, the path, and the root.

use serde::{Deserialize, Serialize};
use warden_crypto::hash::{HASH_SIZE, keccak256, keccak256_concat};

use crate::error::CoreError;

/// A 32-byte tree node or leaf value.
pub type Hash = [u8; HASH_SIZE];

/// Root of the tree with no leaves: `keccak256("empty")`.
pub fn empty_root() -> Hash {
    keccak256(b"empty")
}

/// Which side of the running node a proof sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Sibling is hashed on the left of the running node
    Left,
    /// Sibling is hashed on the right of the running node
    Right,
}

/// One step of a Merkle proof path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sibling {
    /// The sibling node value
    pub hash: Hash,
    /// Side the sibling is hashed on
    pub position: Position,
}

/// Path from a leaf to the root, bottom-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Sibling steps, leaf level first
    pub siblings: Vec<Sibling>,
}

/// Compute the root over `leaves` in the given order.
///
/// Leaf order is part of the committed value: permuting the list
/// changes the root. A single leaf is its own root.
pub fn build_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return empty_root();
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Build the proof path for the leaf at `index`.
///
/// # Errors
///
/// - `LeafIndexOutOfRange`: `index` is not a position in `leaves`
pub fn build_proof(leaves: &[Hash], index: usize) -> Result<MerkleProof, CoreError> {
    if index >= leaves.len() {
        return Err(CoreError::LeafIndexOutOfRange { index, leaf_count: leaves.len() });
    }

    let mut siblings = Vec::new();
    let mut level = leaves.to_vec();
    let mut idx = index;
    while level.len() > 1 {
        let step = if idx % 2 == 1 {
            Sibling { hash: level[idx - 1], position: Position::Left }
        } else {
            // Odd level end: the node is its own right sibling.
            let sibling = level.get(idx + 1).copied().unwrap_or(level[idx]);
            Sibling { hash: sibling, position: Position::Right }
        };
        siblings.push(step);

        level = next_level(&level);
        idx /= 2;
    }

    Ok(MerkleProof { siblings })
}

/// Check that `leaf` folds through `proof` to `root`.
pub fn verify(leaf: &Hash, proof: &MerkleProof, root: &Hash) -> bool {
    let mut node = *leaf;
    for step in &proof.siblings {
        node = match step.position {
            Position::Left => keccak256_concat(&[&step.hash, &node]),
            Position::Right => keccak256_concat(&[&node, &step.hash]),
        };
    }
    node == *root
}

/// Hash one level into its parent level, duplicating a trailing odd
/// node.
fn next_level(level: &[Hash]) -> Vec<Hash> {
    let mut next = Vec::with_capacity(level.len().div_ceil(2));
    for pair in level.chunks(2) {
        let left = pair[0];
        let right = pair.get(1).copied().unwrap_or(left);
        next.push(keccak256_concat(&[&left, &right]));
    }
    next
}
