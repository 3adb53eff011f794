//! Binary Merkle tree over distribution leaves.
//!
//! Internal nodes use the sorted-pair rule: the two child digests are
//! concatenated in ascending byte order before hashing, so a verifier can
//! fold a proof without knowing which side each node was on. A level with
//! an odd node count pairs its last node with itself.

use sha3::{Digest, Keccak256};

/// Errors from tree construction and proof queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MerkleError {
    #[error("cannot build a tree from zero leaves")]
    EmptyInput,

    #[error("leaf {0} is not part of this tree")]
    LeafNotFound(String),

    #[error("proof replay for leaf {0} did not recompute the root")]
    ProofMismatch(String),
}

/// Combine two sibling digests into their parent.
///
/// The lesser digest (big-endian numeric order, which is byte order for
/// fixed 32-byte values) goes first, so the result is independent of which
/// child was left and which was right.
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let hash = Keccak256::new()
        .chain_update(first)
        .chain_update(second)
        .finalize();
    hash.into()
}

/// Fold `proof` over `leaf` with the sorted-pair rule and compare the result
/// to `expected_root`.
///
/// A plain predicate: any mismatch is `false`, never an error, mirroring the
/// resource-constrained on-chain verifier this models.
pub fn verify_proof(leaf: &[u8; 32], proof: &[[u8; 32]], expected_root: &[u8; 32]) -> bool {
    let mut hash = *leaf;
    for sibling in proof {
        hash = hash_pair(&hash, sibling);
    }
    hash == *expected_root
}

/// A binary Merkle tree, immutable after construction.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// All nodes stored level by level, bottom-up. `layers[0]` = leaves.
    layers: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build a tree from ordered leaf digests.
    ///
    /// The leaf order is significant: it fixes every proof path. Each level
    /// is paired left to right; an odd trailing node is paired with itself.
    pub fn from_leaves(leaves: Vec<[u8; 32]>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let mut layers = vec![leaves];
        while layers.last().unwrap().len() > 1 {
            let prev = layers.last().unwrap();
            let mut next = Vec::with_capacity((prev.len() + 1) / 2);
            for pair in prev.chunks(2) {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                next.push(hash_pair(left, right));
            }
            layers.push(next);
        }

        Ok(Self { layers })
    }

    /// The Merkle root. For a single-leaf tree this is the leaf itself.
    pub fn root(&self) -> [u8; 32] {
        *self.layers.last().unwrap().first().unwrap()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Number of levels above the leaves (== proof length for every leaf).
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Ordered sibling path for a leaf digest, leaf level to root.
    ///
    /// Where a node was duplicated to fill an odd level, the recorded
    /// sibling is the node itself.
    pub fn proof(&self, leaf: &[u8; 32]) -> Result<Vec<[u8; 32]>, MerkleError> {
        let mut idx = self.position(leaf)?;

        let mut siblings = Vec::with_capacity(self.depth());
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling_idx = if idx % 2 == 0 {
                // an odd trailing node is its own sibling
                if idx + 1 < layer.len() {
                    idx + 1
                } else {
                    idx
                }
            } else {
                idx - 1
            };
            siblings.push(layer[sibling_idx]);
            idx /= 2;
        }

        Ok(siblings)
    }

    /// Recover the claim index the on-chain verifier assigns while replaying
    /// this leaf's proof.
    ///
    /// The verifier tracks claims positionally, and its position falls out
    /// of the sorted-pair comparisons: at each level the index doubles, and
    /// gains 1 only when the running hash is strictly greater than the
    /// sibling. An equal pair (possible only through odd-node duplication)
    /// counts as not-greater. The leaf-level comparison lands in the
    /// most-significant bit.
    pub fn recover_index(&self, leaf: &[u8; 32]) -> Result<u32, MerkleError> {
        let proof = self.proof(leaf)?;

        let mut index: u32 = 0;
        let mut hash = *leaf;
        for sibling in &proof {
            index *= 2;
            if hash > *sibling {
                index += 1;
            }
            hash = hash_pair(&hash, sibling);
        }

        // A mismatch here means the builder and encoder disagree. Fatal.
        if hash != self.root() {
            return Err(MerkleError::ProofMismatch(hex::encode(leaf)));
        }

        Ok(index)
    }

    fn position(&self, leaf: &[u8; 32]) -> Result<usize, MerkleError> {
        self.layers[0]
            .iter()
            .position(|l| l == leaf)
            .ok_or_else(|| MerkleError::LeafNotFound(hex::encode(leaf)))
    }
}
