//! Dropcraft Merkle
//!
//! Sorted-pair keccak-256 Merkle tree for token distributions.
//!
//! The `MerkleTree` is built once over the ordered claim leaves and hands
//! out the root, per-leaf inclusion proofs, and the claim index the
//! on-chain verifier assigns during proof replay. `verify_proof` is the
//! off-chain mirror of that verifier: a plain boolean fold over the proof.

pub mod leaf;
pub mod tree;

pub use leaf::encode_leaf;
pub use tree::{hash_pair, verify_proof, MerkleError, MerkleTree};
