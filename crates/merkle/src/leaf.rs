//! Distribution leaf encoding.
//!
//! Leaf formula: `keccak256(address || amount)`, with the raw 20 address
//! bytes followed by the 32-byte big-endian uint256 amount. A tight 52-byte
//! concatenation, no length prefixes. This MUST match the on-chain claim
//! verifier, which recomputes the leaf from
//! `keccak256(abi.encodePacked(account, amount))`.

use sha3::{Digest, Keccak256};

use dropcraft_core::{Address, Amount};

/// Compute the leaf digest for one (address, amount) claim entry.
pub fn encode_leaf(address: &Address, amount: &Amount) -> [u8; 32] {
    let hash = Keccak256::new()
        .chain_update(address.as_bytes())
        .chain_update(amount.to_be_bytes())
        .finalize();
    hash.into()
}
