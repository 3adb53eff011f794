//! Dropcraft Distributor
//!
//! Turns a raw address → amount balance map into a distribution manifest:
//! Merkle root, per-claimant inclusion proof and claim index, and the token
//! total. The manifest is the source of truth the on-chain claim contract
//! is seeded with; this crate never performs I/O itself.
//!
//! Validation is all-or-nothing. A manifest that silently skipped an entry
//! would exclude a claimant forever, so the first invalid entry aborts the
//! whole build.

pub mod manifest;

pub use manifest::{Claim, DistributionManifest};

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::Value;
use tracing::{debug, info};

use dropcraft_core::{Address, AddressError, Amount};
use dropcraft_merkle::{encode_leaf, MerkleError, MerkleTree};

/// Errors from balance-map validation and manifest verification.
#[derive(Debug, thiserror::Error)]
pub enum DistributorError {
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    #[error("duplicate address: {0}")]
    DuplicateAddress(String),

    #[error("amount for {0} must be a string")]
    AmountNotString(String),

    #[error("invalid amount for {account}: {reason}")]
    InvalidAmount { account: String, reason: String },

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error("proof for {0} does not verify against the manifest root")]
    ClaimProofInvalid(String),

    #[error("claim index {0} appears more than once")]
    DuplicateIndex(u32),

    #[error("claim amounts sum to {actual}, manifest total is {expected}")]
    TotalMismatch { expected: String, actual: String },
}

/// Parse and validate a raw balance map into a distribution manifest.
///
/// Per entry, in order: the key must be a syntactically valid address, two
/// keys must not canonicalize to the same address, the amount must arrive
/// as a JSON string (a native number has already lost precision), and it
/// must parse to a strictly positive integer below 2^256.
///
/// Claimants are ordered ascending by canonical checksummed form before the
/// tree is built, so the output is independent of input iteration order.
pub fn parse_balance_map(
    balances: &serde_json::Map<String, Value>,
) -> Result<DistributionManifest, DistributorError> {
    let mut entries: BTreeMap<String, (Address, Amount)> = BTreeMap::new();
    for (key, value) in balances {
        let address = Address::parse(key)?;
        let canonical = address.to_checksum();
        if entries.contains_key(&canonical) {
            return Err(DistributorError::DuplicateAddress(canonical));
        }

        let raw = match value {
            Value::String(s) => s,
            _ => return Err(DistributorError::AmountNotString(canonical)),
        };
        let amount = Amount::from_decimal(raw).map_err(|e| DistributorError::InvalidAmount {
            account: canonical.clone(),
            reason: e.to_string(),
        })?;
        if amount.is_zero() {
            return Err(DistributorError::InvalidAmount {
                account: canonical.clone(),
                reason: "amount must be positive".to_string(),
            });
        }

        entries.insert(canonical, (address, amount));
    }

    let leaves: Vec<[u8; 32]> = entries
        .values()
        .map(|(address, amount)| encode_leaf(address, amount))
        .collect();
    let tree = MerkleTree::from_leaves(leaves.clone())?;

    let mut claims = BTreeMap::new();
    let mut total = BigUint::zero();
    for ((canonical, (_, amount)), leaf) in entries.iter().zip(&leaves) {
        let proof = tree.proof(leaf)?;
        let index = tree.recover_index(leaf)?;
        debug!("Claim ready for {}: index {}", canonical, index);

        total += amount.as_biguint();
        claims.insert(
            canonical.clone(),
            Claim {
                index,
                amount: amount.clone(),
                proof,
            },
        );
    }

    info!(
        "Built distribution manifest: {} claimants, root 0x{}",
        claims.len(),
        hex::encode(tree.root()),
    );

    Ok(DistributionManifest {
        merkle_root: tree.root(),
        token_total: total,
        claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(pairs: &[(&str, Value)]) -> serde_json::Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    const ADDR_A: &str = "0x1111111111111111111111111111111111111111";
    const ADDR_B: &str = "0x2222222222222222222222222222222222222222";

    #[test]
    fn test_invalid_address_rejected() {
        let map = balances(&[("0xBAD", Value::String("100".into()))]);
        assert!(matches!(
            parse_balance_map(&map),
            Err(DistributorError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_duplicate_address_rejected() {
        // Same address in different cases canonicalizes to one claimant
        let lower = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";
        let upper = format!("0x{}", &lower[2..].to_uppercase());
        let map = balances(&[
            (lower, Value::String("100".into())),
            (upper.as_str(), Value::String("200".into())),
        ]);
        assert!(matches!(
            parse_balance_map(&map),
            Err(DistributorError::DuplicateAddress(_))
        ));
    }

    #[test]
    fn test_native_number_rejected() {
        let map = balances(&[(ADDR_A, Value::from(100u64))]);
        assert!(matches!(
            parse_balance_map(&map),
            Err(DistributorError::AmountNotString(_))
        ));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let map = balances(&[(ADDR_A, Value::String("0".into()))]);
        assert!(matches!(
            parse_balance_map(&map),
            Err(DistributorError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_unparseable_amount_rejected() {
        for bad in ["", "-5", "1e18", "ten"] {
            let map = balances(&[(ADDR_A, Value::String(bad.into()))]);
            assert!(matches!(
                parse_balance_map(&map),
                Err(DistributorError::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn test_empty_map_rejected() {
        let map = serde_json::Map::new();
        assert!(matches!(
            parse_balance_map(&map),
            Err(DistributorError::Merkle(MerkleError::EmptyInput))
        ));
    }

    #[test]
    fn test_two_claimants() {
        let map = balances(&[
            (ADDR_A, Value::String("100".into())),
            (ADDR_B, Value::String("200".into())),
        ]);
        let manifest = parse_balance_map(&map).unwrap();

        assert_eq!(manifest.claims.len(), 2);
        assert_eq!(manifest.token_total, BigUint::from(300u32));

        let canonical_a = Address::parse(ADDR_A).unwrap().to_checksum();
        let claim = &manifest.claims[&canonical_a];
        assert_eq!(claim.amount, Amount::from(100u64));
        assert_eq!(claim.proof.len(), 1);
    }

    #[test]
    fn test_validation_aborts_whole_build() {
        // One bad entry poisons the map, no partial manifest
        let map = balances(&[
            (ADDR_A, Value::String("100".into())),
            (ADDR_B, Value::String("0".into())),
        ]);
        assert!(parse_balance_map(&map).is_err());
    }
}
