//! Distribution manifest: the persisted output of a build.
//!
//! Wire format (what gets written to disk and read back by tooling):
//!
//! ```json
//! {
//!   "merkleRoot": "0x<64 hex>",
//!   "tokenTotal": "<decimal>",
//!   "claims": {
//!     "<checksummed address>": {
//!       "index": 0,
//!       "amount": "<decimal>",
//!       "proof": ["0x<64 hex>", "..."]
//!     }
//!   }
//! }
//! ```
//!
//! The manifest is a value object: it carries no reference back to the tree
//! it was built from, and the tree can be discarded once it exists.

use std::collections::{BTreeMap, HashSet};

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use dropcraft_core::{Address, Amount};
use dropcraft_merkle::{encode_leaf, verify_proof};

use crate::DistributorError;

/// One claimant's entry: claim index, amount, and inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub index: u32,
    pub amount: Amount,
    #[serde(with = "hex_digest_vec")]
    pub proof: Vec<[u8; 32]>,
}

/// Complete distribution manifest for one claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionManifest {
    #[serde(with = "hex_digest")]
    pub merkle_root: [u8; 32],
    /// Exact sum of all claim amounts. May exceed 2^256.
    #[serde(with = "decimal_string")]
    pub token_total: BigUint,
    /// Claims keyed by checksummed address, ascending.
    pub claims: BTreeMap<String, Claim>,
}

impl DistributionManifest {
    /// Re-derive every leaf and check the whole manifest against its root.
    ///
    /// Checks each claim's proof, claim-index uniqueness, and that the claim
    /// amounts sum to `token_total`. This is what `dropcraft verify` runs
    /// before a root is trusted enough to go on-chain.
    pub fn verify(&self) -> Result<(), DistributorError> {
        let mut seen_indices = HashSet::with_capacity(self.claims.len());
        let mut total = BigUint::zero();

        for (account, claim) in &self.claims {
            let address = Address::parse(account)?;
            let leaf = encode_leaf(&address, &claim.amount);
            if !verify_proof(&leaf, &claim.proof, &self.merkle_root) {
                return Err(DistributorError::ClaimProofInvalid(account.clone()));
            }
            if !seen_indices.insert(claim.index) {
                return Err(DistributorError::DuplicateIndex(claim.index));
            }
            total += claim.amount.as_biguint();
        }

        if total != self.token_total {
            return Err(DistributorError::TotalMismatch {
                expected: self.token_total.to_string(),
                actual: total.to_string(),
            });
        }

        Ok(())
    }
}

fn decode_digest(s: &str) -> Result<[u8; 32], String> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| format!("digest missing 0x prefix: {s:?}"))?;
    let mut out = [0u8; 32];
    hex::decode_to_slice(digits, &mut out).map_err(|e| format!("bad digest {s:?}: {e}"))?;
    Ok(out)
}

mod hex_digest {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(digest: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(digest)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode_digest(&s).map_err(serde::de::Error::custom)
    }
}

mod hex_digest_vec {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        digests: &[[u8; 32]],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(digests.iter().map(|d| format!("0x{}", hex::encode(d))))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<[u8; 32]>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| super::decode_digest(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

mod decimal_string {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| serde::de::Error::custom(format!("unparseable total: {s:?}")))
    }
}
