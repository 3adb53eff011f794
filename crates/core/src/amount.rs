//! 256-bit token amount.
//!
//! Amounts arrive as decimal strings (a native JSON number would already
//! have lost precision) and must fit the verifier's uint256. Sums of
//! amounts are taken over plain `BigUint`s and are not bounded.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors from parsing an amount string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("unparseable amount: {0:?}")]
    Unparseable(String),

    #[error("amount does not fit in 256 bits: {0}")]
    Overflow(String),
}

/// A non-negative token amount below 2^256.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    /// Parse a decimal-digit string. Zero is accepted here; rejecting zero
    /// claims is the balance-map parser's job.
    pub fn from_decimal(s: &str) -> Result<Self, AmountError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Unparseable(s.to_string()));
        }
        let value = BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| AmountError::Unparseable(s.to_string()))?;
        if value.bits() > 256 {
            return Err(AmountError::Overflow(s.to_string()));
        }
        Ok(Amount(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Big-endian 32-byte uint256 encoding (left padded), the exact byte
    /// layout the leaf hash consumes.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_decimal(s)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(BigUint::from(value))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Amount::from_decimal(&s).map_err(serde::de::Error::custom)
    }
}
