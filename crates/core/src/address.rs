//! Canonical claimant address type.
//!
//! An address is exactly 20 bytes, stored raw. Text rendering uses the
//! EIP-55 mixed-case checksum form, which is also the canonical key for
//! deduplication and claim ordering. Hash inputs always use the raw bytes,
//! never the textual form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

/// Errors from parsing an address string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid address: {0}")]
    Invalid(String),

    #[error("bad address checksum: {0}")]
    BadChecksum(String),
}

/// A 20-byte claimant address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Construct from a 20-byte array (canonical form).
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Borrow the underlying 20-byte slice.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse an address string.
    ///
    /// Accepts 40 hex characters with an optional `0x` prefix. All-lowercase
    /// and all-uppercase digits are accepted as-is; a mixed-case input must
    /// carry a valid EIP-55 checksum.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AddressError::Invalid(s.to_string()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AddressError::Invalid(s.to_string()))?;
        let address = Address(bytes);

        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        if has_upper && has_lower && address.to_checksum()[2..] != *digits {
            return Err(AddressError::BadChecksum(s.to_string()));
        }

        Ok(address)
    }

    /// Render the canonical EIP-55 checksummed form (`0x`-prefixed).
    ///
    /// A hex letter is uppercased when the corresponding nibble of
    /// `keccak256(lowercase_hex_ascii)` is 8 or above.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Checksummed forms from the EIP-55 test vectors.
    const CHECKSUMMED: &[&str] = &[
        "0x52908400098527886E0F7030069857D2E4169EE7",
        "0x8617E340B3D01FA5F11F306F4090FD50E238070D",
        "0xde709f2102306220921060314715629080e2fb77",
        "0x27b1fdb04752bbc536007a920d24acb045561c26",
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_checksum_vectors() {
        for expected in CHECKSUMMED {
            let parsed = Address::parse(&expected.to_lowercase()).unwrap();
            assert_eq!(parsed.to_checksum(), *expected);
        }
    }

    #[test]
    fn test_parse_checksummed() {
        for expected in CHECKSUMMED {
            let parsed = Address::parse(expected).unwrap();
            assert_eq!(parsed.to_checksum(), *expected);
        }
    }

    #[test]
    fn test_parse_lowercase_and_uppercase() {
        let canonical = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let lower = canonical.to_lowercase();
        let upper = format!("0x{}", canonical[2..].to_uppercase());

        assert_eq!(Address::parse(&lower).unwrap().to_checksum(), canonical);
        assert_eq!(Address::parse(&upper).unwrap().to_checksum(), canonical);
    }

    #[test]
    fn test_parse_without_prefix() {
        let canonical = "0x27b1fdb04752bbc536007a920d24acb045561c26";
        let parsed = Address::parse(&canonical[2..]).unwrap();
        assert_eq!(parsed.to_checksum(), canonical);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // Valid checksum with one letter's case flipped
        let bad = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD";
        assert!(matches!(
            Address::parse(bad),
            Err(AddressError::BadChecksum(_))
        ));
    }

    #[test]
    fn test_malformed_rejected() {
        for input in ["0xBAD", "", "0x", "nothexnothexnothexnothexnothexnothexnoth"] {
            assert!(matches!(
                Address::parse(input),
                Err(AddressError::Invalid(_))
            ));
        }
        // 41 hex digits
        assert!(Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed0").is_err());
    }

    #[test]
    fn test_raw_bytes_roundtrip() {
        let address = Address::parse("0xde709f2102306220921060314715629080e2fb77").unwrap();
        assert_eq!(Address::from_bytes(*address.as_bytes()), address);
    }

    #[test]
    fn test_serde_uses_checksum_form() {
        let address = Address::parse("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359\"");

        let restored: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, address);
    }
}
