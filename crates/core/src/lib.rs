//! Dropcraft Core
//!
//! Shared value types for the distribution toolkit: the 20-byte claimant
//! `Address` (raw bytes internally, EIP-55 checksummed at text boundaries)
//! and the 256-bit token `Amount`. Everything downstream consumes these
//! types, so malformed input cannot travel past the parsing boundary.

pub mod address;
pub mod amount;

pub use address::{Address, AddressError};
pub use amount::{Amount, AmountError};
