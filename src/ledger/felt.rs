//! Fixed-width integers used on the ledger boundary.
//!
//! Addresses, transaction hashes and raw calldata words are field elements
//! (`Felt`), bounded by the Stark prime. Balances, fees and token ids are
//! Cairo `u256` values, which travel as two felts (low and high 128 bits).

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[allow(
    clippy::assign_op_pattern,
    clippy::ptr_offset_with_cast,
    clippy::manual_range_contains,
    clippy::range_plus_one,
    clippy::transmute_ptr_to_ptr,
    clippy::reversed_empty_ranges,
    clippy::manual_div_ceil
)]
mod macro_code {
    use uint::construct_uint;

    construct_uint! {
        pub struct U256(4);
    }
}

pub use macro_code::U256;

/// 2^251 + 17 * 2^192 + 1
const STARK_PRIME: U256 = U256([1, 0, 0, 0x0800_0000_0000_0011]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeltParseError {
    #[error("empty value")]
    Empty,
    #[error("invalid hex value '{0}'")]
    InvalidHex(String),
    #[error("invalid decimal value '{0}'")]
    InvalidDecimal(String),
    #[error("value '{0}' is not a valid field element")]
    OutOfField(String),
    #[error("u256 limb '{0}' does not fit in 128 bits")]
    LimbOverflow(Felt),
}

/// Parses `0x`-prefixed hex or plain decimal text into a 256-bit integer.
pub fn parse_u256(text: &str) -> Result<U256, FeltParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FeltParseError::Empty);
    }

    let hex_digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"));

    match hex_digits {
        Some("") => Err(FeltParseError::InvalidHex(text.to_string())),
        Some(digits) => {
            if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(FeltParseError::InvalidHex(text.to_string()));
            }
            // Leading zeros would otherwise count against the 64 digit limit.
            let significant = digits.trim_start_matches('0');
            if significant.is_empty() {
                return Ok(U256::zero());
            }
            U256::from_str(significant).map_err(|_| FeltParseError::InvalidHex(text.to_string()))
        }
        None => {
            if !text.chars().all(|c| c.is_ascii_digit()) {
                return Err(FeltParseError::InvalidDecimal(text.to_string()));
            }
            U256::from_dec_str(text).map_err(|_| FeltParseError::InvalidDecimal(text.to_string()))
        }
    }
}

/// Splits a Cairo `u256` into its `(low, high)` calldata words.
pub fn u256_to_felts(value: U256) -> [Felt; 2] {
    let low = value.low_u128();
    let high = (value >> 128).low_u128();
    [Felt::from(low), Felt::from(high)]
}

/// Reassembles a Cairo `u256` from its `(low, high)` words.
pub fn u256_from_felts(low: Felt, high: Felt) -> Result<U256, FeltParseError> {
    let limb_max = U256::from(u128::MAX);
    for limb in [low, high] {
        if limb.0 > limb_max {
            return Err(FeltParseError::LimbOverflow(limb));
        }
    }
    Ok((high.0 << 128) | low.0)
}

/// A Starknet field element.
///
/// Equality is numeric, so `0x01` and `0x1` are the same address.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Felt(U256);

impl Felt {
    pub const ZERO: Felt = Felt(U256([0, 0, 0, 0]));

    /// Builds a felt from little-endian 64-bit limbs. Callers must stay below
    /// the Stark prime; used for compiled-in constants.
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Felt(U256(limbs))
    }

    pub fn from_u256(value: U256) -> Result<Self, FeltParseError> {
        if value >= STARK_PRIME {
            return Err(FeltParseError::OutOfField(format!("{value:#x}")));
        }
        Ok(Felt(value))
    }

    pub fn to_u256(self) -> U256 {
        self.0
    }

    pub fn from_bytes_be(bytes: &[u8; 32]) -> Result<Self, FeltParseError> {
        Self::from_u256(U256::from_big_endian(bytes))
    }

    pub fn to_bytes_be(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.0.to_big_endian(&mut bytes);
        bytes
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u128> for Felt {
    fn from(value: u128) -> Self {
        Felt(U256::from(value))
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Felt(U256::from(value))
    }
}

impl TryFrom<U256> for Felt {
    type Error = FeltParseError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        Felt::from_u256(value)
    }
}

impl FromStr for Felt {
    type Err = FeltParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = parse_u256(s)?;
        if value >= STARK_PRIME {
            return Err(FeltParseError::OutOfField(s.trim().to_string()));
        }
        Ok(Felt(value))
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Felt({:#x})", self.0)
    }
}

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
