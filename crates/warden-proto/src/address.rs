//! On-chain account addresses
//!
//! 20-byte addresses parsed case-insensitively and rendered as
//! `0x`-prefixed lowercase hex. The relay routes by holder address
//! after the same normalization, so two spellings of one address always
//! compare equal here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::{decode_0x_fixed, encode_0x};
use crate::error::ProtoError;

/// Size of an address in bytes
pub const ADDRESS_SIZE: usize = 20;

/// A 20-byte on-chain account address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Wrap raw address bytes.
    pub fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Normalized `0x`-prefixed lowercase hex form.
    pub fn to_hex(&self) -> String {
        encode_0x(&self.0)
    }
}

impl FromStr for Address {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_0x_fixed::<ADDRESS_SIZE>(s).map(Self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MIXED: &str = "0xAbCdEf0123456789aBcDeF0123456789abcdef01";

    #[test]
    fn parse_normalizes_case() {
        let addr: Address = MIXED.parse().unwrap();
        assert_eq!(addr.to_hex(), MIXED.to_lowercase());
    }

    #[test]
    fn spellings_compare_equal_after_parsing() {
        let upper: Address = MIXED.parse().unwrap();
        let lower: Address = MIXED.to_lowercase().parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn rejects_wrong_width() {
        let result = "0x1234".parse::<Address>();
        assert!(matches!(result, Err(ProtoError::InvalidLength { expected: 20, actual: 2 })));
    }

    #[test]
    fn serde_uses_hex_string_form() {
        let addr: Address = MIXED.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", MIXED.to_lowercase()));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
