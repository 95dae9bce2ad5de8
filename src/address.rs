//! Account addresses
//!
//! An address is the last 20 bytes of the Keccak-256 digest of the
//! 64-byte public key body (the uncompressed key without its `0x04` tag).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::crypto::{keccak256, strip_curve_prefix, to_checksum_address, uncompressed_public_key};

/// Length of the textual form, `0x` included.
pub const ADDRESS_STRING_LEN: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// 20-byte account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case rendering
    pub fn to_checksum(&self) -> String {
        to_checksum_address(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parses any string accepted by [`validate`]. Casing is not checked.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !validate(s) {
            return Err(AddressError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(&s[2..], &mut bytes)
            .map_err(|e| AddressError::InvalidAddress(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Derive the address of a secp256k1 public key.
///
/// Accepts the 65-byte uncompressed form (`0x04 || X || Y`) or a 33-byte
/// compressed key, which is decompressed first.
pub fn derive_address(public_key: &[u8]) -> Result<Address, AddressError> {
    let full = uncompressed_public_key(public_key)
        .map_err(|e| AddressError::InvalidPublicKey(format!("{} bytes: {}", public_key.len(), e)))?;
    let body = strip_curve_prefix(&full)
        .ok_or_else(|| AddressError::InvalidPublicKey("missing 0x04 tag".to_string()))?;

    let hash = keccak256(body);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Ok(Address(bytes))
}

/// Syntactic address check.
///
/// True for a `0x`/`0X` prefix followed by exactly 40 hex digits in any
/// casing. Does not verify the EIP-55 checksum (see [`has_valid_checksum`])
/// and says nothing about whether the account exists.
pub fn validate(address: &str) -> bool {
    let bytes = address.as_bytes();
    if bytes.len() != ADDRESS_STRING_LEN {
        return false;
    }
    bytes[0] == b'0'
        && matches!(bytes[1], b'x' | b'X')
        && bytes[2..].iter().all(u8::is_ascii_hexdigit)
}

/// EIP-55 check.
///
/// All-lowercase and all-uppercase bodies carry no checksum and pass;
/// mixed case must match the checksum exactly.
pub fn has_valid_checksum(address: &str) -> bool {
    let Ok(parsed) = address.parse::<Address>() else {
        return false;
    };
    let tail = &address[2..];
    let has_lower = tail.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = tail.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }
    parsed.to_checksum()[2..] == *tail
}
