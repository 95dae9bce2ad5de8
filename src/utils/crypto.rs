//! Hashing and public key helpers shared by the address, ABI and signing code.

use secp256k1::PublicKey;
use tiny_keccak::{Hasher, Keccak};

/// Length of an uncompressed secp256k1 public key, prefix included.
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

/// Length of a compressed secp256k1 public key.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;

/// SEC1 tag byte of an uncompressed point.
pub const UNCOMPRESSED_TAG: u8 = 0x04;

/// Keccak-256 with the original (pre-NIST) padding.
///
/// This is not SHA3-256; the two produce different digests for every input.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Drop the `0x04` tag from an uncompressed public key.
///
/// Returns the 64-byte `X || Y` body, or `None` when the input is not a
/// tagged 65-byte key.
pub fn strip_curve_prefix(public_key: &[u8]) -> Option<&[u8]> {
    match public_key {
        [UNCOMPRESSED_TAG, body @ ..] if body.len() == 64 => Some(body),
        _ => None,
    }
}

/// Bring a 33-byte compressed or 65-byte uncompressed key to the
/// uncompressed form.
///
/// Both forms are parsed as curve points, so a tagged 65-byte blob that is
/// not on secp256k1 is rejected here rather than hashed into an address.
pub fn uncompressed_public_key(
    public_key: &[u8],
) -> Result<[u8; UNCOMPRESSED_PUBLIC_KEY_LEN], secp256k1::Error> {
    match public_key.len() {
        UNCOMPRESSED_PUBLIC_KEY_LEN | COMPRESSED_PUBLIC_KEY_LEN => {
            Ok(PublicKey::from_slice(public_key)?.serialize_uncompressed())
        }
        _ => Err(secp256k1::Error::InvalidPublicKey),
    }
}

/// Convert raw address bytes to an EIP-55 checksummed string
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() || nibble < 8 {
            result.push(ch);
        } else {
            result.push(ch.to_ascii_uppercase());
        }
    }

    result
}
