//! Signature recovery
//!
//! External signers return a bare 64-byte `r || s` signature with no
//! recovery id. The id is found by recovering the public key under each
//! candidate and comparing against the key the signer is known to hold.

use std::fmt;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature};
use secp256k1::{Message, PublicKey, Secp256k1};
use serde::{Deserialize, Serialize};

use crate::utils::crypto::uncompressed_public_key;

pub const SIGNATURE_LEN: usize = 64;

/// Offset added to the recovery id in the pre-EIP-155 `v` value
pub const V_OFFSET: u8 = 27;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Expected a 64-byte signature, got {0} bytes")]
    InvalidLength(usize),
    #[error("Malformed signature: {0}")]
    Malformed(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Signature does not match the public key")]
    RecoveryFailed,
}

/// Bare `r || s` signature
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignature(#[serde(with = "crate::serde_hex::hex64")] [u8; SIGNATURE_LEN]);

impl RawSignature {
    pub fn new(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..]
    }
}

impl TryFrom<&[u8]> for RawSignature {
    type Error = SignatureError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Debug for RawSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawSignature(0x{})", hex::encode(self.0))
    }
}

/// Low-s signature with its recovery value
///
/// Only [`unmarshal`] produces one, so every value has been checked against
/// the signing key and the recovery id is always 0 or 1.
///
/// ```compile_fail
/// use evm_txcore::signing::RecoveredSignature;
///
/// let forged = RecoveredSignature { r: [0x11; 32], s: [0x22; 32], v: 0 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecoveredSignature {
    #[serde(with = "crate::serde_hex::hex32")]
    r: [u8; 32],
    #[serde(with = "crate::serde_hex::hex32")]
    s: [u8; 32],
    y_parity: bool,
}

impl RecoveredSignature {
    pub(crate) fn from_parts(r: [u8; 32], s: [u8; 32], y_parity: bool) -> Self {
        Self { r, s, y_parity }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// 27 or 28
    pub fn v(&self) -> u8 {
        V_OFFSET + self.recovery_id()
    }

    /// 0 or 1
    pub fn recovery_id(&self) -> u8 {
        u8::from(self.y_parity)
    }
}

/// Recover `(r, s, v)` for a signature over `hash` by `public_key`.
///
/// `s` is normalized to the lower half of the curve order first, as
/// consensus rules require. The signature must verify against the key;
/// recovery ids 0 and 1 are tried and the one reproducing the key wins.
/// There is no default: a mismatch is [`SignatureError::RecoveryFailed`].
pub fn unmarshal(
    raw: &RawSignature,
    hash: &[u8; 32],
    public_key: &[u8],
) -> Result<RecoveredSignature, SignatureError> {
    let expected = uncompressed_public_key(public_key)
        .map_err(|e| SignatureError::InvalidPublicKey(e.to_string()))?;
    let public = PublicKey::from_slice(&expected)
        .map_err(|e| SignatureError::InvalidPublicKey(e.to_string()))?;

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*hash);

    let mut signature = Signature::from_compact(raw.as_bytes())
        .map_err(|e| SignatureError::Malformed(e.to_string()))?;
    signature.normalize_s();

    if secp.verify_ecdsa(&message, &signature, &public).is_err() {
        return Err(SignatureError::RecoveryFailed);
    }

    let compact = signature.serialize_compact();
    for id in 0..=1u8 {
        let recovery_id = RecoveryId::from_i32(id as i32)
            .map_err(|e| SignatureError::Malformed(e.to_string()))?;
        let recoverable = RecoverableSignature::from_compact(&compact, recovery_id)
            .map_err(|e| SignatureError::Malformed(e.to_string()))?;

        let matches = secp
            .recover_ecdsa(&message, &recoverable)
            .map(|recovered| recovered.serialize_uncompressed() == expected)
            .unwrap_or(false);
        if matches {
            let mut r = [0u8; 32];
            let mut s = [0u8; 32];
            r.copy_from_slice(&compact[..32]);
            s.copy_from_slice(&compact[32..]);
            return Ok(RecoveredSignature::from_parts(r, s, id == 1));
        }
    }

    Err(SignatureError::RecoveryFailed)
}
