//! External Signature Handling
//!
//! Signing happens outside this crate (hardware card, enclave, air-gapped
//! device). This module turns the signer's bare 64-byte output back into a
//! recoverable `(r, s, v)` triple for the known public key.

pub mod signature;

pub use signature::{unmarshal, RawSignature, RecoveredSignature, SignatureError, SIGNATURE_LEN, V_OFFSET};
