//! EVM Transaction Core
//!
//! Builds, hashes and assembles signed transactions for EVM chains around an
//! external signer that only ever sees a 32-byte hash.
//!
//! # Architecture
//!
//! This crate provides:
//! - **address**: Address derivation, validation and EIP-55 checksums
//! - **codec**: RLP encoding and strict decoding
//! - **abi**: ERC-20 `transfer` / `approve` and NFT `safeTransferFrom` call data
//! - **fees**: Gas limit policy and three-tier fee estimates
//! - **signing**: Recovery of `v` from a 64-byte `r || s` signature
//! - **tx**: Legacy (EIP-155) and EIP-1559 transaction building
//! - **ffi**: C-ABI exports for the wallet layer
//!
//! # FFI Usage
//!
//! All public FFI functions are in the `ffi` module and follow this pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `txcore_free_string`)
//!
//! # Example
//!
//! ```rust,ignore
//! use evm_txcore::{Amount, ChainConfig, Fee, TransactionBuilder};
//!
//! let builder = TransactionBuilder::new(ChainConfig::ethereum_mainnet(), &public_key)?;
//! let (hash, unsigned) = builder.build_for_sign(
//!     &Amount::coin("0.1"),
//!     Some(&Fee::new("0.00021")),
//!     "0x7655b9b19ffab8b897f836857dae22a1e7f8d735",
//!     nonce,
//! )?;
//! let signature = signer.sign(&hash)?;
//! let raw = builder.build_for_send(&unsigned, &hash, &signature)?;
//! ```

pub mod abi;
pub mod address;
pub mod amount;
pub mod codec;
pub mod config;
pub mod error;
pub mod fees;
pub mod ffi;
pub mod serde_hex;
pub mod signing;
pub mod tx;
pub mod types;
pub mod utils;

// Re-export key types for convenience
pub use address::{derive_address, validate as validate_address, Address};
pub use config::ChainConfig;
pub use error::{CoreError, CoreResult, ErrorCode};
pub use fees::{fee_tiers, GasIntent, GasLimitTable};
pub use tx::{
    FeeParameters, SignedTransaction, SigningHash, TransactionBuilder, TransferRequest, TxBuildError,
    UnsignedTransaction,
};
pub use types::*;

pub use utils::crypto::{keccak256, to_checksum_address};

// Re-export FFI functions at crate root
pub use ffi::{
    txcore_build_for_send, txcore_build_for_sign, txcore_derive_address, txcore_fee_tiers,
    txcore_free_string, txcore_set_debug_logging, txcore_validate_address,
};
