//! Contract call data for token transfers
//!
//! - ERC-20 `transfer` and `approve` payloads
//! - ERC-721 and ERC-1155 `safeTransferFrom` payloads
//! - Function selector calculation

pub mod erc20;
pub mod nft;
pub mod selector;

pub use erc20::*;
pub use nft::*;
pub use selector::*;

use crate::amount::AmountError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Invalid destination address: {0}")]
    InvalidAddress(String),
    #[error("Invalid token amount: {0}")]
    InvalidAmount(#[from] AmountError),
}
