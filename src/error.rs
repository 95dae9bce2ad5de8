//! Unified error types for the transaction core
//!
//! Module-level errors (`AddressError`, `RlpError`, `TxBuildError`, ...) are
//! `thiserror` enums close to the code that raises them. They all convert
//! into [`CoreError`], the serializable envelope reported across the FFI
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::abi::PayloadError;
use crate::address::AddressError;
use crate::amount::AmountError;
use crate::codec::RlpError;
use crate::config::ConfigError;
use crate::signing::SignatureError;
use crate::tx::TxBuildError;

/// Main error type for all core operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl CoreError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for CoreError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidAddress,
    InvalidPublicKey,
    InvalidAmount,
    InvalidTransaction,
    MissingFee,

    // Crypto errors
    InvalidSignature,
    RecoveryFailed,
    HashMismatch,

    // Encoding errors
    EncodingError,
    ConfigError,

    // Parse errors
    ParseError,
    JsonError,
    HexError,

    // Internal
    Internal,
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

// Conversions from common error types

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::new(ErrorCode::HexError, e.to_string())
    }
}

// Conversions from module errors

impl From<AddressError> for CoreError {
    fn from(e: AddressError) -> Self {
        let code = match e {
            AddressError::InvalidPublicKey(_) => ErrorCode::InvalidPublicKey,
            AddressError::InvalidAddress(_) => ErrorCode::InvalidAddress,
        };
        CoreError::new(code, e.to_string())
    }
}

impl From<RlpError> for CoreError {
    fn from(e: RlpError) -> Self {
        CoreError::new(ErrorCode::EncodingError, e.to_string())
    }
}

impl From<AmountError> for CoreError {
    fn from(e: AmountError) -> Self {
        CoreError::new(ErrorCode::InvalidAmount, e.to_string())
    }
}

impl From<PayloadError> for CoreError {
    fn from(e: PayloadError) -> Self {
        let code = match e {
            PayloadError::InvalidAddress(_) => ErrorCode::InvalidAddress,
            PayloadError::InvalidAmount(_) => ErrorCode::InvalidAmount,
        };
        CoreError::new(code, e.to_string())
    }
}

impl From<SignatureError> for CoreError {
    fn from(e: SignatureError) -> Self {
        let code = match e {
            SignatureError::RecoveryFailed => ErrorCode::RecoveryFailed,
            SignatureError::InvalidPublicKey(_) => ErrorCode::InvalidPublicKey,
            _ => ErrorCode::InvalidSignature,
        };
        CoreError::new(code, e.to_string())
    }
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::new(ErrorCode::ConfigError, e.to_string())
    }
}

impl From<TxBuildError> for CoreError {
    fn from(e: TxBuildError) -> Self {
        let code = match &e {
            TxBuildError::MissingFee => ErrorCode::MissingFee,
            TxBuildError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            TxBuildError::InvalidDestination(_) => ErrorCode::InvalidAddress,
            TxBuildError::InvalidGasLimit => ErrorCode::InvalidTransaction,
            TxBuildError::InvalidPublicKey(_) => ErrorCode::InvalidPublicKey,
            TxBuildError::InvalidSignature(_) => ErrorCode::InvalidSignature,
            TxBuildError::HashMismatch => ErrorCode::HashMismatch,
            TxBuildError::InvalidConfig(_) => ErrorCode::ConfigError,
            TxBuildError::FeeExceedsAmount | TxBuildError::InvalidNftAmount { .. } => {
                ErrorCode::InvalidAmount
            }
        };
        CoreError::new(code, e.to_string())
    }
}
