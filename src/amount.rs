//! Decimal amount conversion
//!
//! Converts between user-facing decimal strings ("1.5") and integer
//! smallest-unit values (1_500_000 at 6 decimals). Conversion never rounds:
//! a fraction longer than the asset's decimals is an error unless the extra
//! digits are zeros.

use ethers_core::types::U256;

/// Largest decimals value whose scale factor fits in 256 bits
pub const MAX_DECIMALS: u8 = 77;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),
    #[error("Too many decimal places: max {max}")]
    TooManyDecimals { max: u8 },
    #[error("Amount overflow")]
    Overflow,
    #[error("Unsupported decimals: {0}")]
    UnsupportedDecimals(u8),
}

fn scale(decimals: u8) -> Result<U256, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    Ok(U256::exp10(decimals as usize))
}

/// Parse a decimal string into smallest units
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    let multiplier = scale(decimals)?;

    let (integer_str, fractional_str) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer_str.is_empty() && fractional_str.is_empty())
        || !all_digits(integer_str)
        || !all_digits(fractional_str)
    {
        return Err(AmountError::InvalidFormat(trimmed.to_string()));
    }

    let fractional_str = fractional_str.trim_end_matches('0');
    if fractional_str.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals { max: decimals });
    }

    let integer = if integer_str.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(integer_str).map_err(|_| AmountError::Overflow)?
    };

    // Pad fractional part to full precision
    let padded = format!("{:0<width$}", fractional_str, width = decimals as usize);
    let fractional = if padded.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&padded).map_err(|_| AmountError::Overflow)?
    };

    integer
        .checked_mul(multiplier)
        .and_then(|v| v.checked_add(fractional))
        .ok_or(AmountError::Overflow)
}

/// Format smallest units as a decimal string with trailing zeros trimmed
pub fn format_units(value: U256, decimals: u8) -> Result<String, AmountError> {
    let (integer, fractional) = value.div_mod(scale(decimals)?);
    if fractional.is_zero() {
        return Ok(integer.to_string());
    }

    let fractional = format!("{:0>width$}", fractional.to_string(), width = decimals as usize);
    Ok(format!("{}.{}", integer, fractional.trim_end_matches('0')))
}
