//! Three-tier fee estimates
//!
//! Each tier scales a base gas price by a ratio and multiplies by the gas
//! limit: `price * numerator / denominator * gas_limit`, in integer wei
//! with the division floored before the multiplication. Intermediate
//! products are taken in 512 bits so the ordering of ratios carries over to
//! the results.

use ethers_core::types::{U256, U512};
use serde::{Deserialize, Serialize};

use crate::amount::{format_units, AmountError};

/// Multiplier expressed as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRatio {
    pub numerator: u64,
    pub denominator: u64,
}

impl FeeRatio {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self { numerator, denominator }
    }

    /// `value * numerator / denominator`, floored, saturating at `U256::MAX`.
    /// A zero denominator yields `U256::MAX`.
    pub fn apply(&self, value: U256) -> U256 {
        if self.denominator == 0 {
            return U256::MAX;
        }
        let scaled = U512::from(value) * U512::from(self.numerator) / U512::from(self.denominator);
        U256::try_from(scaled).unwrap_or(U256::MAX)
    }

    /// `self <= other` as fractions
    pub fn le(&self, other: &FeeRatio) -> bool {
        (self.numerator as u128) * (other.denominator as u128)
            <= (other.numerator as u128) * (self.denominator as u128)
    }
}

/// Ratios for the low / normal / high tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMultipliers {
    pub low: FeeRatio,
    pub normal: FeeRatio,
    pub high: FeeRatio,
}

impl Default for TierMultipliers {
    fn default() -> Self {
        Self {
            low: FeeRatio::new(10, 10),
            normal: FeeRatio::new(12, 10),
            high: FeeRatio::new(15, 10),
        }
    }
}

impl TierMultipliers {
    /// Denominators are non-zero and `low <= normal <= high`
    pub fn is_valid(&self) -> bool {
        [self.low, self.normal, self.high].iter().all(|r| r.denominator > 0)
            && self.low.le(&self.normal)
            && self.normal.le(&self.high)
    }
}

/// One fee level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTier {
    /// Scaled gas price in wei
    pub gas_price: U256,
    /// `gas_price * gas_limit` in wei
    pub total: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTiers {
    pub gas_limit: u64,
    pub low: FeeTier,
    pub normal: FeeTier,
    pub high: FeeTier,
}

/// Fee tiers rendered in the native coin's display unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedFeeTiers {
    pub gas_limit: u64,
    pub low: String,
    pub normal: String,
    pub high: String,
}

impl FeeTiers {
    /// Totals in ascending tier order
    pub fn totals(&self) -> [U256; 3] {
        [self.low.total, self.normal.total, self.high.total]
    }

    pub fn format(&self, decimals: u8) -> Result<FormattedFeeTiers, AmountError> {
        Ok(FormattedFeeTiers {
            gas_limit: self.gas_limit,
            low: format_units(self.low.total, decimals)?,
            normal: format_units(self.normal.total, decimals)?,
            high: format_units(self.high.total, decimals)?,
        })
    }
}

/// Fee tiers with the default 1.0 / 1.2 / 1.5 multipliers
pub fn fee_tiers(base_gas_price: U256, gas_limit: u64) -> FeeTiers {
    fee_tiers_with(base_gas_price, gas_limit, &TierMultipliers::default())
}

pub fn fee_tiers_with(base_gas_price: U256, gas_limit: u64, multipliers: &TierMultipliers) -> FeeTiers {
    let tier = |ratio: &FeeRatio| {
        let gas_price = ratio.apply(base_gas_price);
        FeeTier {
            gas_price,
            total: gas_price.saturating_mul(U256::from(gas_limit)),
        }
    };

    FeeTiers {
        gas_limit,
        low: tier(&multipliers.low),
        normal: tier(&multipliers.normal),
        high: tier(&multipliers.high),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GWEI: u64 = 1_000_000_000;

    #[test]
    fn test_default_tiers() {
        let tiers = fee_tiers(U256::from(20 * GWEI), 21_000);
        assert_eq!(tiers.low.gas_price, U256::from(20 * GWEI));
        assert_eq!(tiers.normal.gas_price, U256::from(24 * GWEI));
        assert_eq!(tiers.high.gas_price, U256::from(30 * GWEI));
        assert_eq!(tiers.low.total, U256::from(420_000 * GWEI));

        let formatted = tiers.format(18).unwrap();
        assert_eq!(formatted.low, "0.00042");
        assert_eq!(formatted.normal, "0.000504");
        assert_eq!(formatted.high, "0.00063");
    }

    #[test]
    fn test_division_floors_before_gas_limit() {
        // 7 * 12 / 10 = 8 (floor), then * 3
        let tiers = fee_tiers(U256::from(7u64), 3);
        assert_eq!(tiers.normal.total, U256::from(24u64));
        assert_eq!(tiers.high.total, U256::from(30u64));
    }

    #[test]
    fn test_tiny_price_collapses_tiers() {
        let tiers = fee_tiers(U256::one(), 21_000);
        assert_eq!(tiers.low.total, tiers.normal.total);
        assert!(tiers.normal.total <= tiers.high.total);
    }

    #[test]
    fn test_huge_price_stays_ordered() {
        let tiers = fee_tiers(U256::MAX / 2, 21_000);
        let [low, normal, high] = tiers.totals();
        assert!(low <= normal && normal <= high);
        assert_eq!(high, U256::MAX);
    }

    #[test]
    fn test_multiplier_validation() {
        assert!(TierMultipliers::default().is_valid());

        let inverted = TierMultipliers {
            low: FeeRatio::new(15, 10),
            normal: FeeRatio::new(12, 10),
            high: FeeRatio::new(10, 10),
        };
        assert!(!inverted.is_valid());

        let zero_den = TierMultipliers {
            low: FeeRatio::new(1, 0),
            ..TierMultipliers::default()
        };
        assert!(!zero_den.is_valid());

        assert!(FeeRatio::new(6, 5).le(&FeeRatio::new(12, 10)));
        assert!(!FeeRatio::new(3, 2).le(&FeeRatio::new(6, 5)));
    }
}
