//! Chain Configuration
//!
//! Per-chain parameters the builder needs:
//! - chain id for replay protection
//! - native coin symbol and decimals
//! - gas limit table and fee tier multipliers
//!
//! Presets cover the networks the wallet ships with. Custom networks load
//! from JSON and are validated before use.

use serde::{Deserialize, Serialize};

use crate::amount::MAX_DECIMALS;
use crate::fees::{GasLimitTable, TierMultipliers};
use crate::log_info;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Json(String),
    #[error("Chain id must be non-zero")]
    ZeroChainId,
    #[error("Coin decimals {0} out of range")]
    InvalidDecimals(u8),
    #[error("Gas limits must be non-zero")]
    ZeroGasLimit,
    #[error("Tier multipliers must have non-zero denominators and be non-decreasing")]
    InvalidTierMultipliers,
}

/// Fee policy settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FeePolicyConfig {
    #[serde(default)]
    pub gas_limits: GasLimitTable,
    #[serde(default)]
    pub tier_multipliers: TierMultipliers,
}

/// Network settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub coin_symbol: String,
    #[serde(default = "default_coin_decimals")]
    pub coin_decimals: u8,
    #[serde(default)]
    pub fee_policy: FeePolicyConfig,
}

fn default_coin_decimals() -> u8 {
    18
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::ethereum_mainnet()
    }
}

impl ChainConfig {
    pub fn new(name: impl Into<String>, chain_id: u64, coin_symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain_id,
            coin_symbol: coin_symbol.into(),
            coin_decimals: default_coin_decimals(),
            fee_policy: FeePolicyConfig::default(),
        }
    }

    /// Ethereum mainnet preset
    pub fn ethereum_mainnet() -> Self {
        Self::new("Ethereum", 1, "ETH")
    }

    /// Sepolia testnet preset
    pub fn sepolia() -> Self {
        Self::new("Sepolia", 11_155_111, "ETH")
    }

    /// Polygon PoS preset
    pub fn polygon() -> Self {
        Self::new("Polygon", 137, "POL")
    }

    /// Base preset
    pub fn base() -> Self {
        Self::new("Base", 8453, "ETH")
    }

    /// Look up a preset by chain id
    pub fn preset(chain_id: u64) -> Option<Self> {
        match chain_id {
            1 => Some(Self::ethereum_mainnet()),
            137 => Some(Self::polygon()),
            8453 => Some(Self::base()),
            11_155_111 => Some(Self::sepolia()),
            _ => None,
        }
    }

    pub fn with_gas_limits(mut self, gas_limits: GasLimitTable) -> Self {
        self.fee_policy.gas_limits = gas_limits;
        self
    }

    pub fn with_tier_multipliers(mut self, multipliers: TierMultipliers) -> Self {
        self.fee_policy.tier_multipliers = multipliers;
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ChainConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        log_info!(
            "config",
            "Loaded chain config",
            name = config.name,
            chain_id = config.chain_id,
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id == 0 {
            return Err(ConfigError::ZeroChainId);
        }
        if self.coin_decimals > MAX_DECIMALS {
            return Err(ConfigError::InvalidDecimals(self.coin_decimals));
        }
        if !self.fee_policy.gas_limits.is_valid() {
            return Err(ConfigError::ZeroGasLimit);
        }
        if !self.fee_policy.tier_multipliers.is_valid() {
            return Err(ConfigError::InvalidTierMultipliers);
        }
        Ok(())
    }
}
