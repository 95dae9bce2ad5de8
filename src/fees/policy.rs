//! Gas limit policy
//!
//! Every transfer intent maps to a gas limit. Tokens with unusual transfer
//! logic carry per-symbol overrides; any other token gets the generic
//! token-transfer limit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::log_debug;

/// What a transaction moves, as far as gas is concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GasIntent {
    Coin,
    Token { symbol: String },
    /// ERC-721 or ERC-1155 `safeTransferFrom`
    Nft,
}

impl GasIntent {
    pub fn token(symbol: impl Into<String>) -> Self {
        GasIntent::Token { symbol: symbol.into() }
    }
}

/// Gas limits by intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasLimitTable {
    pub coin_transfer: u64,
    pub token_transfer: u64,
    #[serde(default = "default_nft_transfer")]
    pub nft_transfer: u64,
    /// Exact-symbol overrides, case-sensitive
    #[serde(default)]
    pub token_overrides: BTreeMap<String, u64>,
}

fn default_nft_transfer() -> u64 {
    GasLimitTable::NFT_TRANSFER
}

impl Default for GasLimitTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl GasLimitTable {
    pub const COIN_TRANSFER: u64 = 21_000;
    pub const TOKEN_TRANSFER: u64 = 60_000;
    pub const NFT_TRANSFER: u64 = 150_000;

    /// Ethereum mainnet limits with the DGX and AWG overrides
    pub fn standard() -> Self {
        Self::new(Self::COIN_TRANSFER, Self::TOKEN_TRANSFER)
            .with_override("DGX", 300_000)
            .with_override("AWG", 150_000)
    }

    pub fn new(coin_transfer: u64, token_transfer: u64) -> Self {
        Self {
            coin_transfer,
            token_transfer,
            nft_transfer: Self::NFT_TRANSFER,
            token_overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, symbol: impl Into<String>, gas_limit: u64) -> Self {
        self.token_overrides.insert(symbol.into(), gas_limit);
        self
    }

    pub fn with_nft_transfer(mut self, gas_limit: u64) -> Self {
        self.nft_transfer = gas_limit;
        self
    }

    /// Gas limit for an intent. Total: unknown symbols fall back to the
    /// generic token limit.
    pub fn gas_limit(&self, intent: &GasIntent) -> u64 {
        match intent {
            GasIntent::Coin => self.coin_transfer,
            GasIntent::Nft => self.nft_transfer,
            GasIntent::Token { symbol } => match self.token_overrides.get(symbol) {
                Some(&limit) => limit,
                None => {
                    log_debug!(
                        "fees",
                        "No gas limit override for token, using generic limit",
                        symbol = symbol,
                        gas_limit = self.token_transfer,
                    );
                    self.token_transfer
                }
            },
        }
    }

    /// All limits are non-zero
    pub fn is_valid(&self) -> bool {
        self.coin_transfer > 0
            && self.token_transfer > 0
            && self.nft_transfer > 0
            && self.token_overrides.values().all(|&limit| limit > 0)
    }
}
