//! Shared types for the transaction core
//!
//! These types are used across modules and exposed via FFI.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::fees::GasIntent;
use crate::tx::FeeParameters;

// =============================================================================
// Assets and amounts
// =============================================================================

/// ERC-20 token description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub contract_address: Address,
    pub decimals: u8,
}

/// Contract standard of a non-fungible asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NftStandard {
    Erc721,
    Erc1155,
}

/// A single NFT id on a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nft {
    pub contract_address: Address,
    #[serde(with = "crate::serde_hex::u256_dec")]
    pub token_id: U256,
    pub standard: NftStandard,
}

/// What is being transferred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Asset {
    /// The chain's native coin; decimals come from the chain config
    Coin,
    Token(Token),
    /// Amount is a whole number of copies: always 1 for ERC-721
    Nft(Nft),
}

/// User-facing amount: a decimal string in the asset's display unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    pub asset: Asset,
}

impl Amount {
    pub fn coin(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            asset: Asset::Coin,
        }
    }

    pub fn token(value: impl Into<String>, token: Token) -> Self {
        Self {
            value: value.into(),
            asset: Asset::Token(token),
        }
    }

    pub fn nft(value: impl Into<String>, nft: Nft) -> Self {
        Self {
            value: value.into(),
            asset: Asset::Nft(nft),
        }
    }

    pub fn gas_intent(&self) -> GasIntent {
        match &self.asset {
            Asset::Coin => GasIntent::Coin,
            Asset::Token(token) => GasIntent::token(token.symbol.clone()),
            Asset::Nft(_) => GasIntent::Nft,
        }
    }
}

/// Fee budget in the native coin.
///
/// Without `parameters` the builder picks the gas limit from its policy
/// and derives a legacy gas price as `value / gas_limit`. With explicit
/// parameters those are used as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<FeeParameters>,
}

impl Fee {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: FeeParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

// =============================================================================
// FFI Response Types
// =============================================================================

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<crate::error::CoreError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: crate::error::CoreError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed"}}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdt() -> Token {
        Token {
            symbol: "USDT".to_string(),
            contract_address: "0xc2132d05d31c914a87c6611c10748aeb04b58e8f".parse().unwrap(),
            decimals: 6,
        }
    }

    #[test]
    fn test_gas_intent() {
        assert_eq!(Amount::coin("1").gas_intent(), GasIntent::Coin);
        assert_eq!(Amount::token("1", usdt()).gas_intent(), GasIntent::token("USDT"));
    }

    #[test]
    fn test_nft_json() {
        let amount: Amount = serde_json::from_str(
            r#"{"value":"1","asset":{"type":"nft","contract_address":"0xc2132d05d31c914a87c6611c10748aeb04b58e8f","token_id":"4242","standard":"erc721"}}"#,
        )
        .unwrap();
        let Asset::Nft(nft) = &amount.asset else {
            panic!("expected an nft asset");
        };
        assert_eq!(nft.token_id, U256::from(4242u64));
        assert_eq!(nft.standard, NftStandard::Erc721);
        assert_eq!(amount.gas_intent(), GasIntent::Nft);
    }

    #[test]
    fn test_amount_json() {
        let amount = Amount::token("1.5", usdt());
        let json = serde_json::to_string(&amount).unwrap();
        assert!(json.contains(r#""type":"token""#));
        assert!(json.contains(r#""contract_address":"0xc2132d05d31c914a87c6611c10748aeb04b58e8f""#));

        let coin: Amount = serde_json::from_str(r#"{"value":"0.1","asset":{"type":"coin"}}"#).unwrap();
        assert_eq!(coin, Amount::coin("0.1"));
    }

    #[test]
    fn test_fee_json_without_parameters() {
        let fee: Fee = serde_json::from_str(r#"{"value":"0.00021"}"#).unwrap();
        assert_eq!(fee, Fee::new("0.00021"));
        assert_eq!(serde_json::to_string(&fee).unwrap(), r#"{"value":"0.00021"}"#);
    }

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse::ok("test_data".to_string());
        let json = response.to_json();
        assert!(json.contains("success"));
        assert!(json.contains("test_data"));

        let response: ApiResponse<()> =
            ApiResponse::err(crate::error::CoreError::invalid_input("bad"));
        assert!(response.to_json().contains("invalid_input"));
    }
}
