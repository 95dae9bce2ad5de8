//! Transaction Builder
//!
//! Two-phase construction around an external signer:
//! 1. `build_for_sign` turns a transfer intent into an unsigned transaction
//!    and the 32-byte hash the signer must sign.
//! 2. `build_for_send` takes the signer's 64-byte signature, recovers `v`
//!    against the wallet's public key and returns broadcast bytes.

use ethers_core::types::U256;

use super::types::{FeeParameters, SignedTransaction, UnsignedTransaction};
use crate::abi::{encode_erc1155_safe_transfer, encode_erc721_safe_transfer, encode_token_transfer};
use crate::address::{derive_address, Address};
use crate::amount::{parse_units, AmountError};
use crate::config::{ChainConfig, ConfigError};
use crate::fees::{fee_tiers_with, FeeTiers, GasIntent};
use crate::log_warn;
use crate::signing::{unmarshal, RawSignature, SignatureError};
use crate::types::{Amount, Asset, Fee, NftStandard};
use crate::utils::crypto::{uncompressed_public_key, UNCOMPRESSED_PUBLIC_KEY_LEN};
use crate::utils::logging::{LogEntry, LogLevel};

/// Keccak-256 digest handed to the signer
pub type SigningHash = [u8; 32];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxBuildError {
    #[error("Fee is required")]
    MissingFee,
    #[error("Invalid {field}: {reason}")]
    InvalidAmount { field: &'static str, reason: AmountError },
    #[error("Invalid destination address: {0}")]
    InvalidDestination(String),
    #[error("Gas limit must be non-zero")]
    InvalidGasLimit,
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),
    #[error("Hash does not match the transaction's signing hash")]
    HashMismatch,
    #[error("Invalid chain config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("Fee exceeds the amount it is deducted from")]
    FeeExceedsAmount,
    #[error("Invalid NFT amount {amount} for {standard:?}")]
    InvalidNftAmount { standard: NftStandard, amount: U256 },
}

fn signing_hash_entry(tx: &UnsignedTransaction, hash: &SigningHash) -> LogEntry {
    LogEntry::new(LogLevel::Debug, "tx", "Signing hash produced")
        .field("chain_id", tx.chain_id)
        .field("nonce", tx.nonce)
        .field("gas_limit", tx.fee.gas_limit())
        .address_field("to", &tx.to.to_string())
        .hash_field("signing_hash", &format!("0x{}", hex::encode(hash)))
}

/// A transfer intent
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransferRequest {
    pub amount: Amount,
    pub fee: Option<Fee>,
    pub destination: String,
    pub nonce: u64,
    /// Call data override. For coins it is attached as-is; for tokens it
    /// replaces the generated `transfer` payload.
    #[serde(default, with = "optional_bytes", skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    /// Deduct the fee from a coin amount so the total spent equals the
    /// entered amount. Ignored for tokens and NFTs, whose fee is paid in coin.
    #[serde(default)]
    pub include_fee: bool,
}

impl TransferRequest {
    pub fn new(amount: Amount, fee: Option<Fee>, destination: impl Into<String>, nonce: u64) -> Self {
        Self {
            amount,
            fee,
            destination: destination.into(),
            nonce,
            data: None,
            include_fee: false,
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_fee_included(mut self) -> Self {
        self.include_fee = true;
        self
    }
}

mod optional_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => crate::serde_hex::bytes::serialize(bytes, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| {
            let body = s.strip_prefix("0x").unwrap_or(&s);
            hex::decode(body).map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

/// Builds transactions for one wallet key on one chain
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    config: ChainConfig,
    public_key: [u8; UNCOMPRESSED_PUBLIC_KEY_LEN],
    address: Address,
}

impl TransactionBuilder {
    /// `public_key` may be compressed (33 bytes) or uncompressed (65 bytes).
    /// The config is validated here, so a zero chain id never reaches a
    /// signing hash.
    pub fn new(config: ChainConfig, public_key: &[u8]) -> Result<Self, TxBuildError> {
        config.validate()?;
        let public_key = uncompressed_public_key(public_key)
            .map_err(|e| TxBuildError::InvalidPublicKey(e.to_string()))?;
        let address =
            derive_address(&public_key).map_err(|e| TxBuildError::InvalidPublicKey(e.to_string()))?;

        Ok(Self {
            config,
            public_key,
            address,
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Sender address
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Gas limit the policy assigns to an intent
    pub fn gas_limit(&self, intent: &GasIntent) -> u64 {
        self.config.fee_policy.gas_limits.gas_limit(intent)
    }

    /// Fee tiers for an intent using this chain's multipliers
    pub fn fee_tiers(&self, base_gas_price: U256, intent: &GasIntent) -> FeeTiers {
        fee_tiers_with(
            base_gas_price,
            self.gas_limit(intent),
            &self.config.fee_policy.tier_multipliers,
        )
    }

    /// Phase one: unsigned transaction and its signing hash
    pub fn build_for_sign(
        &self,
        amount: &Amount,
        fee: Option<&Fee>,
        destination: &str,
        nonce: u64,
    ) -> Result<(SigningHash, UnsignedTransaction), TxBuildError> {
        let request = TransferRequest::new(amount.clone(), fee.cloned(), destination, nonce);
        self.build_request_for_sign(&request)
    }

    pub fn build_request_for_sign(
        &self,
        request: &TransferRequest,
    ) -> Result<(SigningHash, UnsignedTransaction), TxBuildError> {
        let fee = request.fee.as_ref().ok_or(TxBuildError::MissingFee)?;

        let destination: Address = request
            .destination
            .parse()
            .map_err(|_| TxBuildError::InvalidDestination(request.destination.clone()))?;

        let decimals = match &request.amount.asset {
            Asset::Coin => self.config.coin_decimals,
            Asset::Token(token) => token.decimals,
            Asset::Nft(_) => 0,
        };
        let value = parse_units(&request.amount.value, decimals)
            .map_err(|reason| TxBuildError::InvalidAmount { field: "amount", reason })?;
        let fee_wei = parse_units(&fee.value, self.config.coin_decimals)
            .map_err(|reason| TxBuildError::InvalidAmount { field: "fee", reason })?;

        let fee_parameters = match fee.parameters {
            Some(parameters) => parameters,
            None => {
                let gas_limit = self.gas_limit(&request.amount.gas_intent());
                if gas_limit == 0 {
                    return Err(TxBuildError::InvalidGasLimit);
                }
                // Floor division; the remainder of the budget is not spent
                FeeParameters::Legacy {
                    gas_limit,
                    gas_price: fee_wei / U256::from(gas_limit),
                }
            }
        };
        if fee_parameters.gas_limit() == 0 {
            return Err(TxBuildError::InvalidGasLimit);
        }

        let (to, value, data) = match &request.amount.asset {
            Asset::Coin => {
                let value = if request.include_fee {
                    value.checked_sub(fee_wei).ok_or(TxBuildError::FeeExceedsAmount)?
                } else {
                    value
                };
                (destination, value, request.data.clone().unwrap_or_default())
            }
            Asset::Token(token) => (
                token.contract_address,
                U256::zero(),
                request
                    .data
                    .clone()
                    .unwrap_or_else(|| encode_token_transfer(&destination, value)),
            ),
            Asset::Nft(nft) => {
                let payload = match nft.standard {
                    NftStandard::Erc721 if value == U256::one() => {
                        encode_erc721_safe_transfer(&self.address, &destination, nft.token_id)
                    }
                    NftStandard::Erc1155 if !value.is_zero() => encode_erc1155_safe_transfer(
                        &self.address,
                        &destination,
                        nft.token_id,
                        value,
                        &[],
                    ),
                    standard => return Err(TxBuildError::InvalidNftAmount { standard, amount: value }),
                };
                (
                    nft.contract_address,
                    U256::zero(),
                    request.data.clone().unwrap_or(payload),
                )
            }
        };

        let tx = UnsignedTransaction {
            chain_id: self.config.chain_id,
            nonce: request.nonce,
            fee: fee_parameters,
            to,
            value,
            data,
        };
        let hash = tx.signing_hash();

        signing_hash_entry(&tx, &hash).log();

        Ok((hash, tx))
    }

    /// Phase two: attach the signer's output and return broadcast bytes
    pub fn build_for_send(
        &self,
        unsigned: &UnsignedTransaction,
        hash: &SigningHash,
        raw_signature: &[u8],
    ) -> Result<Vec<u8>, TxBuildError> {
        Ok(self.apply_signature(unsigned, hash, raw_signature)?.encode())
    }

    /// Like [`build_for_send`](Self::build_for_send) but keeps the typed
    /// signed transaction
    pub fn apply_signature(
        &self,
        unsigned: &UnsignedTransaction,
        hash: &SigningHash,
        raw_signature: &[u8],
    ) -> Result<SignedTransaction, TxBuildError> {
        let raw = RawSignature::try_from(raw_signature)?;

        if unsigned.signing_hash() != *hash {
            log_warn!("tx", "Signing hash does not match transaction", nonce = unsigned.nonce);
            return Err(TxBuildError::HashMismatch);
        }

        let recovered = unmarshal(&raw, hash, &self.public_key).map_err(|e| {
            LogEntry::new(LogLevel::Warn, "tx", "Signature rejected")
                .field("reason", &e)
                .address_field("sender", &self.address.to_string())
                .hash_field("public_key", &format!("0x{}", hex::encode(self.public_key)))
                .log();
            TxBuildError::InvalidSignature(e)
        })?;

        Ok(unsigned.clone().into_signed(recovered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_hash_entry_is_redacted() {
        let tx = UnsignedTransaction {
            chain_id: 1,
            nonce: 15,
            fee: FeeParameters::Legacy {
                gas_limit: 21_000,
                gas_price: U256::from(476_190_476_190u64),
            },
            to: "0x7655b9b19ffab8b897f836857dae22a1e7f8d735".parse().unwrap(),
            value: U256::exp10(17),
            data: Vec::new(),
        };
        let line = signing_hash_entry(&tx, &tx.signing_hash()).render();

        assert!(line.starts_with("DEBUG [tx] Signing hash produced | "));
        assert!(line.contains("chain_id=1 nonce=15 gas_limit=21000"));
        assert!(line.contains("to=0x7655b9...d735"));
        assert!(line.contains("signing_hash=0xbdbecf64b4...e57761"));
        assert!(!line.contains("7655b9b19ffab8b897f836857dae22a1e7f8d735"));
    }
}
