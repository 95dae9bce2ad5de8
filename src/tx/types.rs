//! Transaction types
//!
//! `UnsignedTransaction` and `SignedTransaction` are separate types; the
//! only way from one to the other is
//! [`TransactionBuilder::apply_signature`](super::TransactionBuilder::apply_signature),
//! which checks the signature against the sender key first.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

use super::encoding;
use crate::address::Address;
use crate::signing::RecoveredSignature;
use crate::utils::crypto::keccak256;

/// Envelope type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    /// Pre-typed transaction with EIP-155 replay protection
    Legacy,
    /// EIP-1559 (type 0x02)
    FeeMarket,
}

impl TxType {
    pub fn type_byte(&self) -> Option<u8> {
        match self {
            Self::Legacy => None,
            Self::FeeMarket => Some(0x02),
        }
    }
}

/// Gas pricing for a transaction, all values in wei
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeParameters {
    Legacy {
        gas_limit: u64,
        #[serde(with = "crate::serde_hex::u256_dec")]
        gas_price: U256,
    },
    Eip1559 {
        gas_limit: u64,
        #[serde(with = "crate::serde_hex::u256_dec")]
        max_fee_per_gas: U256,
        #[serde(with = "crate::serde_hex::u256_dec")]
        priority_fee: U256,
    },
}

impl FeeParameters {
    pub fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy { gas_limit, .. } | Self::Eip1559 { gas_limit, .. } => *gas_limit,
        }
    }

    pub fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy { .. } => TxType::Legacy,
            Self::Eip1559 { .. } => TxType::FeeMarket,
        }
    }

    /// Upper bound on what the sender pays for gas
    pub fn max_cost(&self) -> U256 {
        let price = match self {
            Self::Legacy { gas_price, .. } => *gas_price,
            Self::Eip1559 { max_fee_per_gas, .. } => *max_fee_per_gas,
        };
        price.saturating_mul(U256::from(self.gas_limit()))
    }
}

/// Transaction ready for hashing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub fee: FeeParameters,
    pub to: Address,
    #[serde(with = "crate::serde_hex::u256_dec")]
    pub value: U256,
    #[serde(with = "crate::serde_hex::bytes")]
    pub data: Vec<u8>,
}

impl UnsignedTransaction {
    pub fn tx_type(&self) -> TxType {
        self.fee.tx_type()
    }

    /// Bytes whose Keccak-256 digest is signed
    pub fn signing_payload(&self) -> Vec<u8> {
        encoding::signing_payload(self)
    }

    pub fn signing_hash(&self) -> [u8; 32] {
        keccak256(&self.signing_payload())
    }

    pub(crate) fn into_signed(self, signature: RecoveredSignature) -> SignedTransaction {
        SignedTransaction {
            transaction: self,
            signature,
        }
    }
}

/// Transaction with its canonical signature
///
/// ```compile_fail
/// use evm_txcore::signing::RecoveredSignature;
/// use evm_txcore::{SignedTransaction, UnsignedTransaction};
///
/// fn attach(tx: UnsignedTransaction, signature: RecoveredSignature) -> SignedTransaction {
///     tx.into_signed(signature)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    transaction: UnsignedTransaction,
    signature: RecoveredSignature,
}

impl SignedTransaction {
    pub fn transaction(&self) -> &UnsignedTransaction {
        &self.transaction
    }

    pub fn signature(&self) -> &RecoveredSignature {
        &self.signature
    }

    /// `v` as it appears on the wire: EIP-155 `v` for legacy, y-parity for
    /// typed transactions
    pub fn v(&self) -> U256 {
        encoding::wire_v(&self.transaction, &self.signature)
    }

    /// Broadcast bytes
    pub fn encode(&self) -> Vec<u8> {
        encoding::signed_payload(&self.transaction, &self.signature)
    }

    /// Transaction hash as reported by nodes
    pub fn tx_hash(&self) -> [u8; 32] {
        keccak256(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_parameters_json() {
        let fee = FeeParameters::Eip1559 {
            gas_limit: 21_000,
            max_fee_per_gas: U256::from(4_478_253_867_089u64),
            priority_fee: U256::from(31_900_000_000u64),
        };
        let json = serde_json::to_string(&fee).unwrap();
        assert_eq!(
            json,
            r#"{"type":"eip1559","gas_limit":21000,"max_fee_per_gas":"4478253867089","priority_fee":"31900000000"}"#
        );
        assert_eq!(serde_json::from_str::<FeeParameters>(&json).unwrap(), fee);
    }

    #[test]
    fn test_fee_parameters_accessors() {
        let legacy = FeeParameters::Legacy {
            gas_limit: 21_000,
            gas_price: U256::from(10u64),
        };
        assert_eq!(legacy.gas_limit(), 21_000);
        assert_eq!(legacy.tx_type(), TxType::Legacy);
        assert_eq!(legacy.max_cost(), U256::from(210_000u64));
        assert_eq!(TxType::Legacy.type_byte(), None);
        assert_eq!(TxType::FeeMarket.type_byte(), Some(0x02));
    }
}
