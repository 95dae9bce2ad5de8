//! Transaction encodings
//!
//! Legacy (EIP-155):
//! - signing: `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`
//! - broadcast: `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`
//!   with `v = recoveryId + chainId * 2 + 35`
//!
//! EIP-1559:
//! - signing: `0x02 || rlp([chainId, nonce, priorityFee, maxFee, gasLimit, to, value, data, accessList])`
//! - broadcast: the same list followed by `yParity, r, s`
//!
//! The access list is always empty.

use ethers_core::types::U256;

use super::types::{FeeParameters, UnsignedTransaction};
use crate::codec::{encode_list, RlpItem};
use crate::signing::RecoveredSignature;

/// EIP-155 `v`
pub fn eip155_v(chain_id: u64, recovery_id: u8) -> U256 {
    U256::from(chain_id) * 2 + 35 + recovery_id
}

pub(crate) fn wire_v(tx: &UnsignedTransaction, signature: &RecoveredSignature) -> U256 {
    match tx.fee {
        FeeParameters::Legacy { .. } => eip155_v(tx.chain_id, signature.recovery_id()),
        FeeParameters::Eip1559 { .. } => U256::from(signature.recovery_id()),
    }
}

fn body_fields(tx: &UnsignedTransaction) -> Vec<RlpItem> {
    match tx.fee {
        FeeParameters::Legacy { gas_limit, gas_price } => vec![
            tx.nonce.into(),
            gas_price.into(),
            gas_limit.into(),
            RlpItem::from(&tx.to),
            tx.value.into(),
            tx.data.clone().into(),
        ],
        FeeParameters::Eip1559 {
            gas_limit,
            max_fee_per_gas,
            priority_fee,
        } => vec![
            tx.chain_id.into(),
            tx.nonce.into(),
            priority_fee.into(),
            max_fee_per_gas.into(),
            gas_limit.into(),
            RlpItem::from(&tx.to),
            tx.value.into(),
            tx.data.clone().into(),
            RlpItem::empty_list(),
        ],
    }
}

fn with_type_prefix(tx: &UnsignedTransaction, list: Vec<u8>) -> Vec<u8> {
    match tx.tx_type().type_byte() {
        Some(type_byte) => {
            let mut out = Vec::with_capacity(list.len() + 1);
            out.push(type_byte);
            out.extend_from_slice(&list);
            out
        }
        None => list,
    }
}

pub(crate) fn signing_payload(tx: &UnsignedTransaction) -> Vec<u8> {
    let mut fields = body_fields(tx);
    if let FeeParameters::Legacy { .. } = tx.fee {
        // v, r, s placeholders
        fields.push(tx.chain_id.into());
        fields.push(0u64.into());
        fields.push(0u64.into());
    }
    with_type_prefix(tx, encode_list(&fields))
}

pub(crate) fn signed_payload(tx: &UnsignedTransaction, signature: &RecoveredSignature) -> Vec<u8> {
    let mut fields = body_fields(tx);
    fields.push(wire_v(tx, signature).into());
    fields.push(U256::from_big_endian(signature.r()).into());
    fields.push(U256::from_big_endian(signature.s()).into());
    with_type_prefix(tx, encode_list(&fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;

    fn legacy_tx() -> UnsignedTransaction {
        UnsignedTransaction {
            chain_id: 1,
            nonce: 9,
            fee: FeeParameters::Legacy {
                gas_limit: 21_000,
                gas_price: U256::from(20_000_000_000u64),
            },
            to: "0x3535353535353535353535353535353535353535".parse().unwrap(),
            value: U256::exp10(18),
            data: Vec::new(),
        }
    }

    #[test]
    fn test_eip155_example() {
        // Worked example from EIP-155
        let tx = legacy_tx();
        assert_eq!(
            hex::encode(tx.signing_payload()),
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );
        assert_eq!(
            hex::encode(tx.signing_hash()),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn test_eip155_v() {
        assert_eq!(eip155_v(1, 0), U256::from(37u64));
        assert_eq!(eip155_v(1, 1), U256::from(38u64));
        assert_eq!(eip155_v(137, 1), U256::from(310u64));
        // large chain ids do not overflow
        assert_eq!(eip155_v(u64::MAX, 0), U256::from(u64::MAX) * 2 + 35);
    }

    #[test]
    fn test_signed_legacy_uses_minimal_integers() {
        let mut r = [0u8; 32];
        r[31] = 0x01;
        let mut s = [0u8; 32];
        s[30] = 0x01;
        let signature = RecoveredSignature::from_parts(r, s, true);

        let encoded = signed_payload(&legacy_tx(), &signature);
        let fields = decode(&encoded).unwrap();
        let fields = fields.as_list().unwrap();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[6].as_u64().unwrap(), 38);
        assert_eq!(fields[7].as_bytes().unwrap(), &[0x01]);
        assert_eq!(fields[8].as_bytes().unwrap(), &[0x01, 0x00]);
    }

    #[test]
    fn test_fee_market_layout() {
        let tx = UnsignedTransaction {
            fee: FeeParameters::Eip1559 {
                gas_limit: 21_000,
                max_fee_per_gas: U256::from(100u64),
                priority_fee: U256::from(2u64),
            },
            ..legacy_tx()
        };

        let payload = signing_payload(&tx);
        assert_eq!(payload[0], 0x02);
        let fields = decode(&payload[1..]).unwrap();
        let fields = fields.as_list().unwrap();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[0].as_u64().unwrap(), 1);
        assert_eq!(fields[2].as_u64().unwrap(), 2);
        assert_eq!(fields[3].as_u64().unwrap(), 100);
        assert_eq!(fields[8], RlpItem::empty_list());

        let signature = RecoveredSignature::from_parts([0x11; 32], [0x22; 32], true);
        let signed = signed_payload(&tx, &signature);
        let fields = decode(&signed[1..]).unwrap();
        let fields = fields.as_list().unwrap();
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[9].as_u64().unwrap(), 1);
    }
}
