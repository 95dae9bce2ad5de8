use ethers_core::types::U256;
use evm_txcore::abi::{decode_erc20_call, encode_token_transfer, KnownSelectors, ERC20_CALL_LEN};
use evm_txcore::codec::{decode, encode, RlpItem};
use evm_txcore::fees::{fee_tiers, GasIntent, GasLimitTable};
use evm_txcore::signing::{unmarshal, RawSignature};
use evm_txcore::{derive_address, keccak256, validate_address, Address};
use proptest::prelude::*;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha3::{Digest, Sha3_256};

fn any_secret_key() -> impl Strategy<Value = SecretKey> {
    prop::array::uniform32(any::<u8>()).prop_filter_map("valid secp256k1 scalar", |bytes| {
        SecretKey::from_slice(&bytes).ok()
    })
}

fn any_rlp_item() -> impl Strategy<Value = RlpItem> {
    let leaf = prop::collection::vec(any::<u8>(), 0..80).prop_map(RlpItem::Bytes);
    leaf.prop_recursive(3, 48, 8, |inner| {
        prop::collection::vec(inner, 0..8).prop_map(RlpItem::List)
    })
}

fn public_key(secret: &SecretKey) -> [u8; 65] {
    PublicKey::from_secret_key(&Secp256k1::new(), secret).serialize_uncompressed()
}

proptest! {
    #[test]
    fn rlp_is_deterministic_and_decodes_back(item in any_rlp_item()) {
        let encoded = encode(&item);
        prop_assert_eq!(&encoded, &encode(&item.clone()));
        prop_assert_eq!(decode(&encoded).unwrap(), item);
    }

    #[test]
    fn rlp_integers_are_minimal(value in any::<u64>()) {
        let item = RlpItem::from(value);
        let bytes = item.as_bytes().unwrap();
        prop_assert!(bytes.first() != Some(&0));
        prop_assert_eq!(decode(&encode(&item)).unwrap().as_u64().unwrap(), value);
    }

    #[test]
    fn derived_addresses_are_lowercase_hex(secret in any_secret_key()) {
        let key = public_key(&secret);
        let address = derive_address(&key).unwrap().to_string();

        prop_assert_eq!(address.len(), 42);
        prop_assert!(address.starts_with("0x"));
        prop_assert!(address[2..].bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        prop_assert_eq!(derive_address(&key).unwrap().to_string(), address.clone());

        // Compressed input derives the same account
        let compressed = PublicKey::from_secret_key(&Secp256k1::new(), &secret).serialize();
        prop_assert_eq!(derive_address(&compressed).unwrap().to_string(), address);
    }

    #[test]
    fn validate_never_panics(input in ".{0,64}") {
        let _ = validate_address(&input);
    }

    #[test]
    fn validate_accepts_any_casing(bytes in prop::array::uniform20(any::<u8>()), upper in any::<bool>()) {
        let body = hex::encode(bytes);
        let body = if upper { body.to_ascii_uppercase() } else { body };
        let lower_prefix = format!("0x{}", body);
        let upper_prefix = format!("0X{}", body);
        let short = format!("0x{}", &body[1..]);
        prop_assert!(validate_address(&lower_prefix));
        prop_assert!(validate_address(&upper_prefix));
        prop_assert!(!validate_address(&body));
        prop_assert!(!validate_address(&short));
    }

    #[test]
    fn gas_limit_is_total(symbol in "[A-Za-z0-9]{0,10}") {
        let table = GasLimitTable::standard();
        let expected = match symbol.as_str() {
            "DGX" => 300_000,
            "AWG" => 150_000,
            _ => 60_000,
        };
        prop_assert_eq!(table.gas_limit(&GasIntent::token(symbol)), expected);
        prop_assert_eq!(table.gas_limit(&GasIntent::Coin), 21_000);
    }

    #[test]
    fn fee_tiers_are_ordered(price in any::<u128>(), gas_limit in any::<u64>()) {
        let tiers = fee_tiers(U256::from(price), gas_limit);
        let [low, normal, high] = tiers.totals();
        prop_assert!(low <= normal);
        prop_assert!(normal <= high);
    }

    #[test]
    fn token_payload_shape(bytes in prop::array::uniform20(any::<u8>()), amount in any::<u128>()) {
        let destination = Address::from_bytes(bytes);
        let payload = encode_token_transfer(&destination, U256::from(amount));

        prop_assert_eq!(payload.len(), ERC20_CALL_LEN);
        prop_assert_eq!(&payload[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        let (selector, decoded_to, decoded_amount) = decode_erc20_call(&payload).unwrap();
        prop_assert_eq!(selector, KnownSelectors::TRANSFER);
        prop_assert_eq!(decoded_to, destination);
        prop_assert_eq!(decoded_amount, U256::from(amount));
    }

    #[test]
    fn recovery_matches_signer(secret in any_secret_key(), hash in prop::array::uniform32(any::<u8>())) {
        let secp = Secp256k1::new();
        let (recovery_id, compact) = secp
            .sign_ecdsa_recoverable(&Message::from_digest(hash), &secret)
            .serialize_compact();

        let recovered = unmarshal(&RawSignature::new(compact), &hash, &public_key(&secret)).unwrap();
        prop_assert_eq!(recovered.v() as i32, 27 + recovery_id.to_i32());
        prop_assert_eq!(&recovered.r()[..], &compact[..32]);
        prop_assert_eq!(&recovered.s()[..], &compact[32..]);
    }
}

#[test]
fn keccak_is_not_sha3() {
    let keccak = keccak256(b"");
    let sha3: [u8; 32] = Sha3_256::digest(b"").into();

    assert_eq!(
        hex::encode(keccak),
        "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
    assert_ne!(keccak, sha3);
}
