//! ERC-20 call data
//!
//! Both calls share one layout: 4-byte selector, the address left-padded to
//! a 32-byte word, the amount as a 32-byte big-endian word.

use ethers_core::types::U256;

use super::selector::KnownSelectors;
use super::PayloadError;
use crate::address::Address;
use crate::amount::parse_units;

/// Length of a `transfer` / `approve` payload
pub const ERC20_CALL_LEN: usize = 4 + 32 + 32;

pub(super) fn address_word(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

pub(super) fn uint_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

fn encode_call(selector: [u8; 4], address: &Address, amount: U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(ERC20_CALL_LEN);
    data.extend_from_slice(&selector);
    data.extend_from_slice(&address_word(address));
    data.extend_from_slice(&uint_word(amount));
    data
}

/// `transfer(destination, amount)`; always 68 bytes
pub fn encode_token_transfer(destination: &Address, amount: U256) -> Vec<u8> {
    encode_call(KnownSelectors::TRANSFER, destination, amount)
}

/// `approve(spender, amount)`; always 68 bytes
pub fn encode_approve(spender: &Address, amount: U256) -> Vec<u8> {
    encode_call(KnownSelectors::APPROVE, spender, amount)
}

/// Build a transfer payload from user input.
///
/// `amount` is a decimal string in the token's display unit and is scaled
/// by `decimals`; more fractional digits than `decimals` is an error.
pub fn token_transfer_payload(
    destination: &str,
    amount: &str,
    decimals: u8,
) -> Result<Vec<u8>, PayloadError> {
    let destination: Address = destination
        .parse()
        .map_err(|_| PayloadError::InvalidAddress(destination.to_string()))?;
    let value = parse_units(amount, decimals)?;
    Ok(encode_token_transfer(&destination, value))
}

/// Split a `transfer` or `approve` payload into its arguments.
///
/// Returns `None` for other selectors, wrong lengths, or an address word
/// with non-zero padding.
pub fn decode_erc20_call(data: &[u8]) -> Option<([u8; 4], Address, U256)> {
    if data.len() != ERC20_CALL_LEN {
        return None;
    }
    let selector: [u8; 4] = data[..4].try_into().ok()?;
    if selector != KnownSelectors::TRANSFER && selector != KnownSelectors::APPROVE {
        return None;
    }

    let address_word = &data[4..36];
    if address_word[..12].iter().any(|&b| b != 0) {
        return None;
    }
    let address_bytes: [u8; 20] = address_word[12..].try_into().ok()?;
    let amount = U256::from_big_endian(&data[36..]);
    Some((selector, Address::from_bytes(address_bytes), amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::AmountError;

    const DESTINATION: &str = "0x90e4d59c8583e37426b37d1d7394b6008a987c67";

    #[test]
    fn test_token_transfer_layout() {
        let destination: Address = DESTINATION.parse().unwrap();
        let data = encode_token_transfer(&destination, U256::from(1_000_000u64));

        assert_eq!(data.len(), 68);
        assert_eq!(
            hex::encode(&data),
            "a9059cbb\
             00000000000000000000000090e4d59c8583e37426b37d1d7394b6008a987c67\
             00000000000000000000000000000000000000000000000000000000000f4240"
        );
    }

    #[test]
    fn test_approve_payload() {
        let spender: Address = "0x111111125421cA6dc452d289314280a0f8842A65".parse().unwrap();
        let data = encode_approve(&spender, U256::from(1_146_241u64));
        assert_eq!(
            format!("0x{}", hex::encode(&data)),
            "0x095ea7b3000000000000000000000000111111125421ca6dc452d289314280a0f8842a650000000000000000000000000000000000000000000000000000000000117d81"
        );
    }

    #[test]
    fn test_payload_from_user_input() {
        let data = token_transfer_payload(DESTINATION, "1.5", 6).unwrap();
        assert_eq!(data.len(), ERC20_CALL_LEN);
        assert_eq!(&data[..4], &KnownSelectors::TRANSFER);
        assert_eq!(U256::from_big_endian(&data[36..]), U256::from(1_500_000u64));
    }

    #[test]
    fn test_payload_errors() {
        assert!(matches!(
            token_transfer_payload("0x1234", "1", 6),
            Err(PayloadError::InvalidAddress(_))
        ));
        assert!(matches!(
            token_transfer_payload(DESTINATION, "1.0000001", 6),
            Err(PayloadError::InvalidAmount(AmountError::TooManyDecimals { max: 6 }))
        ));
    }

    #[test]
    fn test_decode_erc20_call() {
        let destination: Address = DESTINATION.parse().unwrap();
        let data = encode_token_transfer(&destination, U256::MAX);
        let (selector, address, amount) = decode_erc20_call(&data).unwrap();
        assert_eq!(selector, KnownSelectors::TRANSFER);
        assert_eq!(address, destination);
        assert_eq!(amount, U256::MAX);

        assert!(decode_erc20_call(&data[..67]).is_none());
        let mut dirty = data.clone();
        dirty[4] = 1;
        assert!(decode_erc20_call(&dirty).is_none());
        let mut unknown = data.clone();
        unknown[0] = 0;
        assert!(decode_erc20_call(&unknown).is_none());
        // a known selector that is not an ERC-20 call
        let mut nft = data;
        nft[..4].copy_from_slice(&KnownSelectors::ERC721_SAFE_TRANSFER_FROM);
        assert!(decode_erc20_call(&nft).is_none());
    }
}
