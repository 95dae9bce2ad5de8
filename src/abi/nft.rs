//! NFT call data
//!
//! `safeTransferFrom` for ERC-721 and ERC-1155. Both name the current
//! owner explicitly, so the sender address goes into the payload.

use ethers_core::types::U256;

use super::erc20::{address_word, uint_word};
use super::selector::KnownSelectors;
use crate::address::Address;

/// Length of an ERC-721 `safeTransferFrom` payload
pub const ERC721_CALL_LEN: usize = 4 + 3 * 32;

/// `safeTransferFrom(from, to, token_id)` on an ERC-721 contract
pub fn encode_erc721_safe_transfer(from: &Address, to: &Address, token_id: U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(ERC721_CALL_LEN);
    data.extend_from_slice(&KnownSelectors::ERC721_SAFE_TRANSFER_FROM);
    data.extend_from_slice(&address_word(from));
    data.extend_from_slice(&address_word(to));
    data.extend_from_slice(&uint_word(token_id));
    data
}

/// `safeTransferFrom(from, to, id, amount, data)` on an ERC-1155 contract.
///
/// `data` is ABI `bytes`: the head holds its offset, the tail its length
/// followed by the content right-padded to a word boundary.
pub fn encode_erc1155_safe_transfer(
    from: &Address,
    to: &Address,
    token_id: U256,
    amount: U256,
    data: &[u8],
) -> Vec<u8> {
    // five head words precede the dynamic tail
    let offset = U256::from(5 * 32);
    let padded = data.len().div_ceil(32) * 32;

    let mut out = Vec::with_capacity(4 + 7 * 32 + padded);
    out.extend_from_slice(&KnownSelectors::ERC1155_SAFE_TRANSFER_FROM);
    out.extend_from_slice(&address_word(from));
    out.extend_from_slice(&address_word(to));
    out.extend_from_slice(&uint_word(token_id));
    out.extend_from_slice(&uint_word(amount));
    out.extend_from_slice(&uint_word(offset));
    out.extend_from_slice(&uint_word(U256::from(data.len())));
    out.extend_from_slice(data);
    out.resize(4 + 6 * 32 + padded, 0);
    out
}
