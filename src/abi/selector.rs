//! Function selectors

use crate::utils::crypto::keccak256;

/// Selector from a canonical signature such as `transfer(address,uint256)`:
/// the first 4 bytes of its Keccak-256 digest
pub fn selector_from_signature(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Well-known function selectors
pub struct KnownSelectors;

impl KnownSelectors {
    // ERC-20
    pub const TRANSFER: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb]; // transfer(address,uint256)
    pub const APPROVE: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3]; // approve(address,uint256)

    // ERC-721
    pub const ERC721_SAFE_TRANSFER_FROM: [u8; 4] = [0x42, 0x84, 0x2e, 0x0e]; // safeTransferFrom(address,address,uint256)

    // ERC-1155
    pub const ERC1155_SAFE_TRANSFER_FROM: [u8; 4] = [0xf2, 0x42, 0x43, 0x2a]; // safeTransferFrom(address,address,uint256,uint256,bytes)

    /// Name for a known selector
    pub fn name(selector: &[u8; 4]) -> Option<&'static str> {
        match *selector {
            Self::TRANSFER => Some("transfer"),
            Self::APPROVE => Some("approve"),
            Self::ERC721_SAFE_TRANSFER_FROM | Self::ERC1155_SAFE_TRANSFER_FROM => Some("safeTransferFrom"),
            _ => None,
        }
    }
}
