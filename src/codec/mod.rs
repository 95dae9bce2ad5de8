//! Wire encodings

pub mod rlp;

pub use rlp::{decode, encode, encode_list, RlpError, RlpItem, RlpResult};
