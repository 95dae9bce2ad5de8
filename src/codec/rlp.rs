//! Recursive Length Prefix encoding
//!
//! Byte strings:
//! - a single byte below `0x80` is its own encoding
//! - shorter than 56 bytes: `0x80 + len`, then the bytes
//! - otherwise: `0xb7 + len(len)`, the big-endian length, then the bytes
//!
//! Lists use the same scheme with `0xc0` / `0xf7` over the concatenated
//! item encodings. Integers are minimal big-endian byte strings, so zero is
//! the empty string (`0x80`).

use ethers_core::types::U256;

use crate::address::Address;

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;
const SHORT_LIMIT: usize = 56;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RlpError {
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("{0} trailing bytes after item")]
    TrailingBytes(usize),
    #[error("Length prefix is not minimal")]
    NonCanonicalSize,
    #[error("Single byte below 0x80 must not carry a prefix")]
    NonCanonicalSingleByte,
    #[error("Declared length does not fit in memory")]
    LengthOverflow,
    #[error("Expected a byte string, found a list")]
    ExpectedBytes,
    #[error("Expected a list, found a byte string")]
    ExpectedList,
    #[error("Integer has leading zero bytes")]
    LeadingZero,
    #[error("Integer wider than {0} bytes")]
    IntegerOverflow(usize),
}

pub type RlpResult<T> = Result<T, RlpError>;

/// A decoded or to-be-encoded RLP value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    Bytes(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Empty list, used for an empty access list
    pub fn empty_list() -> Self {
        RlpItem::List(Vec::new())
    }

    pub fn as_bytes(&self) -> RlpResult<&[u8]> {
        match self {
            RlpItem::Bytes(b) => Ok(b),
            RlpItem::List(_) => Err(RlpError::ExpectedBytes),
        }
    }

    pub fn as_list(&self) -> RlpResult<&[RlpItem]> {
        match self {
            RlpItem::List(items) => Ok(items),
            RlpItem::Bytes(_) => Err(RlpError::ExpectedList),
        }
    }

    /// Interpret as a canonical unsigned integer of at most 32 bytes
    pub fn as_u256(&self) -> RlpResult<U256> {
        let bytes = self.as_bytes()?;
        if bytes.first() == Some(&0) {
            return Err(RlpError::LeadingZero);
        }
        if bytes.len() > 32 {
            return Err(RlpError::IntegerOverflow(32));
        }
        Ok(U256::from_big_endian(bytes))
    }

    /// Interpret as a canonical unsigned integer of at most 8 bytes
    pub fn as_u64(&self) -> RlpResult<u64> {
        let bytes = self.as_bytes()?;
        if bytes.len() > 8 {
            return Err(RlpError::IntegerOverflow(8));
        }
        Ok(self.as_u256()?.low_u64())
    }
}

impl From<U256> for RlpItem {
    fn from(value: U256) -> Self {
        let mut buf = [0u8; 32];
        value.to_big_endian(&mut buf);
        RlpItem::Bytes(trim_leading_zeros(&buf).to_vec())
    }
}

impl From<u64> for RlpItem {
    fn from(value: u64) -> Self {
        RlpItem::Bytes(trim_leading_zeros(&value.to_be_bytes()).to_vec())
    }
}

impl From<&[u8]> for RlpItem {
    fn from(bytes: &[u8]) -> Self {
        RlpItem::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(bytes: Vec<u8>) -> Self {
        RlpItem::Bytes(bytes)
    }
}

impl From<&Address> for RlpItem {
    fn from(address: &Address) -> Self {
        RlpItem::Bytes(address.as_bytes().to_vec())
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    &bytes[leading_zeros..]
}

/// Encode a single item
pub fn encode(item: &RlpItem) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(item, &mut out);
    out
}

/// Encode a list of items
pub fn encode_list(items: &[RlpItem]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        encode_into(item, &mut payload);
    }
    let mut out = Vec::with_capacity(payload.len() + 9);
    encode_header(payload.len(), LIST_OFFSET, &mut out);
    out.extend_from_slice(&payload);
    out
}

fn encode_into(item: &RlpItem, out: &mut Vec<u8>) {
    match item {
        RlpItem::Bytes(bytes) => {
            if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
                out.push(bytes[0]);
            } else {
                encode_header(bytes.len(), STRING_OFFSET, out);
                out.extend_from_slice(bytes);
            }
        }
        RlpItem::List(items) => out.extend_from_slice(&encode_list(items)),
    }
}

fn encode_header(len: usize, offset: u8, out: &mut Vec<u8>) {
    if len < SHORT_LIMIT {
        out.push(offset + len as u8);
    } else {
        let len_bytes = len.to_be_bytes();
        let len_bytes = trim_leading_zeros(&len_bytes);
        out.push(offset + 55 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
}

/// Decode exactly one item, rejecting non-canonical forms and trailing data
pub fn decode(data: &[u8]) -> RlpResult<RlpItem> {
    let (item, consumed) = decode_item(data)?;
    if consumed != data.len() {
        return Err(RlpError::TrailingBytes(data.len() - consumed));
    }
    Ok(item)
}

fn decode_item(data: &[u8]) -> RlpResult<(RlpItem, usize)> {
    let prefix = *data.first().ok_or(RlpError::UnexpectedEnd)?;

    match prefix {
        0x00..=0x7f => Ok((RlpItem::Bytes(vec![prefix]), 1)),
        0x80..=0xbf => {
            let (header_len, len) = read_header(data, STRING_OFFSET)?;
            let body = take(data, header_len, len)?;
            if len == 1 && body[0] < STRING_OFFSET {
                return Err(RlpError::NonCanonicalSingleByte);
            }
            Ok((RlpItem::Bytes(body.to_vec()), header_len + len))
        }
        0xc0..=0xff => {
            let (header_len, len) = read_header(data, LIST_OFFSET)?;
            let mut body = take(data, header_len, len)?;
            let mut items = Vec::new();
            while !body.is_empty() {
                let (item, consumed) = decode_item(body)?;
                items.push(item);
                body = &body[consumed..];
            }
            Ok((RlpItem::List(items), header_len + len))
        }
    }
}

/// Returns (header length, payload length)
fn read_header(data: &[u8], offset: u8) -> RlpResult<(usize, usize)> {
    let short = data[0] - offset;
    if (short as usize) < SHORT_LIMIT {
        return Ok((1, short as usize));
    }

    let len_of_len = (short - 55) as usize;
    let len_bytes = data.get(1..1 + len_of_len).ok_or(RlpError::UnexpectedEnd)?;
    if len_bytes[0] == 0 {
        return Err(RlpError::NonCanonicalSize);
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::LengthOverflow);
    }
    let len = len_bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);
    if len < SHORT_LIMIT {
        return Err(RlpError::NonCanonicalSize);
    }
    Ok((1 + len_of_len, len))
}

fn take(data: &[u8], start: usize, len: usize) -> RlpResult<&[u8]> {
    let end = start.checked_add(len).ok_or(RlpError::LengthOverflow)?;
    data.get(start..end).ok_or(RlpError::UnexpectedEnd)
}
