//! Transaction Module
//!
//! Builds unsigned transactions, produces signing hashes and assembles
//! signed broadcast bytes for EVM chains.

mod builder;
mod encoding;
mod types;


pub use builder::*;
pub use encoding::eip155_v;
pub use types::*;
