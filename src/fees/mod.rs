//! Fee policy
//!
//! - `policy`: gas limit per transfer intent
//! - `tiers`: low / normal / high fee estimates from a base gas price

pub mod policy;
pub mod tiers;

pub use policy::{GasIntent, GasLimitTable};
pub use tiers::{fee_tiers, fee_tiers_with, FeeRatio, FeeTier, FeeTiers, FormattedFeeTiers, TierMultipliers};
