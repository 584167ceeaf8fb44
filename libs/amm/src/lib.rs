//! # vAMM Pricing Core - Repeg, Spread and Swap Mathematics
//!
//! ## Purpose
//!
//! Fixed-point pricing engine for a virtual constant-product AMM backing a
//! perpetual futures market. From an oracle reading and the curve's virtual
//! reserves it decides whether to repeg toward the oracle within the fee
//! budget, produces the updated reserve state, computes directional bid/ask
//! spreads, simulates swaps and bounds trade sizes against a limit price.
//!
//! ## Integration Points
//!
//! - **Input Sources**: [`AmmState`] snapshots and [`OraclePriceData`] readings supplied per call
//! - **Output Destinations**: Order matching, risk checks, quoting
//! - **Cost Model Seam**: [`CurveCostModel`], with [`ConstantProductCostModel`] as reference
//! - **Precision**: Prices 1e10, peg 1e3, reserves 1e13, quote 1e6, spreads 1e6
//! - **Validation**: Every wide product and narrowing cast is checked
//!
//! ## Architecture Role
//!
//! ```text
//! oracle + AmmState
//!        │
//!        ▼
//!   repeg decision ──► updated AmmState ──► spread ──► spread reserves ──► bid/ask
//!        │                                                    │
//!        └────────────── swap simulation ◄──── trade sizing ◄─┘
//! ```
//!
//! All operations are pure functions over `Copy` values. Nothing is mutated in
//! place, so every entry point may be called concurrently.
//!
//! ## Quick Start
//!
//! ```rust
//! use vamm_amm::{AmmCalculator, AmmState};
//! use vamm_types::precision::{AMM_RESERVE_PRECISION, PEG_PRECISION, PRICE_PRECISION_I128};
//! use vamm_types::{OraclePriceData, SpreadPolicy};
//!
//! let amm = AmmState::new(1_000 * AMM_RESERVE_PRECISION, 1_000 * AMM_RESERVE_PRECISION, 50 * PEG_PRECISION)?
//!     .with_base_spread(1_000)
//!     .with_curve_update_intensity(100);
//! let oracle = OraclePriceData::new(50 * PRICE_PRECISION_I128, 0);
//!
//! let calculator = AmmCalculator::constant_product(SpreadPolicy::CostBasis);
//! let (bid, ask) = calculator.bid_ask_price(&amm, &oracle)?;
//! assert!(bid < ask);
//! # Ok::<(), vamm_amm::AmmError>(())
//! ```

pub mod calculator;
pub mod cost;
pub mod error;
pub mod price;
pub mod repeg;
pub mod reserves;
pub mod sizing;
pub mod spread;
pub mod state;
pub mod swap;

pub use calculator::AmmCalculator;
pub use cost::{ConstantProductCostModel, CurveCostModel};
pub use error::{AmmError, AmmResult};
pub use price::{
    calculate_bid_ask_price, calculate_mark_price, calculate_oracle_mark_spread_pct,
    calculate_price,
};
pub use repeg::{calculate_repeg_decision, calculate_target_peg, calculate_updated_amm, RepegDecision};
pub use reserves::{
    calculate_spread_reserves, calculate_updated_spread_reserves, ProjectedReserves,
    SpreadReserves,
};
pub use sizing::{calculate_max_base_asset_amount_to_trade, calculate_terminal_price};
pub use spread::{calculate_spread, calculate_spread_with_policy};
pub use state::{AmmState, Market};
pub use swap::{
    calculate_quote_asset_amount_swapped, calculate_reserves_after_swap, calculate_swap_output,
    swap_direction_for,
};

/// Common types for AMM calculations
pub use vamm_types::{
    AssetType, MathError, OraclePriceData, PositionDirection, SpreadPolicy, SwapDirection,
};
