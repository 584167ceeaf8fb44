//! Precision Scales for vAMM Fixed-Point Values
//!
//! Every quantity in the pricing core is a scaled integer. The scale depends on
//! what the number measures, and mixing scales without the matching ratio is the
//! most common source of silent error, so each ratio gets its own constant.
//!
//! ## Scales
//!
//! - **Prices**: 10 decimal places (`$50.00 = 500_000_000_000`)
//! - **Peg multiplier**: 3 decimal places (`50.000 = 50_000`)
//! - **AMM reserves / base amounts**: 13 decimal places
//! - **Quote amounts (fees, cost basis)**: 6 decimal places
//! - **Spreads**: parts per million (`1% = 10_000`)
//!
//! ## Example Usage
//!
//! ```rust
//! use vamm_types::precision::{
//!     AMM_RESERVE_PRECISION, PEG_PRECISION, PRICE_PRECISION, QUOTE_PRECISION,
//!     AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO,
//! };
//!
//! // one base unit at a peg of 50.000 is worth $50 in quote precision
//! let quote = AMM_RESERVE_PRECISION * (50 * PEG_PRECISION) / AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO;
//! assert_eq!(quote, 50 * QUOTE_PRECISION);
//! assert_eq!(PRICE_PRECISION, 10_000_000_000);
//! ```

#[cfg(feature = "common")]
use rust_decimal::Decimal;

/// Mark/oracle price scale (1e10)
pub const PRICE_PRECISION: u128 = 10_000_000_000;
pub const PRICE_PRECISION_I128: i128 = PRICE_PRECISION as i128;

/// Peg multiplier scale (1e3)
pub const PEG_PRECISION: u128 = 1_000;

/// Virtual reserve and base asset amount scale (1e13)
pub const AMM_RESERVE_PRECISION: u128 = 10_000_000_000_000;
pub const AMM_RESERVE_PRECISION_I128: i128 = AMM_RESERVE_PRECISION as i128;

/// Quote asset scale (1e6)
pub const QUOTE_PRECISION: u128 = 1_000_000;
pub const QUOTE_PRECISION_I128: i128 = QUOTE_PRECISION as i128;

/// Bid/ask spread scale (1e6, parts per million)
pub const SPREAD_PRECISION: u128 = 1_000_000;
pub const SPREAD_PRECISION_I128: i128 = SPREAD_PRECISION as i128;

/// Price (1e10) to peg (1e3)
pub const PRICE_TO_PEG_PRECISION_RATIO: u128 = PRICE_PRECISION / PEG_PRECISION;

/// Reserve (1e13) to quote (1e6)
pub const AMM_TO_QUOTE_PRECISION_RATIO: u128 = AMM_RESERVE_PRECISION / QUOTE_PRECISION;
pub const AMM_TO_QUOTE_PRECISION_RATIO_I128: i128 = AMM_TO_QUOTE_PRECISION_RATIO as i128;

/// Reserve (1e13) times peg (1e3) to quote (1e6)
pub const AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO: u128 =
    AMM_RESERVE_PRECISION * PEG_PRECISION / QUOTE_PRECISION;
pub const AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO_I128: i128 =
    AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO as i128;

/// Upper spread the inventory skew tries to stay under (2%)
pub const MAX_TARGET_SPREAD: u128 = SPREAD_PRECISION / 50;

/// Largest multiple of the base spread the inventory skew may apply
pub const MAX_INVENTORY_SKEW: u128 = 5;

/// Convert a raw fixed-point integer into a [`Decimal`] for display and logging.
///
/// Returns `None` when `raw` does not fit the 96-bit decimal mantissa or
/// `decimals` exceeds 28.
///
/// ```rust
/// use vamm_types::precision::to_decimal;
/// use rust_decimal::Decimal;
///
/// let price = to_decimal(505_000_000_000, 10).unwrap();
/// assert_eq!(price, Decimal::new(505, 1));
/// ```
#[cfg(feature = "common")]
pub fn to_decimal(raw: i128, decimals: u32) -> Option<Decimal> {
    Decimal::try_from_i128_with_scale(raw, decimals)
        .ok()
        .map(|d| d.normalize())
}
