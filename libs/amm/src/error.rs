//! Errors raised by the pricing core
//!
//! `NegativeSwapAmount` and `InvalidKAdjustment` mean corrupted state or a
//! miscalibrated policy constant. Callers must reject the triggering action
//! rather than retry.

use thiserror::Error;
use vamm_types::MathError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    #[error("Swap amount must be non-negative, got {amount}")]
    NegativeSwapAmount { amount: i128 },

    #[error("Shrinking K by {numerator}/{denominator} must free fee pool, got cost {cost}")]
    InvalidKAdjustment {
        numerator: u128,
        denominator: u128,
        cost: i128,
    },

    #[error("Oracle price must be positive, got {price}")]
    InvalidOraclePrice { price: i128 },

    #[error("Half spread {half_spread} exceeds the quote reserve it shifts")]
    SpreadExceedsReserves { half_spread: u128 },

    #[error("Limit price must be positive")]
    ZeroLimitPrice,

    #[error(transparent)]
    Math(#[from] MathError),
}

pub type AmmResult<T> = std::result::Result<T, AmmError>;
