//! Terminal price and limit-price trade sizing
//!
//! Bounds how much base a trader can take from the curve before its price
//! crosses a limit, measured against the one-sided reserves the trade would
//! actually execute on.

use crate::cost::CurveCostModel;
use crate::error::{AmmError, AmmResult};
use crate::price::calculate_price;
use crate::reserves::{calculate_spread_reserves, calculate_updated_spread_reserves};
use crate::state::{AmmState, Market};
use std::cmp::Ordering;
use tracing::debug;
use vamm_types::common::fixed_point::{
    cast_to_i128, integer_sqrt, invariant_from_sqrt_k, TryToU128,
};
use vamm_types::precision::{PEG_PRECISION, PRICE_PRECISION};
use vamm_types::{MathError, OraclePriceData, PositionDirection, SpreadPolicy, U256};

/// Price of the curve once every open position has been closed
pub fn calculate_terminal_price(market: &Market) -> AmmResult<u128> {
    let (terminal_quote, terminal_base) = market.amm.terminal_reserves()?;
    calculate_price(terminal_base, terminal_quote, market.amm.peg_multiplier)
}

/// Base amount that moves the curve's price to `limit_price`, and the side
/// that moves it there.
///
/// With an oracle reading the curve is repegged first and the solver uses the
/// repegged depth and peg. Without one the current curve is used as is, and
/// the spread is computed against its own mark price.
///
/// # Returns
/// `(base_asset_amount, direction)`; `(0, Long)` when the limit is already the
/// price of the pre-trade reserves
pub fn calculate_max_base_asset_amount_to_trade<C: CurveCostModel + ?Sized>(
    amm: &AmmState,
    limit_price: u128,
    direction: PositionDirection,
    oracle: Option<&OraclePriceData>,
    costs: &C,
    policy: SpreadPolicy,
) -> AmmResult<(u128, PositionDirection)> {
    if limit_price == 0 {
        return Err(AmmError::ZeroLimitPrice);
    }

    let (pre_trade_base, sqrt_k, peg) = match oracle {
        Some(oracle) => {
            let projected =
                calculate_updated_spread_reserves(amm, direction, oracle, costs, policy)?;
            (projected.base_asset_reserve, projected.sqrt_k, projected.new_peg)
        }
        None => {
            let mark_oracle = OraclePriceData::new(cast_to_i128(amm.mark_price()?)?, 0);
            let reserves = calculate_spread_reserves(amm, direction, &mark_oracle, policy)?;
            (reserves.base_asset_reserve, amm.sqrt_k, amm.peg_multiplier)
        }
    };

    let new_base_squared = invariant_from_sqrt_k(sqrt_k)?
        .checked_mul(U256::from(PRICE_PRECISION))
        .and_then(|v| v.checked_mul(U256::from(peg)))
        .ok_or(MathError::overflow("limit base reserve"))?
        .checked_div(U256::from(limit_price) * U256::from(PEG_PRECISION))
        .ok_or(MathError::division_by_zero("limit base reserve"))?;
    let new_base = integer_sqrt(new_base_squared).try_to_u128()?;

    let result = match new_base.cmp(&pre_trade_base) {
        Ordering::Greater => (new_base - pre_trade_base, PositionDirection::Short),
        Ordering::Less => (pre_trade_base - new_base, PositionDirection::Long),
        Ordering::Equal => (0, PositionDirection::Long),
    };

    debug!(
        limit_price,
        pre_trade_base,
        new_base,
        amount = result.0,
        direction = ?result.1,
        "max trade size"
    );

    Ok(result)
}
