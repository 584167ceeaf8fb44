//! Directional half-spread calculation
//!
//! The half spread starts at `base_spread / 2` and is then widened in two
//! independent steps:
//!
//! 1. **Oracle retreat**: when the oracle sits on the side the quote is
//!    selling into, the quote retreats at least as far as the divergence.
//!    This step is never capped.
//! 2. **Inventory skew**: when the quote would grow the AMM's existing
//!    exposure (or the fee pool is empty), the half spread is scaled by
//!    `1 + effective_leverage`, at most [`MAX_INVENTORY_SKEW`]×, and pulled
//!    back toward [`MAX_TARGET_SPREAD`] when that would overshoot it.
//!
//! Fractional scale factors are carried as [`Decimal`]; the result is floored
//! back to spread precision.

use crate::error::AmmResult;
use crate::price::calculate_oracle_mark_spread_pct;
use crate::state::AmmState;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::trace;
use vamm_types::common::fixed_point::{cast_to_i128, cast_to_u128};
use vamm_types::precision::{
    AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO_I128, AMM_TO_QUOTE_PRECISION_RATIO_I128,
    MAX_INVENTORY_SKEW, MAX_TARGET_SPREAD, PRICE_PRECISION_I128, QUOTE_PRECISION,
};
use vamm_types::{MathError, OraclePriceData, PositionDirection, SpreadPolicy};

/// Half spread for `direction` under the default [`SpreadPolicy`]
pub fn calculate_spread(
    amm: &AmmState,
    direction: PositionDirection,
    oracle: &OraclePriceData,
) -> AmmResult<u128> {
    calculate_spread_with_policy(amm, direction, oracle, SpreadPolicy::default())
}

/// Half spread for `direction`, in spread precision
pub fn calculate_spread_with_policy(
    amm: &AmmState,
    direction: PositionDirection,
    oracle: &OraclePriceData,
    policy: SpreadPolicy,
) -> AmmResult<u128> {
    let mut half_spread = u128::from(amm.base_spread) / 2;
    if amm.base_spread == 0 || amm.curve_update_intensity == 0 {
        return Ok(half_spread);
    }

    let mark_price = amm.mark_price()?;
    let oracle_mark_pct = calculate_oracle_mark_spread_pct(mark_price, oracle.price)?;

    let retreating = match direction {
        PositionDirection::Long => oracle_mark_pct < 0,
        PositionDirection::Short => oracle_mark_pct > 0,
    };
    if retreating {
        let mut retreat = oracle_mark_pct.unsigned_abs();
        if policy == SpreadPolicy::MarkToTerminal {
            retreat = retreat
                .checked_add(cast_to_u128(oracle.confidence_pct())?)
                .ok_or(MathError::overflow("oracle retreat"))?;
        }
        half_spread = half_spread.max(retreat);
        trace!(?direction, oracle_mark_pct, retreat, half_spread, "oracle retreat");
    }

    let net = amm.net_base_asset_amount;
    let tfmd = amm.total_fee_minus_distributions;
    let grows_exposure = match direction {
        PositionDirection::Long => net > 0,
        PositionDirection::Short => net < 0,
    };

    if grows_exposure || tfmd == 0 {
        let scale = inventory_scale(amm, mark_price, half_spread, policy)?;
        half_spread = apply_scale(half_spread, scale)?;
        trace!(?direction, %scale, half_spread, "inventory skew");
    } else if tfmd < 0 {
        half_spread = half_spread
            .checked_mul(MAX_INVENTORY_SKEW)
            .ok_or(MathError::overflow("max inventory skew"))?;
        trace!(?direction, half_spread, "fee pool in deficit, max skew");
    }

    Ok(half_spread)
}

/// `min(5, 1 + leverage)`, pulled toward the target cap when it would overshoot
fn inventory_scale(
    amm: &AmmState,
    mark_price: u128,
    half_spread: u128,
    policy: SpreadPolicy,
) -> AmmResult<Decimal> {
    let max_skew = Decimal::from_u128(MAX_INVENTORY_SKEW).ok_or(cast_failed("u128"))?;

    let leverage = if amm.total_fee_minus_distributions <= 0 {
        max_skew
    } else {
        effective_leverage(amm, mark_price, policy)?
    };

    let mut scale = max_skew.min(
        Decimal::ONE
            .checked_add(leverage)
            .ok_or(MathError::overflow("inventory scale"))?,
    );

    let half = Decimal::from_u128(half_spread).ok_or(cast_failed("u128"))?;
    let max_target = Decimal::from_u128(MAX_TARGET_SPREAD).ok_or(cast_failed("u128"))?;
    let skewed = scale
        .checked_mul(half)
        .ok_or(MathError::overflow("skewed half spread"))?;
    if half > Decimal::ZERO && skewed > max_target {
        // lowest scale applied once the target cap kicks in
        scale = dec!(1.05).max(max_target / half);
    }

    Ok(scale)
}

/// Gap between the mark value of the net position and its terminal value,
/// relative to the fee pool. Floored at 0 so the base spread stays a floor.
fn effective_leverage(
    amm: &AmmState,
    mark_price: u128,
    policy: SpreadPolicy,
) -> AmmResult<Decimal> {
    let net_value = net_base_asset_value(amm)?;
    let local_value = local_base_asset_value(amm, mark_price)?;

    let gap = match policy {
        SpreadPolicy::CostBasis => {
            let cost_basis = amm.net_cost_basis()?;
            let local_pnl = local_value
                .checked_sub(cost_basis)
                .ok_or(MathError::underflow("local pnl"))?;
            let net_pnl = net_value
                .checked_sub(cost_basis)
                .ok_or(MathError::underflow("net pnl"))?;
            local_pnl
                .checked_sub(net_pnl)
                .ok_or(MathError::underflow("pnl gap"))?
        }
        SpreadPolicy::MarkToTerminal => local_value
            .checked_sub(net_value)
            .ok_or(MathError::underflow("value gap"))?,
    };

    let fee_pool = amm
        .total_fee_minus_distributions
        .checked_add(1)
        .ok_or(MathError::overflow("fee pool"))?;

    let gap = Decimal::from_i128(gap).ok_or(cast_failed("i128"))?;
    let fee_pool = Decimal::from_i128(fee_pool).ok_or(cast_failed("i128"))?;
    let mut leverage = gap
        .checked_div(fee_pool)
        .ok_or(MathError::division_by_zero("effective leverage"))?;

    if policy == SpreadPolicy::MarkToTerminal {
        let quote_precision =
            Decimal::from_u128(QUOTE_PRECISION).ok_or(cast_failed("u128"))?;
        leverage = leverage
            .checked_add(Decimal::ONE / quote_precision)
            .ok_or(MathError::overflow("effective leverage"))?;
    }

    Ok(leverage.max(Decimal::ZERO))
}

/// Quote value the curve pays out when the net inventory closes
fn net_base_asset_value(amm: &AmmState) -> AmmResult<i128> {
    let value = cast_to_i128(amm.quote_asset_reserve)?
        .checked_sub(cast_to_i128(amm.terminal_quote_asset_reserve)?)
        .ok_or(MathError::underflow("net base asset value"))?
        .checked_mul(cast_to_i128(amm.peg_multiplier)?)
        .ok_or(MathError::overflow("net base asset value"))?
        / AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO_I128;
    Ok(value)
}

/// Net inventory valued at the mark price
fn local_base_asset_value(amm: &AmmState, mark_price: u128) -> AmmResult<i128> {
    let value = amm
        .net_base_asset_amount
        .checked_mul(cast_to_i128(mark_price)?)
        .ok_or(MathError::overflow("local base asset value"))?
        / (AMM_TO_QUOTE_PRECISION_RATIO_I128 * PRICE_PRECISION_I128);
    Ok(value)
}

fn apply_scale(half_spread: u128, scale: Decimal) -> AmmResult<u128> {
    let half = Decimal::from_u128(half_spread).ok_or(cast_failed("u128"))?;
    let scaled = half
        .checked_mul(scale)
        .ok_or(MathError::overflow("scaled half spread"))?
        .floor();
    Ok(scaled.to_u128().ok_or(MathError::CastFailed {
        value_hint: "Decimal",
        target: "u128",
    })?)
}

fn cast_failed(value_hint: &'static str) -> MathError {
    MathError::CastFailed {
        value_hint,
        target: "Decimal",
    }
}
