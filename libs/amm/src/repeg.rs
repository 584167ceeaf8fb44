//! Repeg and K-adjustment decisioning
//!
//! Moves the peg toward the oracle when the fee pool can pay for it. When it
//! cannot, depth is shrunk by a fixed ratio first: a shrink frees fee pool
//! surplus, and the peg then walks as far toward the oracle as the enlarged
//! budget allows.

use crate::cost::CurveCostModel;
use crate::error::{AmmError, AmmResult};
use crate::state::AmmState;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vamm_types::common::fixed_point::{cast_to_i128, cast_to_u128, TryToU128};
use vamm_types::precision::{to_decimal, PRICE_TO_PEG_PRECISION_RATIO};
use vamm_types::{MathError, OraclePriceData, U192};

/// Depth shrink applied when the repeg cannot be funded from fees
pub const K_SHRINK_NUMERATOR: u128 = 999;
pub const K_SHRINK_DENOMINATOR: u128 = 1000;

/// Outcome of one repeg evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepegDecision {
    /// Fee pool cost of the new peg, quote precision (negative is a surplus)
    pub cost: i128,
    pub k_numerator: u128,
    pub k_denominator: u128,
    pub new_peg: u128,
}

impl RepegDecision {
    /// True when the decision scales depth
    pub fn adjusts_k(&self) -> bool {
        self.k_numerator != self.k_denominator
    }
}

/// Peg that prices the current reserves at `target_price`, rounded half up.
///
/// Never returns 0: a peg of 0 would make every later price computation
/// degenerate.
pub fn calculate_peg_from_target_price(
    base_asset_reserve: u128,
    quote_asset_reserve: u128,
    target_price: u128,
) -> AmmResult<u128> {
    let scaled = U192::from(target_price)
        .checked_mul(U192::from(base_asset_reserve))
        .ok_or(MathError::overflow("target price × base"))?
        .checked_div(U192::from(quote_asset_reserve))
        .ok_or(MathError::division_by_zero("target peg"))?;

    let peg = scaled
        .checked_add(U192::from(PRICE_TO_PEG_PRECISION_RATIO / 2))
        .ok_or(MathError::overflow("target peg rounding"))?
        / U192::from(PRICE_TO_PEG_PRECISION_RATIO);

    Ok(peg.try_to_u128()?.max(1))
}

/// Peg that would price `amm` at the oracle price
pub fn calculate_target_peg(amm: &AmmState, oracle: &OraclePriceData) -> AmmResult<u128> {
    let oracle_price = validated_oracle_price(oracle)?;
    calculate_peg_from_target_price(
        amm.base_asset_reserve,
        amm.quote_asset_reserve,
        oracle_price,
    )
}

fn validated_oracle_price(oracle: &OraclePriceData) -> AmmResult<u128> {
    if oracle.price <= 0 {
        return Err(AmmError::InvalidOraclePrice {
            price: oracle.price,
        });
    }
    Ok(cast_to_u128(oracle.price)?)
}

/// Decide the new peg and whether depth must shrink to afford it
pub fn calculate_repeg_decision<C: CurveCostModel + ?Sized>(
    amm: &AmmState,
    oracle: &OraclePriceData,
    costs: &C,
) -> AmmResult<RepegDecision> {
    let oracle_price = validated_oracle_price(oracle)?;
    let target_peg = calculate_peg_from_target_price(
        amm.base_asset_reserve,
        amm.quote_asset_reserve,
        oracle_price,
    )?;

    let pre_peg_cost = costs.repeg_cost(amm, target_peg)?;
    let budget = amm.repeg_budget()?;

    if pre_peg_cost <= cast_to_i128(budget)? {
        let decision = RepegDecision {
            cost: pre_peg_cost,
            k_numerator: 1,
            k_denominator: 1,
            new_peg: target_peg,
        };
        debug!(
            cost = decision.cost,
            new_peg = decision.new_peg,
            budget,
            "repeg within budget"
        );
        return Ok(decision);
    }

    let deficit_made_up = costs.adjust_k_cost(amm, K_SHRINK_NUMERATOR, K_SHRINK_DENOMINATOR)?;
    if deficit_made_up > 0 {
        return Err(AmmError::InvalidKAdjustment {
            numerator: K_SHRINK_NUMERATOR,
            denominator: K_SHRINK_DENOMINATOR,
            cost: deficit_made_up,
        });
    }

    let new_budget = budget
        .checked_add(deficit_made_up.unsigned_abs())
        .ok_or(MathError::overflow("repeg budget after k shrink"))?;

    let shrunk = amm
        .with_scaled_k(K_SHRINK_NUMERATOR, K_SHRINK_DENOMINATOR)?
        .with_recomputed_terminal()?;

    warn!(
        oracle_price = ?to_decimal(oracle.price, 10),
        pre_peg_cost,
        budget,
        new_budget,
        target_peg,
        "repeg over budget, shrinking k"
    );

    let new_peg = costs.budgeted_peg(&shrunk, new_budget, oracle_price)?;
    let cost = costs.repeg_cost(&shrunk, new_peg)?;

    debug!(cost, new_peg, target_peg, "repeg with k shrink");

    Ok(RepegDecision {
        cost,
        k_numerator: K_SHRINK_NUMERATOR,
        k_denominator: K_SHRINK_DENOMINATOR,
        new_peg,
    })
}

/// Apply the repeg decision and return the resulting curve.
///
/// A curve with `curve_update_intensity == 0` is returned unchanged.
pub fn calculate_updated_amm<C: CurveCostModel + ?Sized>(
    amm: &AmmState,
    oracle: &OraclePriceData,
    costs: &C,
) -> AmmResult<AmmState> {
    if amm.curve_update_intensity == 0 {
        return Ok(*amm);
    }

    let decision = calculate_repeg_decision(amm, oracle, costs)?;

    let mut updated = amm.with_scaled_k(decision.k_numerator, decision.k_denominator)?;
    updated.peg_multiplier = decision.new_peg;
    let mut updated = updated.with_recomputed_terminal()?;

    updated.total_fee_minus_distributions = updated
        .total_fee_minus_distributions
        .checked_sub(decision.cost)
        .ok_or(MathError::underflow("fee pool after repeg"))?;

    Ok(updated)
}
