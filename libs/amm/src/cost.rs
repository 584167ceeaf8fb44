//! Curve adjustment cost model
//!
//! The repeg decision only needs three answers from the fee accounting side:
//! what a peg move costs, what a depth change costs, and how far the peg can
//! move for a given budget. [`CurveCostModel`] is that seam;
//! [`ConstantProductCostModel`] answers it with closed-form constant-product
//! math.
//!
//! Sign convention for every cost: positive is an expense paid from the fee
//! pool, negative is a surplus returned to it. Costs are in quote precision.

use crate::error::AmmResult;
use crate::repeg::calculate_peg_from_target_price;
use crate::state::AmmState;
use vamm_types::common::fixed_point::{cast_to_i128, mul_div, TryToU128};
use vamm_types::precision::{
    AMM_TO_QUOTE_PRECISION_RATIO, AMM_TO_QUOTE_PRECISION_RATIO_I128, PEG_PRECISION,
    PRICE_PRECISION,
};
use vamm_types::{MathError, U256};

/// Cost primitives consumed by the repeg decision
pub trait CurveCostModel {
    /// Cost of moving the peg to `new_peg` with reserves held fixed
    fn repeg_cost(&self, amm: &AmmState, new_peg: u128) -> AmmResult<i128>;

    /// Cost of scaling depth by `numerator / denominator`.
    ///
    /// A shrink (`numerator < denominator`) must never be an expense.
    fn adjust_k_cost(&self, amm: &AmmState, numerator: u128, denominator: u128)
        -> AmmResult<i128>;

    /// Peg closest to `target_price` whose repeg cost stays within `budget`
    fn budgeted_peg(&self, amm: &AmmState, budget: u128, target_price: u128) -> AmmResult<u128>;
}

/// Closed-form costs for a constant product curve
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantProductCostModel;

impl ConstantProductCostModel {
    pub fn new() -> Self {
        Self
    }

    /// `quote - terminal_quote`: the quote reserve traders would take out on close
    fn terminal_quote_delta(amm: &AmmState) -> AmmResult<i128> {
        Ok(cast_to_i128(amm.quote_asset_reserve)?
            .checked_sub(cast_to_i128(amm.terminal_quote_asset_reserve)?)
            .ok_or(MathError::underflow("terminal quote delta"))?)
    }
}

impl CurveCostModel for ConstantProductCostModel {
    fn repeg_cost(&self, amm: &AmmState, new_peg: u128) -> AmmResult<i128> {
        let quote_delta = Self::terminal_quote_delta(amm)?;
        let peg_delta = cast_to_i128(new_peg)?
            .checked_sub(cast_to_i128(amm.peg_multiplier)?)
            .ok_or(MathError::underflow("peg delta"))?;

        let cost = quote_delta
            .checked_mul(peg_delta)
            .ok_or(MathError::overflow("repeg cost"))?
            / AMM_TO_QUOTE_PRECISION_RATIO_I128
            / PEG_PRECISION as i128;

        Ok(cost)
    }

    fn adjust_k_cost(
        &self,
        amm: &AmmState,
        numerator: u128,
        denominator: u128,
    ) -> AmmResult<i128> {
        let net = amm.net_base_asset_amount;
        if net == 0 {
            return Ok(0);
        }

        // Value the curve pays out to close `net` before and after scaling x by p:
        //   y·Q·d / (x + d)  vs  y·Q·d·p / (x·p + d)
        let p = mul_div(numerator, PRICE_PRECISION, denominator)?;
        let x = cast_to_i128(amm.base_asset_reserve)?;
        let x_scaled = cast_to_i128(mul_div(amm.base_asset_reserve, p, PRICE_PRECISION)?)?;

        let x_plus_d = x
            .checked_add(net)
            .filter(|v| *v > 0)
            .ok_or(MathError::underflow("base reserve + net base"))?;
        let x_scaled_plus_d = x_scaled
            .checked_add(net)
            .filter(|v| *v > 0)
            .ok_or(MathError::underflow("scaled base reserve + net base"))?;

        let quote_scale = U256::from(amm.quote_asset_reserve)
            .checked_mul(U256::from(net.unsigned_abs()))
            .and_then(|v| v.checked_mul(U256::from(amm.peg_multiplier)))
            .ok_or(MathError::overflow("adjust k quote scale"))?;

        let before = quote_scale
            .checked_div(U256::from(x_plus_d.unsigned_abs()))
            .ok_or(MathError::division_by_zero("adjust k before"))?
            .try_to_u128()?;
        let after = quote_scale
            .checked_mul(U256::from(p))
            .ok_or(MathError::overflow("adjust k after"))?
            / U256::from(PRICE_PRECISION)
            / U256::from(x_scaled_plus_d.unsigned_abs());
        let after = after.try_to_u128()?;

        let payout_change = cast_to_i128(before)?
            .checked_sub(cast_to_i128(after)?)
            .ok_or(MathError::underflow("adjust k payout change"))?
            * net.signum();

        Ok(-payout_change / AMM_TO_QUOTE_PRECISION_RATIO_I128 / PEG_PRECISION as i128)
    }

    fn budgeted_peg(&self, amm: &AmmState, budget: u128, target_price: u128) -> AmmResult<u128> {
        let current_peg = amm.peg_multiplier;
        let target_peg = calculate_peg_from_target_price(
            amm.base_asset_reserve,
            amm.quote_asset_reserve,
            target_price,
        )?;
        if target_peg == current_peg {
            return Ok(current_peg);
        }

        let budget_i128 = cast_to_i128(budget)?;
        if self.repeg_cost(amm, target_peg)? <= budget_i128 {
            return Ok(target_peg);
        }

        // cost is linear in the peg delta: |Δquote| × Δpeg / (AMM_TO_QUOTE × PEG)
        let quote_delta = Self::terminal_quote_delta(amm)?.unsigned_abs();
        let max_peg_delta = mul_div(
            budget,
            AMM_TO_QUOTE_PRECISION_RATIO * PEG_PRECISION,
            quote_delta,
        )?;

        let new_peg = if target_peg > current_peg {
            current_peg.saturating_add(max_peg_delta).min(target_peg)
        } else {
            current_peg
                .saturating_sub(max_peg_delta)
                .max(target_peg)
                .max(1)
        };

        Ok(new_peg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vamm_types::precision::{AMM_RESERVE_PRECISION, PRICE_PRECISION, QUOTE_PRECISION};

    fn net_long_pool() -> AmmState {
        AmmState::new(
            1_000 * AMM_RESERVE_PRECISION,
            1_000 * AMM_RESERVE_PRECISION,
            50 * PEG_PRECISION,
        )
        .unwrap()
        .with_net_base_asset_amount(10 * AMM_RESERVE_PRECISION as i128)
        .unwrap()
    }

    #[test]
    fn test_repeg_cost_of_flat_inventory_is_zero() {
        let amm = AmmState::new(
            1_000 * AMM_RESERVE_PRECISION,
            1_000 * AMM_RESERVE_PRECISION,
            50 * PEG_PRECISION,
        )
        .unwrap();
        let costs = ConstantProductCostModel::new();
        assert_eq!(costs.repeg_cost(&amm, 60 * PEG_PRECISION).unwrap(), 0);
    }

    #[test]
    fn test_repeg_cost_sign() {
        let amm = net_long_pool();
        let costs = ConstantProductCostModel::new();

        // raising the peg under net long inventory pays traders
        let up = costs.repeg_cost(&amm, 55 * PEG_PRECISION).unwrap();
        assert_eq!(up, 49_504_950);
        let down = costs.repeg_cost(&amm, 45 * PEG_PRECISION).unwrap();
        assert_eq!(down, -49_504_950);
    }

    #[test]
    fn test_shrinking_k_frees_fee_pool() {
        let costs = ConstantProductCostModel::new();

        let long = net_long_pool();
        assert!(costs.adjust_k_cost(&long, 999, 1000).unwrap() < 0);

        let short = net_long_pool()
            .with_net_base_asset_amount(-(10 * AMM_RESERVE_PRECISION as i128))
            .unwrap();
        assert!(costs.adjust_k_cost(&short, 999, 1000).unwrap() < 0);

        // growing depth costs the pool
        assert!(costs.adjust_k_cost(&long, 1001, 1000).unwrap() > 0);
    }

    #[test]
    fn test_adjust_k_cost_without_inventory() {
        let amm = AmmState::new(AMM_RESERVE_PRECISION, AMM_RESERVE_PRECISION, PEG_PRECISION).unwrap();
        let costs = ConstantProductCostModel::new();
        assert_eq!(costs.adjust_k_cost(&amm, 999, 1000).unwrap(), 0);
    }

    #[test]
    fn test_budgeted_peg_reaches_affordable_target() {
        let amm = net_long_pool();
        let costs = ConstantProductCostModel::new();

        let peg = costs
            .budgeted_peg(&amm, 100 * QUOTE_PRECISION, 55 * PRICE_PRECISION)
            .unwrap();
        assert_eq!(peg, 55 * PEG_PRECISION);
    }

    #[test]
    fn test_budgeted_peg_stops_at_budget() {
        let amm = net_long_pool();
        let costs = ConstantProductCostModel::new();
        let budget = 20 * QUOTE_PRECISION;

        let peg = costs.budgeted_peg(&amm, budget, 55 * PRICE_PRECISION).unwrap();
        assert!(peg > 50 * PEG_PRECISION);
        assert!(peg < 55 * PEG_PRECISION);
        assert!(costs.repeg_cost(&amm, peg).unwrap() <= budget as i128);
    }

    #[test]
    fn test_budgeted_peg_moves_down_for_free() {
        let amm = net_long_pool();
        let costs = ConstantProductCostModel::new();

        // lowering the peg under net long inventory is a surplus
        let peg = costs.budgeted_peg(&amm, 0, 45 * PRICE_PRECISION).unwrap();
        assert_eq!(peg, 45 * PEG_PRECISION);
    }
}
