//! Pricing facade bound to one cost model and spread policy
//!
//! The free functions in this crate take the cost model and policy on every
//! call. `AmmCalculator` binds both once so a market's pricing loop can hold a
//! single value.

use crate::cost::{ConstantProductCostModel, CurveCostModel};
use crate::error::AmmResult;
use crate::price::{calculate_bid_ask_price, calculate_mark_price};
use crate::repeg::{calculate_repeg_decision, calculate_updated_amm, RepegDecision};
use crate::reserves::{
    calculate_spread_reserves, calculate_updated_spread_reserves, ProjectedReserves,
    SpreadReserves,
};
use crate::sizing::{calculate_max_base_asset_amount_to_trade, calculate_terminal_price};
use crate::spread::calculate_spread_with_policy;
use crate::state::{AmmState, Market};
use vamm_types::{OraclePriceData, PositionDirection, SpreadPolicy};

/// Runs the repeg, spread and sizing pipeline for one cost model
#[derive(Debug, Clone, Default)]
pub struct AmmCalculator<C = ConstantProductCostModel> {
    costs: C,
    policy: SpreadPolicy,
}

impl AmmCalculator<ConstantProductCostModel> {
    /// Constant-product costs with the given spread policy
    pub fn constant_product(policy: SpreadPolicy) -> Self {
        Self::new(ConstantProductCostModel, policy)
    }
}

impl<C: CurveCostModel> AmmCalculator<C> {
    pub fn new(costs: C, policy: SpreadPolicy) -> Self {
        Self { costs, policy }
    }

    pub fn costs(&self) -> &C {
        &self.costs
    }

    pub fn policy(&self) -> SpreadPolicy {
        self.policy
    }

    pub fn decide_repeg(
        &self,
        amm: &AmmState,
        oracle: &OraclePriceData,
    ) -> AmmResult<RepegDecision> {
        calculate_repeg_decision(amm, oracle, &self.costs)
    }

    pub fn update_amm(&self, amm: &AmmState, oracle: &OraclePriceData) -> AmmResult<AmmState> {
        calculate_updated_amm(amm, oracle, &self.costs)
    }

    pub fn spread(
        &self,
        amm: &AmmState,
        direction: PositionDirection,
        oracle: &OraclePriceData,
    ) -> AmmResult<u128> {
        calculate_spread_with_policy(amm, direction, oracle, self.policy)
    }

    pub fn spread_reserves(
        &self,
        amm: &AmmState,
        direction: PositionDirection,
        oracle: &OraclePriceData,
    ) -> AmmResult<SpreadReserves> {
        calculate_spread_reserves(amm, direction, oracle, self.policy)
    }

    pub fn project_spread_reserves(
        &self,
        amm: &AmmState,
        direction: PositionDirection,
        oracle: &OraclePriceData,
    ) -> AmmResult<ProjectedReserves> {
        calculate_updated_spread_reserves(amm, direction, oracle, &self.costs, self.policy)
    }

    pub fn mark_price(&self, amm: &AmmState, oracle: &OraclePriceData) -> AmmResult<u128> {
        calculate_mark_price(amm, oracle, &self.costs)
    }

    /// `(bid, ask)` of the repegged curve
    pub fn bid_ask_price(
        &self,
        amm: &AmmState,
        oracle: &OraclePriceData,
    ) -> AmmResult<(u128, u128)> {
        calculate_bid_ask_price(amm, oracle, &self.costs, self.policy)
    }

    pub fn terminal_price(&self, market: &Market) -> AmmResult<u128> {
        calculate_terminal_price(market)
    }

    pub fn max_trade_size(
        &self,
        amm: &AmmState,
        limit_price: u128,
        direction: PositionDirection,
        oracle: Option<&OraclePriceData>,
    ) -> AmmResult<(u128, PositionDirection)> {
        calculate_max_base_asset_amount_to_trade(
            amm,
            limit_price,
            direction,
            oracle,
            &self.costs,
            self.policy,
        )
    }
}
