//! Virtual AMM reserve state
//!
//! `AmmState` is plain `Copy` data. Derived states (K-shrunk copies, repegged
//! curves, terminal recomputation) are produced by the `with_*` methods, which
//! take `self` by value and hand back an independent value.

use crate::error::AmmResult;
use crate::price::calculate_price;
use crate::swap::{calculate_reserves_after_swap, swap_direction_for};
use serde::{Deserialize, Serialize};
use vamm_types::common::fixed_point::{
    cast_to_i128, cast_to_u128, integer_sqrt, invariant_from_sqrt_k, mul_div, TryToU128,
};
use vamm_types::{AssetType, MathError, PositionDirection, U256};

/// Reserves, peg and fee accounting of one perpetual market's curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmmState {
    pub base_asset_reserve: u128,
    pub quote_asset_reserve: u128,
    pub sqrt_k: u128,
    pub peg_multiplier: u128,
    /// Net base position traders hold against the curve; positive closes SHORT
    pub net_base_asset_amount: i128,
    pub terminal_quote_asset_reserve: u128,
    pub total_exchange_fee: u128,
    pub total_fee_minus_distributions: i128,
    /// Symmetric floor spread in spread precision
    pub base_spread: u32,
    /// 0 disables repeg and spread adjustment
    pub curve_update_intensity: u8,
    pub quote_asset_amount_long: u128,
    pub quote_asset_amount_short: u128,
}

impl AmmState {
    /// Balanced curve with `sqrt_k = floor(sqrt(base × quote))` and no open inventory.
    ///
    /// The quote reserve is rebuilt as `sqrt_k² / base`, so a non-square
    /// product loses the floored remainder from the quote side.
    pub fn new(
        base_asset_reserve: u128,
        quote_asset_reserve: u128,
        peg_multiplier: u128,
    ) -> AmmResult<Self> {
        let k = U256::from(base_asset_reserve)
            .checked_mul(U256::from(quote_asset_reserve))
            .ok_or(MathError::overflow("base × quote"))?;
        let sqrt_k = integer_sqrt(k).try_to_u128()?;
        let quote_asset_reserve = invariant_from_sqrt_k(sqrt_k)?
            .checked_div(U256::from(base_asset_reserve))
            .ok_or(MathError::division_by_zero("initial quote reserve"))?
            .try_to_u128()?;

        Ok(Self {
            base_asset_reserve,
            quote_asset_reserve,
            sqrt_k,
            peg_multiplier,
            terminal_quote_asset_reserve: quote_asset_reserve,
            ..Self::default()
        })
    }

    pub fn with_base_spread(mut self, base_spread: u32) -> Self {
        self.base_spread = base_spread;
        self
    }

    pub fn with_curve_update_intensity(mut self, intensity: u8) -> Self {
        self.curve_update_intensity = intensity;
        self
    }

    pub fn with_fees(mut self, total_exchange_fee: u128, total_fee_minus_distributions: i128) -> Self {
        self.total_exchange_fee = total_exchange_fee;
        self.total_fee_minus_distributions = total_fee_minus_distributions;
        self
    }

    pub fn with_cost_basis(mut self, quote_asset_amount_long: u128, quote_asset_amount_short: u128) -> Self {
        self.quote_asset_amount_long = quote_asset_amount_long;
        self.quote_asset_amount_short = quote_asset_amount_short;
        self
    }

    /// Set the net inventory and recompute the terminal quote reserve for it
    pub fn with_net_base_asset_amount(mut self, net_base_asset_amount: i128) -> AmmResult<Self> {
        self.net_base_asset_amount = net_base_asset_amount;
        self.with_recomputed_terminal()
    }

    /// Constant-product invariant `sqrt_k²`
    pub fn invariant(&self) -> AmmResult<U256> {
        Ok(invariant_from_sqrt_k(self.sqrt_k)?)
    }

    /// Scale depth by `numerator / denominator`.
    ///
    /// Base reserve and `sqrt_k` are scaled directly; the quote reserve is
    /// rebuilt from the invariant so `sqrt_k² / base == quote` holds exactly.
    /// The terminal reserve is left untouched.
    pub fn with_scaled_k(mut self, numerator: u128, denominator: u128) -> AmmResult<Self> {
        self.base_asset_reserve = mul_div(self.base_asset_reserve, numerator, denominator)?;
        self.sqrt_k = mul_div(self.sqrt_k, numerator, denominator)?;
        self.quote_asset_reserve = self
            .invariant()?
            .checked_div(U256::from(self.base_asset_reserve))
            .ok_or(MathError::division_by_zero("rebuild quote reserve"))?
            .try_to_u128()?;
        Ok(self)
    }

    /// Recompute `terminal_quote_asset_reserve` by simulating a full close of
    /// the net inventory against the current reserves
    pub fn with_recomputed_terminal(mut self) -> AmmResult<Self> {
        let (terminal_quote, _terminal_base) = self.terminal_reserves()?;
        self.terminal_quote_asset_reserve = terminal_quote;
        Ok(self)
    }

    /// `(quote, base)` reserves after closing the net inventory
    pub fn terminal_reserves(&self) -> AmmResult<(u128, u128)> {
        let direction_to_close = PositionDirection::to_close(self.net_base_asset_amount);
        let close_amount = self
            .net_base_asset_amount
            .checked_abs()
            .ok_or(MathError::overflow("net base asset amount abs"))?;

        calculate_reserves_after_swap(
            self,
            AssetType::Base,
            close_amount,
            swap_direction_for(AssetType::Base, direction_to_close),
        )
    }

    /// Price implied by the current reserves and peg
    pub fn mark_price(&self) -> AmmResult<u128> {
        calculate_price(
            self.base_asset_reserve,
            self.quote_asset_reserve,
            self.peg_multiplier,
        )
    }

    /// Fee surplus available for repegging: half of all exchange fees stay
    /// reserved, the remainder of `total_fee_minus_distributions` may be spent
    pub fn repeg_budget(&self) -> AmmResult<u128> {
        let reserved = cast_to_i128(self.total_exchange_fee / 2)?;
        let budget = self
            .total_fee_minus_distributions
            .checked_sub(reserved)
            .ok_or(MathError::underflow("repeg budget"))?
            .max(0);
        Ok(cast_to_u128(budget)?)
    }

    /// Net quote cost basis of trader positions (long minus short)
    pub fn net_cost_basis(&self) -> AmmResult<i128> {
        Ok(cast_to_i128(self.quote_asset_amount_long)?
            .checked_sub(cast_to_i128(self.quote_asset_amount_short)?)
            .ok_or(MathError::underflow("net cost basis"))?)
    }
}

/// A perpetual market as seen by the pricing core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Market {
    pub market_index: u64,
    pub amm: AmmState,
}

impl Market {
    pub fn new(market_index: u64, amm: AmmState) -> Self {
        Self { market_index, amm }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vamm_types::precision::{AMM_RESERVE_PRECISION, PEG_PRECISION, PRICE_PRECISION};

    fn balanced() -> AmmState {
        AmmState::new(
            1_000 * AMM_RESERVE_PRECISION,
            1_000 * AMM_RESERVE_PRECISION,
            50 * PEG_PRECISION,
        )
        .unwrap()
    }

    #[test]
    fn test_new_sets_exact_invariant() {
        let amm = balanced();
        assert_eq!(amm.sqrt_k, 1_000 * AMM_RESERVE_PRECISION);
        assert_eq!(amm.terminal_quote_asset_reserve, amm.quote_asset_reserve);
        assert_eq!(amm.mark_price().unwrap(), 50 * PRICE_PRECISION);
    }

    #[test]
    fn test_new_rebuilds_quote_for_non_square_product() {
        let amm = AmmState::new(2 * AMM_RESERVE_PRECISION, AMM_RESERVE_PRECISION, PEG_PRECISION)
            .unwrap();
        assert_eq!(amm.sqrt_k, 14_142_135_623_730);
        assert_eq!(amm.quote_asset_reserve, 9_999_999_999_998);
        assert_eq!(amm.terminal_quote_asset_reserve, amm.quote_asset_reserve);
        assert_eq!(
            amm.invariant().unwrap() / U256::from(amm.base_asset_reserve),
            U256::from(amm.quote_asset_reserve)
        );
    }

    #[test]
    fn test_scaled_k_rebuilds_quote_from_invariant() {
        let amm = balanced();
        let shrunk = amm.with_scaled_k(999, 1000).unwrap();

        assert_eq!(shrunk.base_asset_reserve, 999 * AMM_RESERVE_PRECISION);
        assert_eq!(shrunk.sqrt_k, 999 * AMM_RESERVE_PRECISION);
        let expected_quote = shrunk.invariant().unwrap() / U256::from(shrunk.base_asset_reserve);
        assert_eq!(U256::from(shrunk.quote_asset_reserve), expected_quote);
        // source value is untouched
        assert_eq!(amm.base_asset_reserve, 1_000 * AMM_RESERVE_PRECISION);
    }

    #[test]
    fn test_terminal_reserve_for_net_long() {
        let amm = balanced()
            .with_net_base_asset_amount(10 * AMM_RESERVE_PRECISION as i128)
            .unwrap();

        // closing a long adds base to the pool, so quote shrinks
        assert_eq!(amm.terminal_quote_asset_reserve, 9_900_990_099_009_900);
        assert!(amm.terminal_quote_asset_reserve < amm.quote_asset_reserve);
    }

    #[test]
    fn test_terminal_reserve_for_net_short() {
        let amm = balanced()
            .with_net_base_asset_amount(-(10 * AMM_RESERVE_PRECISION as i128))
            .unwrap();

        assert!(amm.terminal_quote_asset_reserve > amm.quote_asset_reserve);
    }

    #[test]
    fn test_repeg_budget_floors_at_zero() {
        let amm = balanced().with_fees(100, 40);
        assert_eq!(amm.repeg_budget().unwrap(), 0);

        let amm = balanced().with_fees(100, 70);
        assert_eq!(amm.repeg_budget().unwrap(), 20);

        let amm = balanced().with_fees(0, -5);
        assert_eq!(amm.repeg_budget().unwrap(), 0);
    }

    #[test]
    fn test_state_serializes_by_field_name() {
        let amm = balanced().with_base_spread(1_000);
        let json = serde_json::to_string(&amm).unwrap();
        assert!(json.contains("\"base_spread\":1000"));

        let back: AmmState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amm);
    }

    #[test]
    fn test_net_cost_basis() {
        let amm = balanced().with_cost_basis(300, 500);
        assert_eq!(amm.net_cost_basis().unwrap(), -200);
    }
}
