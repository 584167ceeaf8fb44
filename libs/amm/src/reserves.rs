//! One-sided quoting reserves
//!
//! The spread is expressed by shifting the quote reserve: the ask side adds
//! `quote × spread`, the bid side removes it, and the base reserve is rebuilt
//! from the invariant. Projections are returned as values and never written
//! back into [`AmmState`].

use crate::cost::CurveCostModel;
use crate::error::{AmmError, AmmResult};
use crate::repeg::calculate_updated_amm;
use crate::spread::calculate_spread_with_policy;
use crate::state::AmmState;
use serde::{Deserialize, Serialize};
use vamm_types::common::fixed_point::TryToU128;
use vamm_types::precision::SPREAD_PRECISION;
use vamm_types::{MathError, OraclePriceData, PositionDirection, SpreadPolicy, U256};

/// Reserves a one-sided quote is priced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadReserves {
    pub base_asset_reserve: u128,
    pub quote_asset_reserve: u128,
}

/// Spread reserves of the repegged curve, with the curve's new depth and peg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedReserves {
    pub base_asset_reserve: u128,
    pub quote_asset_reserve: u128,
    pub sqrt_k: u128,
    pub new_peg: u128,
}

/// Shift `amm`'s reserves by the half spread for `direction`
pub fn calculate_spread_reserves(
    amm: &AmmState,
    direction: PositionDirection,
    oracle: &OraclePriceData,
    policy: SpreadPolicy,
) -> AmmResult<SpreadReserves> {
    let canonical = SpreadReserves {
        base_asset_reserve: amm.base_asset_reserve,
        quote_asset_reserve: amm.quote_asset_reserve,
    };

    let spread = calculate_spread_with_policy(amm, direction, oracle, policy)?;
    let half_spread = spread / 2;
    if half_spread == 0 {
        return Ok(canonical);
    }

    let divisor = SPREAD_PRECISION / half_spread;
    if divisor == 0 {
        return Err(AmmError::SpreadExceedsReserves { half_spread });
    }
    let quote_delta = amm.quote_asset_reserve / divisor;

    let quote_asset_reserve = match direction {
        PositionDirection::Long => amm
            .quote_asset_reserve
            .checked_add(quote_delta)
            .ok_or(MathError::overflow("ask quote reserve"))?,
        PositionDirection::Short => {
            if quote_delta >= amm.quote_asset_reserve {
                return Err(AmmError::SpreadExceedsReserves { half_spread });
            }
            amm.quote_asset_reserve - quote_delta
        }
    };

    let base_asset_reserve = amm
        .invariant()?
        .checked_div(U256::from(quote_asset_reserve))
        .ok_or(MathError::division_by_zero("spread base reserve"))?
        .try_to_u128()?;

    Ok(SpreadReserves {
        base_asset_reserve,
        quote_asset_reserve,
    })
}

/// Repeg `amm` toward the oracle, then shift the result by the spread
pub fn calculate_updated_spread_reserves<C: CurveCostModel + ?Sized>(
    amm: &AmmState,
    direction: PositionDirection,
    oracle: &OraclePriceData,
    costs: &C,
    policy: SpreadPolicy,
) -> AmmResult<ProjectedReserves> {
    let updated = calculate_updated_amm(amm, oracle, costs)?;
    let reserves = calculate_spread_reserves(&updated, direction, oracle, policy)?;

    Ok(ProjectedReserves {
        base_asset_reserve: reserves.base_asset_reserve,
        quote_asset_reserve: reserves.quote_asset_reserve,
        sqrt_k: updated.sqrt_k,
        new_peg: updated.peg_multiplier,
    })
}
