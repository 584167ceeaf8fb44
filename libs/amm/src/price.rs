//! Reserve to price conversion and bid/ask quoting

use crate::cost::CurveCostModel;
use crate::error::AmmResult;
use crate::repeg::calculate_updated_amm;
use crate::reserves::calculate_spread_reserves;
use crate::state::AmmState;
use tracing::debug;
use vamm_types::common::fixed_point::{cast_to_i128, TryToU128};
use vamm_types::precision::{PEG_PRECISION, PRICE_PRECISION, SPREAD_PRECISION_I128};
use vamm_types::{MathError, OraclePriceData, PositionDirection, SpreadPolicy, U192};

/// `quote × PRICE_PRECISION × peg / (PEG_PRECISION × base)`.
///
/// A zero base reserve prices at 0 rather than failing: the state is
/// degenerate but a read-only query must not abort on it.
pub fn calculate_price(
    base_asset_reserve: u128,
    quote_asset_reserve: u128,
    peg_multiplier: u128,
) -> AmmResult<u128> {
    if base_asset_reserve == 0 {
        return Ok(0);
    }

    let price = U192::from(quote_asset_reserve)
        .checked_mul(U192::from(PRICE_PRECISION))
        .and_then(|v| v.checked_mul(U192::from(peg_multiplier)))
        .ok_or(MathError::overflow("price numerator"))?
        .checked_div(U192::from(PEG_PRECISION) * U192::from(base_asset_reserve))
        .ok_or(MathError::division_by_zero("price"))?
        .try_to_u128()?;

    Ok(price)
}

/// Mark/oracle divergence as a signed fraction of mark, in spread precision.
///
/// Positive when mark trades above the oracle.
pub fn calculate_oracle_mark_spread_pct(mark_price: u128, oracle_price: i128) -> AmmResult<i128> {
    let mark_price = cast_to_i128(mark_price)?;
    let pct = mark_price
        .checked_sub(oracle_price)
        .ok_or(MathError::underflow("mark - oracle"))?
        .checked_mul(SPREAD_PRECISION_I128)
        .ok_or(MathError::overflow("oracle mark spread"))?
        .checked_div(mark_price)
        .ok_or(MathError::division_by_zero("oracle mark spread"))?;
    Ok(pct)
}

/// Mark price of the curve after applying the pending repeg
pub fn calculate_mark_price<C: CurveCostModel + ?Sized>(
    amm: &AmmState,
    oracle: &OraclePriceData,
    costs: &C,
) -> AmmResult<u128> {
    calculate_updated_amm(amm, oracle, costs)?.mark_price()
}

/// `(bid, ask)` of the updated curve.
///
/// The ask prices the LONG-side spread reserves, the bid the SHORT side. Both
/// use the updated peg.
pub fn calculate_bid_ask_price<C: CurveCostModel + ?Sized>(
    amm: &AmmState,
    oracle: &OraclePriceData,
    costs: &C,
    policy: SpreadPolicy,
) -> AmmResult<(u128, u128)> {
    let updated = calculate_updated_amm(amm, oracle, costs)?;

    let ask_reserves =
        calculate_spread_reserves(&updated, PositionDirection::Long, oracle, policy)?;
    let bid_reserves =
        calculate_spread_reserves(&updated, PositionDirection::Short, oracle, policy)?;

    let ask_price = calculate_price(
        ask_reserves.base_asset_reserve,
        ask_reserves.quote_asset_reserve,
        updated.peg_multiplier,
    )?;
    let bid_price = calculate_price(
        bid_reserves.base_asset_reserve,
        bid_reserves.quote_asset_reserve,
        updated.peg_multiplier,
    )?;

    debug!(bid_price, ask_price, peg = updated.peg_multiplier, "bid/ask computed");

    Ok((bid_price, ask_price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vamm_types::precision::{AMM_RESERVE_PRECISION, PRICE_PRECISION_I128};

    #[test]
    fn test_price_of_balanced_pool() {
        let price = calculate_price(
            1_000 * AMM_RESERVE_PRECISION,
            1_000 * AMM_RESERVE_PRECISION,
            50 * PEG_PRECISION,
        )
        .unwrap();
        assert_eq!(price, 50 * PRICE_PRECISION);
    }

    #[test]
    fn test_zero_base_prices_at_zero() {
        assert_eq!(calculate_price(0, 1_000, 1_000).unwrap(), 0);
    }

    #[test]
    fn test_oracle_mark_spread_sign() {
        let mark = 50 * PRICE_PRECISION;
        // oracle 10% above mark
        assert_eq!(
            calculate_oracle_mark_spread_pct(mark, 55 * PRICE_PRECISION_I128).unwrap(),
            -100_000
        );
        assert_eq!(
            calculate_oracle_mark_spread_pct(mark, 45 * PRICE_PRECISION_I128).unwrap(),
            100_000
        );
    }

    proptest! {
        #[test]
        fn prop_price_matches_formula(
            base in 1u128..1_000_000_000_000_000u128,
            quote in 1u128..1_000_000_000_000_000u128,
            peg in 1u128..1_000_000_000u128,
        ) {
            let expected = quote * PRICE_PRECISION * peg / (PEG_PRECISION * base);
            prop_assert_eq!(calculate_price(base, quote, peg).unwrap(), expected);
        }
    }
}
