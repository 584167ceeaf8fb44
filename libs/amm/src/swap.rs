//! Constant product swap simulation
//!
//! Exact `x * y = k` arithmetic on virtual reserves. Output reserves are
//! always rebuilt from the invariant with floor division, so any rounding
//! remainder stays with the pool.

use crate::error::{AmmError, AmmResult};
use crate::state::AmmState;
use vamm_types::common::fixed_point::{cast_to_u128, mul_div, TryToU128};
use vamm_types::precision::AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO;
use vamm_types::{AssetType, MathError, PositionDirection, SwapDirection, U256};

/// Apply `swap_amount` to `input_reserve` and rebuild the opposite reserve.
///
/// # Arguments
/// * `input_reserve` - Reserve the amount is applied to
/// * `swap_amount` - Amount in the input reserve's precision, must be `>= 0`
/// * `direction` - `Add` grows the input reserve, `Remove` shrinks it
/// * `invariant` - Curve invariant `sqrt_k²`
///
/// # Returns
/// `(new_input_reserve, new_output_reserve)`
pub fn calculate_swap_output(
    input_reserve: u128,
    swap_amount: i128,
    direction: SwapDirection,
    invariant: U256,
) -> AmmResult<(u128, u128)> {
    if swap_amount < 0 {
        return Err(AmmError::NegativeSwapAmount {
            amount: swap_amount,
        });
    }
    let swap_amount = cast_to_u128(swap_amount)?;

    let new_input_reserve = match direction {
        SwapDirection::Add => input_reserve
            .checked_add(swap_amount)
            .ok_or(MathError::overflow("swap add"))?,
        SwapDirection::Remove => input_reserve
            .checked_sub(swap_amount)
            .ok_or(MathError::underflow("swap remove"))?,
    };

    let new_output_reserve = invariant
        .checked_div(U256::from(new_input_reserve))
        .ok_or(MathError::division_by_zero("swap output"))?
        .try_to_u128()?;

    Ok((new_input_reserve, new_output_reserve))
}

/// Reserves after swapping `swap_amount` of `input_asset_type` into the curve.
///
/// Quote amounts arrive in quote precision and are converted into reserve
/// precision through the peg before the swap.
///
/// # Returns
/// `(new_quote_reserve, new_base_reserve)` regardless of the input side
pub fn calculate_reserves_after_swap(
    amm: &AmmState,
    input_asset_type: AssetType,
    swap_amount: i128,
    direction: SwapDirection,
) -> AmmResult<(u128, u128)> {
    if swap_amount < 0 {
        return Err(AmmError::NegativeSwapAmount {
            amount: swap_amount,
        });
    }
    let invariant = amm.invariant()?;

    match input_asset_type {
        AssetType::Quote => {
            let reserve_amount = mul_div(
                cast_to_u128(swap_amount)?,
                AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO,
                amm.peg_multiplier,
            )?;
            let reserve_amount = i128::try_from(reserve_amount)
                .map_err(|_| MathError::overflow("quote swap amount"))?;
            let (new_quote, new_base) = calculate_swap_output(
                amm.quote_asset_reserve,
                reserve_amount,
                direction,
                invariant,
            )?;
            Ok((new_quote, new_base))
        }
        AssetType::Base => {
            let (new_base, new_quote) = calculate_swap_output(
                amm.base_asset_reserve,
                swap_amount,
                direction,
                invariant,
            )?;
            Ok((new_quote, new_base))
        }
    }
}

/// Reserve-side swap direction for a trade.
///
/// Going long takes base out of the pool; going short through the quote
/// reserve takes quote out. Every other combination adds to the input reserve.
pub fn swap_direction_for(
    input_asset_type: AssetType,
    position_direction: PositionDirection,
) -> SwapDirection {
    match (position_direction, input_asset_type) {
        (PositionDirection::Long, AssetType::Base) => SwapDirection::Remove,
        (PositionDirection::Short, AssetType::Quote) => SwapDirection::Remove,
        _ => SwapDirection::Add,
    }
}

/// Quote amount exchanged for a quote reserve delta, in quote precision.
///
/// Removing quote from the pool rounds up by one unit so the trader never
/// receives more than the curve released.
pub fn calculate_quote_asset_amount_swapped(
    quote_asset_reserve_delta: u128,
    peg_multiplier: u128,
    direction: SwapDirection,
) -> AmmResult<u128> {
    let quote_asset_amount = mul_div(
        quote_asset_reserve_delta,
        peg_multiplier,
        AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO,
    )?;

    Ok(match direction {
        SwapDirection::Remove => quote_asset_amount
            .checked_add(1)
            .ok_or(MathError::overflow("quote amount swapped"))?,
        SwapDirection::Add => quote_asset_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vamm_types::precision::{AMM_RESERVE_PRECISION, PEG_PRECISION, QUOTE_PRECISION};

    fn pool() -> AmmState {
        AmmState::new(
            1_000 * AMM_RESERVE_PRECISION,
            1_000 * AMM_RESERVE_PRECISION,
            50 * PEG_PRECISION,
        )
        .unwrap()
    }

    #[test]
    fn test_swap_output_floors() {
        // k = 100, 3 in -> 33 out
        let (new_input, new_output) =
            calculate_swap_output(2, 1, SwapDirection::Add, U256::from(100u8)).unwrap();
        assert_eq!(new_input, 3);
        assert_eq!(new_output, 33);
    }

    #[test]
    fn test_negative_swap_amount_rejected() {
        let err = calculate_swap_output(10, -1, SwapDirection::Add, U256::from(100u8)).unwrap_err();
        assert_eq!(err, AmmError::NegativeSwapAmount { amount: -1 });

        let err = calculate_reserves_after_swap(&pool(), AssetType::Quote, -5, SwapDirection::Add)
            .unwrap_err();
        assert_eq!(err, AmmError::NegativeSwapAmount { amount: -5 });
    }

    #[test]
    fn test_removing_whole_reserve_fails() {
        let err = calculate_swap_output(10, 10, SwapDirection::Remove, U256::from(100u8)).unwrap_err();
        assert!(matches!(err, AmmError::Math(MathError::DivisionByZero { .. })));
    }

    #[test]
    fn test_base_swap_returns_quote_first() {
        let amm = pool();
        let (quote, base) = calculate_reserves_after_swap(
            &amm,
            AssetType::Base,
            10 * AMM_RESERVE_PRECISION as i128,
            SwapDirection::Remove,
        )
        .unwrap();

        assert_eq!(base, 990 * AMM_RESERVE_PRECISION);
        assert!(quote > amm.quote_asset_reserve);
    }

    #[test]
    fn test_quote_swap_is_scaled_by_peg() {
        let amm = pool();
        // $500 of quote at peg 50 is 10 reserve units
        let (quote, base) = calculate_reserves_after_swap(
            &amm,
            AssetType::Quote,
            500 * QUOTE_PRECISION as i128,
            SwapDirection::Add,
        )
        .unwrap();

        assert_eq!(quote, 1_010 * AMM_RESERVE_PRECISION);
        assert_eq!(base, 9_900_990_099_009_900);
    }

    #[test]
    fn test_swap_direction_table() {
        use AssetType::*;
        use PositionDirection::*;

        assert_eq!(swap_direction_for(Base, Long), SwapDirection::Remove);
        assert_eq!(swap_direction_for(Quote, Short), SwapDirection::Remove);
        assert_eq!(swap_direction_for(Base, Short), SwapDirection::Add);
        assert_eq!(swap_direction_for(Quote, Long), SwapDirection::Add);
    }

    #[test]
    fn test_quote_asset_amount_swapped() {
        let peg = 50 * PEG_PRECISION;
        assert_eq!(
            calculate_quote_asset_amount_swapped(AMM_RESERVE_PRECISION, peg, SwapDirection::Add)
                .unwrap(),
            50 * QUOTE_PRECISION
        );
        assert_eq!(
            calculate_quote_asset_amount_swapped(AMM_RESERVE_PRECISION, peg, SwapDirection::Remove)
                .unwrap(),
            50 * QUOTE_PRECISION + 1
        );
    }
}
