//! Wide integer arithmetic for fixed-point reserve math
//!
//! Reserve products overflow `u128` long before realistic markets run out of
//! depth: `sqrt_k` at 1e13 precision squares to ~1e40 for a modest pool. All
//! such products are carried in [`U192`]/[`U256`] and narrowed back with an
//! explicit, checked cast.
//!
//! ## Design Principles
//!
//! - **Checked Everywhere**: every multiply, divide and cast returns [`MathResult`]
//! - **Narrow Late**: stay wide until the final division
//! - **Floor Division**: integer division truncates, which always favours the pool

use crate::common::errors::{MathError, MathResult};
use uint::construct_uint;

construct_uint! {
    /// 192-bit unsigned integer for price and cost intermediates
    pub struct U192(3);
}

construct_uint! {
    /// 256-bit unsigned integer for invariant (`sqrt_k²`) intermediates
    pub struct U256(4);
}

/// Narrowing conversion from a wide integer back to `u128`
pub trait TryToU128 {
    fn try_to_u128(self) -> MathResult<u128>;
}

macro_rules! impl_try_to_u128 {
    ($wide:ty, $name:literal) => {
        impl TryToU128 for $wide {
            fn try_to_u128(self) -> MathResult<u128> {
                if self > <$wide>::from(u128::MAX) {
                    return Err(MathError::CastFailed {
                        value_hint: $name,
                        target: "u128",
                    });
                }
                Ok(self.as_u128())
            }
        }
    };
}

impl_try_to_u128!(U192, "U192");
impl_try_to_u128!(U256, "U256");

/// Cast an unsigned amount into the signed domain
pub fn cast_to_i128(value: u128) -> MathResult<i128> {
    i128::try_from(value).map_err(|_| MathError::CastFailed {
        value_hint: "u128",
        target: "i128",
    })
}

/// Cast a signed amount into the unsigned domain, rejecting negatives
pub fn cast_to_u128(value: i128) -> MathResult<u128> {
    u128::try_from(value).map_err(|_| MathError::CastFailed {
        value_hint: "i128",
        target: "u128",
    })
}

/// `a * b / c` with a 192-bit intermediate, floor division
pub fn mul_div(a: u128, b: u128, c: u128) -> MathResult<u128> {
    U192::from(a)
        .checked_mul(U192::from(b))
        .ok_or(MathError::overflow("mul_div"))?
        .checked_div(U192::from(c))
        .ok_or(MathError::division_by_zero("mul_div"))?
        .try_to_u128()
}

/// Constant-product invariant `sqrt_k²`
pub fn invariant_from_sqrt_k(sqrt_k: u128) -> MathResult<U256> {
    let sqrt_k = U256::from(sqrt_k);
    sqrt_k
        .checked_mul(sqrt_k)
        .ok_or(MathError::overflow("sqrt_k squared"))
}

/// Floor of the square root of a 256-bit value
pub fn integer_sqrt(value: U256) -> U256 {
    value.integer_sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_try_to_u128_bounds() {
        assert_eq!(U256::from(u128::MAX).try_to_u128(), Ok(u128::MAX));
        let too_big = U256::from(u128::MAX) + U256::one();
        assert!(matches!(
            too_big.try_to_u128(),
            Err(MathError::CastFailed { target: "u128", .. })
        ));
    }

    #[test]
    fn test_signed_casts() {
        assert_eq!(cast_to_i128(42), Ok(42));
        assert!(cast_to_i128(u128::MAX).is_err());
        assert_eq!(cast_to_u128(42), Ok(42));
        assert!(cast_to_u128(-1).is_err());
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // 1e20 * 1e20 overflows u128 but the quotient does not
        let e20 = 100_000_000_000_000_000_000u128;
        assert_eq!(mul_div(e20, e20, e20), Ok(e20));
        assert_eq!(
            mul_div(1, 1, 0),
            Err(MathError::division_by_zero("mul_div"))
        );
    }

    #[test]
    fn test_invariant_of_large_sqrt_k() {
        let sqrt_k = 10u128.pow(20);
        let k = invariant_from_sqrt_k(sqrt_k).unwrap();
        assert_eq!(k, U256::from(10u128.pow(20)) * U256::from(10u128.pow(20)));
        assert_eq!(integer_sqrt(k), U256::from(sqrt_k));
    }

    proptest! {
        #[test]
        fn prop_integer_sqrt_is_floor(value in any::<u128>()) {
            let root = integer_sqrt(U256::from(value));
            prop_assert!(root * root <= U256::from(value));
            let next = root + U256::one();
            prop_assert!(next * next > U256::from(value));
        }
    }
}
