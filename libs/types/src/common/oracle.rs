//! Oracle price snapshot supplied by the caller on every pricing call

use crate::precision::SPREAD_PRECISION_I128;
use serde::{Deserialize, Serialize};

/// Read-only oracle reading at [`PRICE_PRECISION`](crate::precision::PRICE_PRECISION)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OraclePriceData {
    /// Oracle price; non-positive readings are rejected by the repeg logic
    pub price: i128,
    /// Confidence interval width, same scale as `price`
    pub confidence: u128,
}

impl OraclePriceData {
    pub fn new(price: i128, confidence: u128) -> Self {
        Self { price, confidence }
    }

    /// Confidence interval as a fraction of price, in spread precision.
    ///
    /// Zero for a non-positive price.
    pub fn confidence_pct(&self) -> i128 {
        if self.price <= 0 {
            return 0;
        }
        let confidence = i128::try_from(self.confidence).unwrap_or(i128::MAX);
        confidence
            .saturating_mul(SPREAD_PRECISION_I128)
            .checked_div(self.price)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::PRICE_PRECISION_I128;

    #[test]
    fn test_confidence_pct() {
        // $0.50 on a $50 price is 1%
        let oracle = OraclePriceData::new(50 * PRICE_PRECISION_I128, 5_000_000_000);
        assert_eq!(oracle.confidence_pct(), 10_000);

        let broken = OraclePriceData::new(0, 5_000_000_000);
        assert_eq!(broken.confidence_pct(), 0);
    }
}
