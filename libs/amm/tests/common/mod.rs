//! Common Test Utilities for the vAMM pricing core
//!
//! Curve fixtures, oracle readings and tracing setup shared by the
//! integration suites.

#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use vamm_amm::AmmState;
use vamm_types::precision::{AMM_RESERVE_PRECISION, PEG_PRECISION, PRICE_PRECISION_I128};
use vamm_types::OraclePriceData;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once; filter with `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// 1_000 base against 1_000 quote, marked at `dollars`
pub fn balanced_pool(dollars: u128) -> AmmState {
    AmmState::new(
        1_000 * AMM_RESERVE_PRECISION,
        1_000 * AMM_RESERVE_PRECISION,
        dollars * PEG_PRECISION,
    )
    .expect("balanced pool fixture")
}

/// Balanced $50 pool with live curve updates, a 0.1% base spread and traders
/// net long 10 base units
pub fn net_long_pool(total_fee_minus_distributions: i128) -> AmmState {
    balanced_pool(50)
        .with_base_spread(1_000)
        .with_curve_update_intensity(100)
        .with_fees(0, total_fee_minus_distributions)
        .with_net_base_asset_amount(10 * AMM_RESERVE_PRECISION as i128)
        .expect("net long fixture")
}

pub fn oracle(dollars: i128) -> OraclePriceData {
    OraclePriceData::new(dollars * PRICE_PRECISION_I128, 0)
}
