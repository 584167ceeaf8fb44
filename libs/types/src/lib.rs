//! # vAMM Types Library
//!
//! Shared value types for the virtual AMM pricing core.
//!
//! ## Design Philosophy
//!
//! - **No Precision Loss**: Reserves, prices and fees are scaled integers
//! - **Wide Intermediates**: Products such as `sqrt_k²` run in 192/256-bit integers
//! - **Type Safety**: Closed enums replace string tags for sides and assets
//! - **Explicit Errors**: Every narrowing or overflowing step returns [`MathError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use vamm_types::{PositionDirection, AssetType, SwapDirection, OraclePriceData};
//! use vamm_types::precision::PRICE_PRECISION_I128;
//!
//! let oracle = OraclePriceData::new(50 * PRICE_PRECISION_I128, 0);
//! assert_eq!(oracle.price, 500_000_000_000);
//!
//! let close = PositionDirection::Long.opposite();
//! assert_eq!(close, PositionDirection::Short);
//! assert_eq!(AssetType::Base.to_string(), "base");
//! assert_ne!(SwapDirection::Add, SwapDirection::Remove);
//! ```

#[cfg(feature = "common")]
pub mod common;

// Fixed-point scales shared by every crate in the workspace
pub mod precision;

#[cfg(feature = "common")]
pub use common::direction::{AssetType, PositionDirection, SwapDirection};
#[cfg(feature = "common")]
pub use common::errors::{MathError, MathResult};
#[cfg(feature = "common")]
pub use common::fixed_point::{U192, U256};
#[cfg(feature = "common")]
pub use common::oracle::OraclePriceData;
#[cfg(feature = "common")]
pub use common::policy::SpreadPolicy;
