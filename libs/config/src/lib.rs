//! # vAMM Engine Configuration
//!
//! Static market registry and pricing engine settings for the vAMM pricing
//! core.
//!
//! ## Features
//!
//! - **Market Registry**: Oracle address, mint, oracle source and price scale per market
//! - **Engine Settings**: Spread policy selection, loaded from TOML with environment overrides
//! - **Built-in Markets**: Registry embedded at compile time, validated on first use
//!
//! ## Usage
//!
//! ```rust
//! use vamm_config::{builtin_registry, VammConfig};
//! use vamm_types::SpreadPolicy;
//!
//! let registry = builtin_registry()?;
//! let sol = registry.get_by_symbol("SOL").expect("SOL is built in");
//! assert_eq!(sol.market_index, 0);
//!
//! let config = VammConfig::from_toml_str("[engine]\nspread_policy = \"mark_to_terminal\"\n")?;
//! assert_eq!(config.engine.calculator().policy(), SpreadPolicy::MarkToTerminal);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod engine_config;
pub mod market_registry;

// Re-export commonly used types
pub use engine_config::{load_config, EngineSettings, VammConfig};
pub use market_registry::{builtin_registry, MarketConfig, MarketRegistry, OracleSource};
