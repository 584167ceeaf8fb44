//! Engine Configuration Module
//!
//! Loads pricing engine settings and the market list from TOML files with
//! environment-specific overrides.

use crate::market_registry::{MarketConfig, MarketRegistry};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vamm_amm::AmmCalculator;
use vamm_types::SpreadPolicy;

/// Default location of the base configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/vamm.toml";

/// Prefix for environment variable overrides (`VAMM__ENGINE__SPREAD_POLICY=...`)
pub const ENV_PREFIX: &str = "VAMM";

/// Top-level configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct VammConfig {
    /// Pricing engine settings
    #[serde(default)]
    pub engine: EngineSettings,

    /// Markets priced by this engine
    #[serde(default)]
    pub markets: Vec<MarketConfig>,
}

/// Pricing engine settings
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineSettings {
    /// Inventory skew formula used for bid/ask spreads
    #[serde(default)]
    pub spread_policy: SpreadPolicy,
}

impl EngineSettings {
    /// Constant-product calculator using the configured spread policy
    pub fn calculator(&self) -> AmmCalculator {
        AmmCalculator::constant_product(self.spread_policy)
    }
}

impl VammConfig {
    /// Load configuration from files with environment overrides.
    ///
    /// `environment` selects `environments/<env>.toml` next to the base file.
    /// A `~` or `$VAR` in `base_path` is expanded first.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = expand_path(base_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH)))?;

        let mut builder = Config::builder().add_source(File::from(base.as_path()).required(true));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .unwrap_or(Path::new("."))
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let loaded: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        debug!(
            spread_policy = ?loaded.engine.spread_policy,
            markets = loaded.markets.len(),
            "configuration loaded"
        );

        Ok(loaded)
    }

    /// Parse configuration from an in-memory TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration")
    }

    /// Validated registry of the configured markets
    pub fn registry(&self) -> Result<MarketRegistry> {
        MarketRegistry::new(self.markets.clone())
    }
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand config path {}", raw))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Convenience function to load configuration from the default location
pub fn load_config(environment: Option<&str>) -> Result<VammConfig> {
    let config = VammConfig::load(None, environment)?;
    config.registry()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_registry::OracleSource;
    use std::fs;
    use tempfile::tempdir;

    const BASE_CONFIG: &str = r#"
[engine]
spread_policy = "cost_basis"

[[markets]]
symbol = "SOL"
market_index = 0
oracle_address = "J83w4HKfqxwcq3BEMMkPFSppX3gqekLyLJBexebFVkix"
mint_address = "So11111111111111111111111111111111111111112"
oracle_source = "pyth"
precision = 10000000000
precision_exponent = 10
"#;

    #[test]
    fn test_load_base_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("vamm.toml");
        fs::write(&config_path, BASE_CONFIG).unwrap();

        let config = VammConfig::load(Some(&config_path), None).unwrap();

        assert_eq!(config.engine.spread_policy, SpreadPolicy::CostBasis);
        assert_eq!(config.markets.len(), 1);

        let registry = config.registry().unwrap();
        let sol = registry.get_by_symbol("SOL").unwrap();
        assert_eq!(sol.market_index, 0);
        assert_eq!(sol.oracle_source, OracleSource::Pyth);
        assert_eq!(sol.venue_ref, None);
    }

    #[test]
    fn test_environment_override() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("vamm.toml");
        fs::write(&config_path, BASE_CONFIG).unwrap();

        fs::create_dir(dir.path().join("environments")).unwrap();
        fs::write(
            dir.path().join("environments").join("staging.toml"),
            "[engine]\nspread_policy = \"mark_to_terminal\"\n",
        )
        .unwrap();

        let config = VammConfig::load(Some(&config_path), Some("staging")).unwrap();
        assert_eq!(config.engine.spread_policy, SpreadPolicy::MarkToTerminal);
        assert_eq!(
            config.engine.calculator().policy(),
            SpreadPolicy::MarkToTerminal
        );
        // markets come from the base file
        assert_eq!(config.markets.len(), 1);
    }

    #[test]
    fn test_missing_environment_file_falls_back_to_base() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("vamm.toml");
        fs::write(&config_path, BASE_CONFIG).unwrap();

        let config = VammConfig::load(Some(&config_path), Some("nowhere")).unwrap();
        assert_eq!(config.engine.spread_policy, SpreadPolicy::CostBasis);
    }

    #[test]
    fn test_missing_base_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = VammConfig::load(Some(&dir.path().join("absent.toml")), None).unwrap_err();
        assert!(err.to_string().contains("Failed to build configuration"));
    }

    #[test]
    fn test_from_toml_str_defaults() {
        let config = VammConfig::from_toml_str("").unwrap();
        assert_eq!(config.engine, EngineSettings::default());
        assert!(config.markets.is_empty());

        let config = VammConfig::from_toml_str(BASE_CONFIG).unwrap();
        assert_eq!(config.markets[0].symbol, "SOL");
    }
}
