//! Static market registry
//!
//! Read-only description of each perpetual market: where its oracle lives,
//! which mint it tracks and the price scale its oracle reports in.

use anyhow::{bail, ensure, Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const BUILTIN_MARKETS: &str = include_str!("markets.toml");

static BUILTIN_REGISTRY: OnceCell<MarketRegistry> = OnceCell::new();

/// Oracle network a market's price feed is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleSource {
    Pyth,
    Switchboard,
}

/// One market record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    pub symbol: String,
    pub market_index: u64,
    pub oracle_address: String,
    pub mint_address: String,
    pub oracle_source: OracleSource,
    /// Oracle price scale, `10^precision_exponent`
    pub precision: u64,
    pub precision_exponent: u32,
    /// Venue-side market name, when it differs from the symbol
    #[serde(default)]
    pub venue_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarketsFile {
    markets: Vec<MarketConfig>,
}

/// Validated set of markets, indexed by market index and symbol
#[derive(Debug, Clone, Default)]
pub struct MarketRegistry {
    markets: Vec<MarketConfig>,
    by_index: HashMap<u64, usize>,
    by_symbol: HashMap<String, usize>,
}

impl MarketRegistry {
    /// Build a registry, rejecting duplicate indices or symbols, empty oracle
    /// addresses and precisions that disagree with their exponent
    pub fn new(markets: Vec<MarketConfig>) -> Result<Self> {
        let mut by_index = HashMap::with_capacity(markets.len());
        let mut by_symbol = HashMap::with_capacity(markets.len());

        for (position, market) in markets.iter().enumerate() {
            ensure!(
                !market.oracle_address.trim().is_empty(),
                "Market {} has no oracle address",
                market.symbol
            );

            let expected = 10u64.checked_pow(market.precision_exponent).with_context(|| {
                format!(
                    "Market {} precision exponent {} overflows u64",
                    market.symbol, market.precision_exponent
                )
            })?;
            ensure!(
                market.precision == expected,
                "Market {} precision {} does not match 10^{}",
                market.symbol,
                market.precision,
                market.precision_exponent
            );

            if by_index.insert(market.market_index, position).is_some() {
                bail!("Duplicate market index {}", market.market_index);
            }
            if by_symbol.insert(market.symbol.clone(), position).is_some() {
                bail!("Duplicate market symbol {}", market.symbol);
            }
        }

        debug!(markets = markets.len(), "market registry built");

        Ok(Self {
            markets,
            by_index,
            by_symbol,
        })
    }

    /// Parse and validate a `[[markets]]` TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: MarketsFile =
            toml::from_str(contents).context("Failed to parse market registry")?;
        Self::new(file.markets)
    }

    pub fn get(&self, market_index: u64) -> Option<&MarketConfig> {
        self.by_index
            .get(&market_index)
            .and_then(|position| self.markets.get(*position))
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Option<&MarketConfig> {
        self.by_symbol
            .get(symbol)
            .and_then(|position| self.markets.get(*position))
    }

    /// Markets in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &MarketConfig> {
        self.markets.iter()
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// Registry of the markets shipped with the engine, parsed on first use
pub fn builtin_registry() -> Result<&'static MarketRegistry> {
    BUILTIN_REGISTRY.get_or_try_init(|| MarketRegistry::from_toml_str(BUILTIN_MARKETS))
}
