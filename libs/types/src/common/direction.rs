//! Closed tags for trade sides, reserve sides and swap directions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a trader position (or of a quote: LONG is the ask, SHORT the bid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionDirection {
    #[default]
    Long,
    Short,
}

impl PositionDirection {
    pub fn opposite(self) -> Self {
        match self {
            PositionDirection::Long => PositionDirection::Short,
            PositionDirection::Short => PositionDirection::Long,
        }
    }

    /// Direction that closes a signed base position (SHORT for a positive amount)
    pub fn to_close(base_asset_amount: i128) -> Self {
        if base_asset_amount > 0 {
            PositionDirection::Short
        } else {
            PositionDirection::Long
        }
    }
}

/// Which virtual reserve a swap amount is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Base,
    Quote,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Base => write!(f, "base"),
            AssetType::Quote => write!(f, "quote"),
        }
    }
}

/// Whether a swap adds to or removes from the input reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    Add,
    Remove,
}
