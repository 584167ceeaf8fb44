//! Spread policy selection

use serde::{Deserialize, Serialize};

/// Inventory-skew formula used by the spread calculator.
///
/// Both variants share oracle retreat, the 5x skew ceiling and the 2% target
/// cap. They differ in how the AMM's exposure is valued:
///
/// - `CostBasis` measures local and net PnL against the long/short cost basis.
/// - `MarkToTerminal` compares the mark value of the net position with its
///   terminal value directly and widens the retreat side by the oracle
///   confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadPolicy {
    #[default]
    CostBasis,
    MarkToTerminal,
}
