//! Chart data derived from a valuation
//!
//! Renderers draw one bar per discounted forecast year followed by a single
//! synthetic bar for the present value of the terminal value.

use crate::result::ValuationResult;
use serde::{Deserialize, Serialize};

/// What a bar represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartBarKind {
    /// Discounted FCF of an explicit forecast year
    Year,
    /// Present value of the terminal value
    Terminal,
}

/// A single bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
    pub kind: ChartBarKind,
}

/// Bars for `result`: `Y1..Yn` then `TV`
pub fn chart_series(result: &ValuationResult) -> Vec<ChartBar> {
    result
        .projections
        .iter()
        .map(|p| ChartBar {
            label: format!("Y{}", p.year),
            value: p.discounted_fcf,
            kind: ChartBarKind::Year,
        })
        .chain(std::iter::once(ChartBar {
            label: "TV".to_string(),
            value: result.present_terminal_value,
            kind: ChartBarKind::Terminal,
        }))
        .collect()
}
