//! Valuation output types

use serde::{Deserialize, Serialize};
use std::fmt;

/// One explicit forecast year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProjection {
    /// 1-based period index
    pub year: u32,
    /// Projected free cash flow
    pub fcf: f64,
    /// Present value of `fcf`
    pub discounted_fcf: f64,
}

/// Everything [`compute`](crate::compute) derives from one input set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub projections: Vec<YearProjection>,
    pub terminal_value: f64,
    pub present_terminal_value: f64,
    pub total_enterprise_value: f64,
    pub intrinsic_value_per_share: f64,
    #[serde(alias = "upsideDownside")]
    pub upside_downside_pct: f64,
    pub is_undervalued: bool,
}

/// How the intrinsic value compares to the market price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Undervalued,
    Overvalued,
    /// No market price was supplied
    NotComparable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Undervalued => "Undervalued",
            Verdict::Overvalued => "Overvalued",
            Verdict::NotComparable => "No market price",
        };
        f.write_str(label)
    }
}

impl ValuationResult {
    /// Sum of the discounted explicit-period cash flows
    pub fn sum_discounted_fcf(&self) -> f64 {
        self.projections.iter().map(|p| p.discounted_fcf).sum()
    }

    /// Share of enterprise value that comes from the terminal value
    ///
    /// Returns `None` when the enterprise value is zero.
    pub fn terminal_share(&self) -> Option<f64> {
        if self.total_enterprise_value == 0.0 {
            None
        } else {
            Some(self.present_terminal_value / self.total_enterprise_value)
        }
    }

    /// Verdict against `current_price`
    ///
    /// `is_undervalued` stays the raw comparison; this adds the
    /// "no price" case for display.
    pub fn verdict(&self, current_price: f64) -> Verdict {
        if current_price <= 0.0 {
            Verdict::NotComparable
        } else if self.is_undervalued {
            Verdict::Undervalued
        } else {
            Verdict::Overvalued
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValuationResult {
        ValuationResult {
            projections: vec![
                YearProjection {
                    year: 1,
                    fcf: 110.0,
                    discounted_fcf: 100.0,
                },
                YearProjection {
                    year: 2,
                    fcf: 121.0,
                    discounted_fcf: 102.0,
                },
            ],
            terminal_value: 2000.0,
            present_terminal_value: 1798.0,
            total_enterprise_value: 2000.0,
            intrinsic_value_per_share: 2.0,
            upside_downside_pct: 100.0,
            is_undervalued: true,
        }
    }

    #[test]
    fn test_sum_and_terminal_share() {
        let result = sample();
        assert_eq!(result.sum_discounted_fcf(), 202.0);
        assert!((result.terminal_share().unwrap() - 0.899).abs() < 1e-12);
    }

    #[test]
    fn test_verdict() {
        let result = sample();
        assert_eq!(result.verdict(1.0), Verdict::Undervalued);
        assert_eq!(result.verdict(0.0), Verdict::NotComparable);

        let over = ValuationResult {
            is_undervalued: false,
            ..sample()
        };
        assert_eq!(over.verdict(5.0), Verdict::Overvalued);
        assert_eq!(over.verdict(5.0).to_string(), "Overvalued");
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["upsideDownsidePct"], 100.0);
        assert_eq!(json["isUndervalued"], true);
        assert_eq!(json["projections"][0]["discountedFcf"], 100.0);

        let legacy = r#"{"projections":[],"terminalValue":1,"presentTerminalValue":1,
            "totalEnterpriseValue":1,"intrinsicValuePerShare":1,"upsideDownside":-12.5,
            "isUndervalued":false}"#;
        let parsed: ValuationResult = serde_json::from_str(legacy).unwrap();
        assert_eq!(parsed.upside_downside_pct, -12.5);
    }
}
