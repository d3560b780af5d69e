//! Valuation assumptions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest projection window front ends allow
pub const MIN_PROJECTION_YEARS: u32 = 1;

/// Largest projection window front ends allow
pub const MAX_PROJECTION_YEARS: u32 = 10;

/// Default forecast growth, percent
pub const DEFAULT_GROWTH_RATE_PCT: f64 = 10.0;
/// Default discount rate, percent
pub const DEFAULT_DISCOUNT_RATE_PCT: f64 = 9.0;
/// Default perpetual growth, percent
pub const DEFAULT_TERMINAL_GROWTH_RATE_PCT: f64 = 2.5;
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;

/// The assumption set a valuation is computed from
///
/// Rates are percentages (`10.0` means 10%). Cash flow and share counts are
/// raw, unscaled numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValuationInputs {
    /// Ticker symbol; never used by the computation
    pub symbol: String,

    /// Market price per share; 0 means unknown
    pub current_price: f64,

    /// Latest annual free cash flow, may be negative
    pub free_cash_flow: f64,

    /// Annual FCF growth over the explicit window, percent
    #[serde(alias = "growthRate")]
    pub growth_rate_pct: f64,

    /// Required rate of return (WACC), percent
    #[serde(alias = "discountRate")]
    pub discount_rate_pct: f64,

    /// Perpetual growth after the explicit window, percent
    #[serde(alias = "terminalGrowthRate")]
    pub terminal_growth_rate_pct: f64,

    /// Shares outstanding; 0 leaves the per-share value undefined
    pub shares_outstanding: f64,

    /// Number of explicit forecast years
    pub projection_years: u32,
}

impl Default for ValuationInputs {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            current_price: 0.0,
            free_cash_flow: 0.0,
            growth_rate_pct: DEFAULT_GROWTH_RATE_PCT,
            discount_rate_pct: DEFAULT_DISCOUNT_RATE_PCT,
            terminal_growth_rate_pct: DEFAULT_TERMINAL_GROWTH_RATE_PCT,
            shares_outstanding: 0.0,
            projection_years: DEFAULT_PROJECTION_YEARS,
        }
    }
}

impl ValuationInputs {
    /// Inputs with defaults for everything but the symbol
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Clamp `projection_years` into `1..=10`
    pub fn clamp_projection_years(mut self) -> Self {
        self.projection_years = clamp_years(self.projection_years);
        self
    }

    /// Read one numeric field
    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::CurrentPrice => self.current_price,
            InputField::FreeCashFlow => self.free_cash_flow,
            InputField::GrowthRate => self.growth_rate_pct,
            InputField::DiscountRate => self.discount_rate_pct,
            InputField::TerminalGrowthRate => self.terminal_growth_rate_pct,
            InputField::SharesOutstanding => self.shares_outstanding,
            InputField::ProjectionYears => f64::from(self.projection_years),
        }
    }

    /// Overwrite one numeric field
    ///
    /// `ProjectionYears` is rounded and clamped into `1..=10`.
    pub fn set_field(&mut self, field: InputField, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::NonFinite(field.to_string()));
        }

        match field {
            InputField::CurrentPrice => self.current_price = value,
            InputField::FreeCashFlow => self.free_cash_flow = value,
            InputField::GrowthRate => self.growth_rate_pct = value,
            InputField::DiscountRate => self.discount_rate_pct = value,
            InputField::TerminalGrowthRate => self.terminal_growth_rate_pct = value,
            InputField::SharesOutstanding => self.shares_outstanding = value,
            InputField::ProjectionYears => {
                let years = value
                    .round()
                    .clamp(f64::from(MIN_PROJECTION_YEARS), f64::from(MAX_PROJECTION_YEARS));
                self.projection_years = years as u32;
            }
        }
        Ok(())
    }

    /// Parse `text` as a number and store it in `field`
    pub fn set_field_str(&mut self, field: InputField, text: &str) -> Result<()> {
        let value = field.parse_value(text)?;
        self.set_field(field, value)
    }
}

fn clamp_years(years: u32) -> u32 {
    years.clamp(MIN_PROJECTION_YEARS, MAX_PROJECTION_YEARS)
}

/// Numeric fields of [`ValuationInputs`] addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    CurrentPrice,
    FreeCashFlow,
    GrowthRate,
    DiscountRate,
    TerminalGrowthRate,
    SharesOutstanding,
    ProjectionYears,
}

impl InputField {
    /// Every field, in form order
    pub const ALL: [InputField; 7] = [
        InputField::CurrentPrice,
        InputField::FreeCashFlow,
        InputField::GrowthRate,
        InputField::DiscountRate,
        InputField::TerminalGrowthRate,
        InputField::SharesOutstanding,
        InputField::ProjectionYears,
    ];

    /// Wire name of the field
    pub fn as_str(self) -> &'static str {
        match self {
            InputField::CurrentPrice => "currentPrice",
            InputField::FreeCashFlow => "freeCashFlow",
            InputField::GrowthRate => "growthRatePct",
            InputField::DiscountRate => "discountRatePct",
            InputField::TerminalGrowthRate => "terminalGrowthRatePct",
            InputField::SharesOutstanding => "sharesOutstanding",
            InputField::ProjectionYears => "projectionYears",
        }
    }

    /// Parse user text for this field; `,` and `_` separators are ignored
    pub fn parse_value(self, text: &str) -> Result<f64> {
        let cleaned: String = text.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
        cleaned.parse::<f64>().map_err(|_| Error::InvalidNumber {
            field: self.to_string(),
            value: text.to_string(),
        })
    }

    /// Short label for forms and tables
    pub fn label(self) -> &'static str {
        match self {
            InputField::CurrentPrice => "Current price",
            InputField::FreeCashFlow => "Free cash flow",
            InputField::GrowthRate => "Growth rate (%)",
            InputField::DiscountRate => "Discount rate / WACC (%)",
            InputField::TerminalGrowthRate => "Terminal growth (%)",
            InputField::SharesOutstanding => "Shares outstanding",
            InputField::ProjectionYears => "Projection years",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "price" | "p" | "currentprice" => Ok(InputField::CurrentPrice),
            "fcf" | "freecashflow" => Ok(InputField::FreeCashFlow),
            "growth" | "g" | "growthrate" | "growthratepct" => Ok(InputField::GrowthRate),
            "discount" | "wacc" | "r" | "discountrate" | "discountratepct" => {
                Ok(InputField::DiscountRate)
            }
            "terminal" | "tg" | "terminalgrowth" | "terminalgrowthrate"
            | "terminalgrowthratepct" => Ok(InputField::TerminalGrowthRate),
            "shares" | "sharesoutstanding" => Ok(InputField::SharesOutstanding),
            "years" | "n" | "projectionyears" => Ok(InputField::ProjectionYears),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let inputs = ValuationInputs::default();
        assert_eq!(inputs.growth_rate_pct, 10.0);
        assert_eq!(inputs.discount_rate_pct, 9.0);
        assert_eq!(inputs.terminal_growth_rate_pct, 2.5);
        assert_eq!(inputs.projection_years, 5);
        assert_eq!(inputs.current_price, 0.0);
        assert!(inputs.symbol.is_empty());
    }

    #[test]
    fn test_clamp_projection_years() {
        let mut inputs = ValuationInputs::default();
        inputs.projection_years = 0;
        assert_eq!(inputs.clone().clamp_projection_years().projection_years, 1);
        inputs.projection_years = 25;
        assert_eq!(inputs.clone().clamp_projection_years().projection_years, 10);
        inputs.projection_years = 7;
        assert_eq!(inputs.clamp_projection_years().projection_years, 7);
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("wacc".parse::<InputField>().unwrap(), InputField::DiscountRate);
        assert_eq!("Free_Cash_Flow".parse::<InputField>().unwrap(), InputField::FreeCashFlow);
        assert_eq!("terminal-growth".parse::<InputField>().unwrap(), InputField::TerminalGrowthRate);
        assert_eq!("growthRatePct".parse::<InputField>().unwrap(), InputField::GrowthRate);
        assert!(matches!(
            "beta".parse::<InputField>(),
            Err(Error::UnknownField(name)) if name == "beta"
        ));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in InputField::ALL {
            assert_eq!(field.as_str().parse::<InputField>().unwrap(), field);
        }
    }

    #[test]
    fn test_set_field_years_clamped_and_rounded() {
        let mut inputs = ValuationInputs::default();
        inputs.set_field(InputField::ProjectionYears, 12.0).unwrap();
        assert_eq!(inputs.projection_years, 10);
        inputs.set_field(InputField::ProjectionYears, 2.6).unwrap();
        assert_eq!(inputs.projection_years, 3);
        inputs.set_field(InputField::ProjectionYears, -4.0).unwrap();
        assert_eq!(inputs.projection_years, 1);
    }

    #[test]
    fn test_set_field_rejects_non_finite() {
        let mut inputs = ValuationInputs::default();
        let err = inputs.set_field(InputField::CurrentPrice, f64::NAN).unwrap_err();
        assert_eq!(err, Error::NonFinite("currentPrice".to_string()));
        assert_eq!(inputs.current_price, 0.0);
    }

    #[test]
    fn test_set_field_str() {
        let mut inputs = ValuationInputs::default();
        inputs.set_field_str(InputField::SharesOutstanding, "15,000,000").unwrap();
        assert_eq!(inputs.shares_outstanding, 15_000_000.0);
        inputs.set_field_str(InputField::FreeCashFlow, " -2.5e9 ").unwrap();
        assert_eq!(inputs.free_cash_flow, -2.5e9);
        assert_eq!(inputs.get(InputField::FreeCashFlow), -2.5e9);

        let err = inputs.set_field_str(InputField::GrowthRate, "ten").unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { .. }));
    }

    #[test]
    fn test_wire_names_and_aliases() {
        let inputs: ValuationInputs = serde_json::from_str(
            r#"{"symbol":"AAPL","currentPrice":190.5,"growthRate":8,"discountRate":10,"terminalGrowthRate":3}"#,
        )
        .unwrap();
        assert_eq!(inputs.symbol, "AAPL");
        assert_eq!(inputs.current_price, 190.5);
        assert_eq!(inputs.growth_rate_pct, 8.0);
        assert_eq!(inputs.discount_rate_pct, 10.0);
        assert_eq!(inputs.terminal_growth_rate_pct, 3.0);
        assert_eq!(inputs.projection_years, 5);

        let json = serde_json::to_value(&inputs).unwrap();
        assert_eq!(json["growthRatePct"], 8.0);
        assert_eq!(json["sharesOutstanding"], 0.0);
    }
}
