//! Reply parsing
//!
//! Models are asked for raw JSON but often wrap it in prose or markdown
//! fences. The object is taken from the first `{` to the last `}`; numeric
//! fields are accepted only when they are JSON numbers.

use crate::error::{AssumptionError, Result};
use dcf_core::{
    DEFAULT_DISCOUNT_RATE_PCT, DEFAULT_GROWTH_RATE_PCT, DEFAULT_PROJECTION_YEARS,
    DEFAULT_TERMINAL_GROWTH_RATE_PCT, ValuationInputs,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::LazyLock;

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON object pattern is valid"));

/// Assumptions recovered from one reply
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAssumptions {
    pub inputs: ValuationInputs,
    pub reasoning: Option<String>,
}

/// The outermost `{...}` span of `text`, or `"{}"` when there is none
pub fn extract_json_object(text: &str) -> &str {
    JSON_OBJECT.find(text).map_or("{}", |m| m.as_str())
}

/// Parse a model reply into inputs for `ticker`
///
/// Missing or non-numeric fields fall back to the manual-entry defaults.
/// Fails only when the extracted span is not valid JSON.
pub fn parse_assumptions(text: &str, ticker: &str) -> Result<ParsedAssumptions> {
    let json = extract_json_object(text);
    let value: Value =
        serde_json::from_str(json).map_err(|e| AssumptionError::Parse(e.to_string()))?;

    let empty = Map::new();
    let data = value.as_object().unwrap_or(&empty);

    let symbol = data
        .get("symbol")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| ticker.trim().to_uppercase(), str::to_string);

    let inputs = ValuationInputs {
        symbol,
        current_price: number(data, &["currentPrice"]).unwrap_or(0.0),
        free_cash_flow: number(data, &["freeCashFlow"]).unwrap_or(0.0),
        growth_rate_pct: number(data, &["growthRate", "growthRatePct"])
            .unwrap_or(DEFAULT_GROWTH_RATE_PCT),
        discount_rate_pct: number(data, &["discountRate", "discountRatePct"])
            .unwrap_or(DEFAULT_DISCOUNT_RATE_PCT),
        terminal_growth_rate_pct: number(data, &["terminalGrowthRate", "terminalGrowthRatePct"])
            .unwrap_or(DEFAULT_TERMINAL_GROWTH_RATE_PCT),
        shares_outstanding: number(data, &["sharesOutstanding"]).unwrap_or(0.0),
        projection_years: DEFAULT_PROJECTION_YEARS,
    };

    let reasoning = data
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(ParsedAssumptions { inputs, reasoning })
}

/// Keep the first occurrence of every source, in order
pub fn dedup_sources(sources: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

// First key holding a JSON number wins
fn number(data: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| data.get(*key).and_then(Value::as_f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        assert_eq!(extract_json_object(r#"{"a":1}"#), r#"{"a":1}"#);
    }

    #[test]
    fn test_extract_from_markdown_fence() {
        let text = "Here you go:\n```json\n{\n  \"a\": {\"b\": 2}\n}\n```\nThanks";
        assert_eq!(extract_json_object(text), "{\n  \"a\": {\"b\": 2}\n}");
    }

    #[test]
    fn test_extract_without_object() {
        assert_eq!(extract_json_object("no data today"), "{}");
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"```json
{
  "symbol": "AAPL",
  "currentPrice": 189.5,
  "freeCashFlow": 99584000000,
  "growthRate": 8,
  "discountRate": 9.2,
  "terminalGrowthRate": 2.5,
  "sharesOutstanding": 15441900000,
  "reasoning": "FY2024 10-K figures."
}
```"#;
        let parsed = parse_assumptions(reply, "aapl").unwrap();

        assert_eq!(parsed.inputs.symbol, "AAPL");
        assert_eq!(parsed.inputs.current_price, 189.5);
        assert_eq!(parsed.inputs.free_cash_flow, 99_584_000_000.0);
        assert_eq!(parsed.inputs.growth_rate_pct, 8.0);
        assert_eq!(parsed.inputs.discount_rate_pct, 9.2);
        assert_eq!(parsed.inputs.shares_outstanding, 15_441_900_000.0);
        assert_eq!(parsed.inputs.projection_years, 5);
        assert_eq!(parsed.reasoning.as_deref(), Some("FY2024 10-K figures."));
    }

    #[test]
    fn test_non_numeric_fields_take_defaults() {
        let reply = r#"{"currentPrice": "189.5", "freeCashFlow": null, "growthRate": "high",
            "discountRate": [9], "sharesOutstanding": true}"#;
        let parsed = parse_assumptions(reply, " msft ").unwrap();

        assert_eq!(parsed.inputs.symbol, "MSFT");
        assert_eq!(parsed.inputs.current_price, 0.0);
        assert_eq!(parsed.inputs.free_cash_flow, 0.0);
        assert_eq!(parsed.inputs.growth_rate_pct, 10.0);
        assert_eq!(parsed.inputs.discount_rate_pct, 9.0);
        assert_eq!(parsed.inputs.terminal_growth_rate_pct, 2.5);
        assert_eq!(parsed.inputs.shares_outstanding, 0.0);
        assert!(parsed.reasoning.is_none());
    }

    #[test]
    fn test_reply_without_json_is_all_defaults() {
        let parsed = parse_assumptions("I could not find that company.", "zzzz").unwrap();
        assert_eq!(
            parsed.inputs,
            ValuationInputs {
                symbol: "ZZZZ".to_string(),
                ..ValuationInputs::default()
            }
        );
    }

    #[test]
    fn test_non_numeric_rates_fall_back_to_form_defaults() {
        let parsed = parse_assumptions(
            r#"{"growthRate": "high", "discountRate": null, "terminalGrowthRate": "2.5%"}"#,
            "msft",
        )
        .unwrap();
        let form = ValuationInputs::default();

        assert_eq!(parsed.inputs.growth_rate_pct, form.growth_rate_pct);
        assert_eq!(parsed.inputs.discount_rate_pct, form.discount_rate_pct);
        assert_eq!(parsed.inputs.terminal_growth_rate_pct, form.terminal_growth_rate_pct);
        assert_eq!(parsed.inputs.projection_years, form.projection_years);
    }

    #[test]
    fn test_alternate_key_spelling() {
        let parsed = parse_assumptions(r#"{"growthRatePct": 12, "discountRatePct": 8}"#, "x").unwrap();
        assert_eq!(parsed.inputs.growth_rate_pct, 12.0);
        assert_eq!(parsed.inputs.discount_rate_pct, 8.0);
    }

    #[test]
    fn test_broken_json_is_parse_error() {
        let err = parse_assumptions(r#"{"currentPrice": 12,}"#, "x").unwrap_err();
        assert!(matches!(err, AssumptionError::Parse(_)));
    }

    #[test]
    fn test_negative_fcf_is_kept() {
        let parsed = parse_assumptions(r#"{"freeCashFlow": -1.5e9}"#, "x").unwrap();
        assert_eq!(parsed.inputs.free_cash_flow, -1.5e9);
    }

    #[test]
    fn test_dedup_sources_keeps_order() {
        let sources = vec![
            "https://b.example".to_string(),
            "https://a.example".to_string(),
            "https://b.example".to_string(),
            String::new(),
            "https://a.example".to_string(),
        ];
        assert_eq!(
            dedup_sources(sources),
            vec!["https://b.example".to_string(), "https://a.example".to_string()]
        );
    }
}
