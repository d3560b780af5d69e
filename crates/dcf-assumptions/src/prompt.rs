//! Lookup prompt

use crate::config::ReasoningLanguage;
use crate::error::Result;
use minijinja::{Environment, context};

/// Terminal growth the model is told to use unless it has a better figure
pub const SUGGESTED_TERMINAL_GROWTH_PCT: f64 = 2.5;

const LOOKUP_TEMPLATE: &str = r#"I need to perform a Discounted Cash Flow (DCF) valuation for the company with ticker symbol: {{ ticker }}.

Please use Google Search to find the most recent financial data available.
I need the following specific metrics:
1. Current Stock Price (USD).
2. Latest Annual Free Cash Flow (FCF) in USD.
3. Estimated Growth Rate for the next {{ horizon }} years (percentage). If unknown, estimate based on historical CAGR or industry averages (conservative).
4. Weighted Average Cost of Capital (WACC) as the Discount Rate (percentage).
5. Shares Outstanding.

Return a JSON object with this structure:
{
  "symbol": "{{ ticker }}",
  "currentPrice": <number>,
  "freeCashFlow": <number>,
  "growthRate": <number>,
  "discountRate": <number>,
  "terminalGrowthRate": {{ terminal_growth }},
  "sharesOutstanding": <number>,
  "reasoning": "<{{ reasoning_hint }}>"
}

Rules:
- Return ONLY raw JSON. No markdown code blocks.
- freeCashFlow and sharesOutstanding should be full raw numbers (e.g., 1000000000 for 1B).
- If you find values in billions/millions, convert them to full numbers."#;

/// Render the lookup prompt for `ticker`
pub fn render_lookup_prompt(ticker: &str, horizon: u32, language: ReasoningLanguage) -> Result<String> {
    let reasoning_hint = match language {
        ReasoningLanguage::English => {
            "A short summary of where these figures come from and why this growth rate and WACC were chosen"
        }
        ReasoningLanguage::Chinese => {
            "简短总结这些数据的来源以及为何选择该增长率/WACC (Must be in Chinese)"
        }
    };

    let env = Environment::new();
    let rendered = env.render_str(
        LOOKUP_TEMPLATE,
        context! {
            ticker => ticker,
            horizon => horizon,
            terminal_growth => SUGGESTED_TERMINAL_GROWTH_PCT,
            reasoning_hint => reasoning_hint,
        },
    )?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_ticker_and_fields() {
        let prompt = render_lookup_prompt("MSFT", 5, ReasoningLanguage::English).unwrap();
        assert!(prompt.contains("ticker symbol: MSFT"));
        assert!(prompt.contains(r#""symbol": "MSFT""#));
        assert!(prompt.contains("next 5 years"));
        assert!(prompt.contains(r#""terminalGrowthRate": 2.5"#));
        for field in ["currentPrice", "freeCashFlow", "growthRate", "discountRate", "sharesOutstanding"] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("Return ONLY raw JSON"));
    }

    #[test]
    fn test_prompt_language() {
        let prompt = render_lookup_prompt("0700.HK", 5, ReasoningLanguage::Chinese).unwrap();
        assert!(prompt.contains("Must be in Chinese"));
        assert!(!prompt.contains("A short summary"));
    }
}
