//! Report formatting

use crate::error::{AppError, Result};
use crate::state::AppState;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use dcf_core::{
    ChartBar, CompactStyle, TERMINAL_DENOMINATOR_FLOOR, ValuationInputs, ValuationResult,
    chart_series, format_compact, format_currency, format_percent,
};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const BAR_FULL: char = '█';
const BAR_NEGATIVE: char = '░';

/// Output format of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "table" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(AppError::Command(format!("unknown format: {other}"))),
        }
    }
}

pub trait ReportFormatter: Send + Sync {
    fn format(&self) -> ReportFormat;
    fn format_report(&self, state: &AppState) -> Result<String>;
    fn format_error(&self, error: &str) -> String;
}

/// Terminal report built from tables and a bar chart
#[derive(Debug, Clone, Copy)]
pub struct TextFormatter {
    style: CompactStyle,
    chart_width: usize,
}

impl TextFormatter {
    pub fn new(style: CompactStyle, chart_width: usize) -> Self {
        Self {
            style,
            chart_width: chart_width.max(1),
        }
    }

    /// Just the chart section
    pub fn format_chart(&self, result: &ValuationResult) -> String {
        render_chart(&chart_series(result), self.chart_width, self.style)
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(CompactStyle::Western, 40)
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn format_report(&self, state: &AppState) -> Result<String> {
        let inputs = state.inputs();
        let result = state.result();
        let mut out = String::new();

        if let Some(error) = state.error() {
            out.push_str(&self.format_error(error));
            out.push_str("\n\n");
        }

        if inputs.symbol.is_empty() {
            out.push_str("DCF valuation\n");
        } else {
            out.push_str(&format!("DCF valuation: {}\n", inputs.symbol));
        }

        out.push_str(&verdict_card(state, self.style).to_string());
        out.push('\n');

        if state.terminal_clamped() {
            out.push_str(&format!(
                "⚠ Discount rate ({:.2}%) does not exceed terminal growth ({:.2}%); \
                 the terminal denominator was floored at {:.1}%.\n",
                inputs.discount_rate_pct,
                inputs.terminal_growth_rate_pct,
                TERMINAL_DENOMINATOR_FLOOR * 100.0,
            ));
        }
        if inputs.shares_outstanding == 0.0 {
            out.push_str("⚠ Shares outstanding is 0; per-share value is not meaningful.\n");
        }

        out.push('\n');
        out.push_str(&projection_table(result, self.style).to_string());
        out.push_str("\n\nDiscounted cash flows\n");
        out.push_str(&self.format_chart(result));

        if let Some(reasoning) = state.reasoning() {
            out.push_str("\nReasoning:\n");
            out.push_str(reasoning);
            out.push('\n');
        }

        if !state.sources().is_empty() {
            out.push_str("\nSources:\n");
            for (i, source) in state.sources().iter().enumerate() {
                out.push_str(&format!("  {}. {source}\n", i + 1));
            }
        }

        Ok(out)
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ Error: {error}")
    }
}

/// Pretty-printed `{ "inputs": ..., "result": ... }`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonReport<'a> {
    inputs: &'a ValuationInputs,
    result: &'a ValuationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<&'a str>,
    #[serde(skip_serializing_if = "no_sources")]
    sources: &'a [String],
}

fn no_sources(sources: &&[String]) -> bool {
    sources.is_empty()
}

impl ReportFormatter for JsonFormatter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn format_report(&self, state: &AppState) -> Result<String> {
        let report = JsonReport {
            inputs: state.inputs(),
            result: state.result(),
            reasoning: state.reasoning(),
            sources: state.sources(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({ "error": error }).to_string()
    }
}

/// Formatter for `format`
pub fn formatter(format: ReportFormat, style: CompactStyle, chart_width: usize) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Text => Box::new(TextFormatter::new(style, chart_width)),
        ReportFormat::Json => Box::new(JsonFormatter),
    }
}

fn verdict_card(state: &AppState, style: CompactStyle) -> Table {
    let inputs = state.inputs();
    let result = state.result();
    let has_price = inputs.current_price > 0.0;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let rows = [
        ("Intrinsic value / share", format_currency(result.intrinsic_value_per_share)),
        (
            "Current price",
            if has_price {
                format_currency(inputs.current_price)
            } else {
                "n/a".to_string()
            },
        ),
        (
            "Upside / downside",
            if has_price {
                format_percent(result.upside_downside_pct)
            } else {
                "n/a".to_string()
            },
        ),
        ("Verdict", state.verdict().to_string()),
        ("Enterprise value", money_compact(result.total_enterprise_value, style)),
        (
            "Terminal value share",
            result
                .terminal_share()
                .map_or_else(|| "n/a".to_string(), |s| format!("{:.1}%", s * 100.0)),
        ),
    ];

    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn projection_table(result: &ValuationResult, style: CompactStyle) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Year", "Projected FCF", "Discounted FCF"]);

    for p in &result.projections {
        table.add_row(vec![
            Cell::new(p.year),
            Cell::new(money_compact(p.fcf, style)).set_alignment(CellAlignment::Right),
            Cell::new(money_compact(p.discounted_fcf, style)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.add_row(vec![
        Cell::new("Terminal"),
        Cell::new(money_compact(result.terminal_value, style)).set_alignment(CellAlignment::Right),
        Cell::new(money_compact(result.present_terminal_value, style))
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

/// Horizontal bar chart, longest bar `width` cells
///
/// Negative values are drawn with a lighter block.
pub fn render_chart(bars: &[ChartBar], width: usize, style: CompactStyle) -> String {
    let max_abs = bars.iter().map(|b| b.value.abs()).fold(0.0_f64, f64::max);
    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for bar in bars {
        let mut len = if max_abs > 0.0 {
            ((bar.value.abs() / max_abs) * width as f64).round() as usize
        } else {
            0
        };
        if len == 0 && bar.value != 0.0 {
            len = 1;
        }
        let fill = if bar.value < 0.0 { BAR_NEGATIVE } else { BAR_FULL };
        let body: String = std::iter::repeat_n(fill, len).collect();

        out.push_str(&format!(
            "{:>label_width$} │{body} {}\n",
            bar.label,
            money_compact(bar.value, style)
        ));
    }
    out
}

fn money_compact(value: f64, style: CompactStyle) -> String {
    let text = format_compact(value, style);
    match text.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${text}"),
    }
}
