//! Display formatting for money and large magnitudes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system for [`format_compact`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompactStyle {
    /// K, M, B, T
    #[default]
    Western,
    /// 万, 亿, 万亿
    Chinese,
}

impl CompactStyle {
    // Ascending by magnitude
    fn units(self) -> &'static [(f64, &'static str)] {
        match self {
            CompactStyle::Western => &[(1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")],
            CompactStyle::Chinese => &[(1e4, "万"), (1e8, "亿"), (1e12, "万亿")],
        }
    }
}

impl fmt::Display for CompactStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompactStyle::Western => f.write_str("western"),
            CompactStyle::Chinese => f.write_str("chinese"),
        }
    }
}

impl FromStr for CompactStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "western" | "en" | "en-us" => Ok(CompactStyle::Western),
            "chinese" | "zh" | "zh-cn" => Ok(CompactStyle::Chinese),
            other => Err(format!("unknown compact style: {other}")),
        }
    }
}

/// Format as US dollars: `$1,234.50`, `-$12.00`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let text = format!("{:.2}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if value < 0.0 && text.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };

    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Format a magnitude with at most one fraction digit and a unit suffix
///
/// `1234.0` is `1.2K` in the western style and `1234` in the Chinese one.
/// Rounding that reaches the next unit is promoted (`999_950` is `1M`).
pub fn format_compact(value: f64, style: CompactStyle) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let units = style.units();
    let abs = value.abs();
    let mut idx = units.iter().rposition(|(unit, _)| abs >= *unit);

    loop {
        let divisor = idx.map_or(1.0, |i| units[i].0);
        let rounded = round_one_decimal(abs / divisor);
        let next = idx.map_or(0, |i| i + 1);

        if next < units.len() && rounded * divisor >= units[next].0 {
            idx = Some(next);
            continue;
        }

        let suffix = idx.map_or("", |i| units[i].1);
        let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
        return format!("{sign}{}{suffix}", trim_fraction(rounded));
    }
}

/// Signed percentage with one decimal: `+12.3%`
pub fn format_percent(value: f64) -> String {
    let rounded = round_one_decimal(value);
    if rounded > 0.0 {
        format!("+{rounded:.1}%")
    } else if rounded < 0.0 {
        format!("{rounded:.1}%")
    } else {
        "0.0%".to_string()
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn trim_fraction(value: f64) -> String {
    let text = format!("{value:.1}");
    text.strip_suffix(".0").map(str::to_string).unwrap_or(text)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
