//! The valuation engine
//!
//! [`compute`] is a pure function: explicit-window projection, Gordon Growth
//! terminal value, enterprise value, per-share value and verdict. It never
//! fails. Degenerate inputs are absorbed so that a half-filled form still
//! renders a number.

use crate::inputs::ValuationInputs;
use crate::result::{ValuationResult, YearProjection};
use tracing::{debug, trace};

/// Lower bound for `discount rate - terminal growth rate` (as fractions)
///
/// This is a policy value, not a derived constant. When the discount rate
/// does not exceed terminal growth the Gordon Growth model has no finite
/// answer; the floor turns that into a very large, finite terminal value.
pub const TERMINAL_DENOMINATOR_FLOOR: f64 = 0.001;

/// The Gordon Growth denominator `r - tg`, floored at
/// [`TERMINAL_DENOMINATOR_FLOOR`]
///
/// Both rates are fractions (`0.09`, not `9`).
pub fn terminal_denominator(discount_rate: f64, terminal_growth_rate: f64) -> f64 {
    let denominator = discount_rate - terminal_growth_rate;
    if denominator <= TERMINAL_DENOMINATOR_FLOOR {
        TERMINAL_DENOMINATOR_FLOOR
    } else {
        denominator
    }
}

/// Whether the terminal value of `inputs` goes through the floor
pub fn is_terminal_clamped(inputs: &ValuationInputs) -> bool {
    let r = inputs.discount_rate_pct / 100.0;
    let tg = inputs.terminal_growth_rate_pct / 100.0;
    r - tg <= TERMINAL_DENOMINATOR_FLOOR
}

/// Run the DCF model on `inputs`
///
/// Callers are expected to keep `projection_years` in `1..=10`. With zero
/// years the projection table is empty and the terminal value is anchored on
/// the base free cash flow.
pub fn compute(inputs: &ValuationInputs) -> ValuationResult {
    let r = inputs.discount_rate_pct / 100.0;
    let g = inputs.growth_rate_pct / 100.0;
    let tg = inputs.terminal_growth_rate_pct / 100.0;
    let years = inputs.projection_years;

    let mut projections = Vec::with_capacity(years as usize);
    let mut fcf = inputs.free_cash_flow;
    let mut sum_discounted_fcf = 0.0;

    for year in 1..=years {
        fcf *= 1.0 + g;
        let discounted_fcf = fcf / discount_factor(r, year);
        sum_discounted_fcf += discounted_fcf;

        projections.push(YearProjection {
            year,
            fcf,
            discounted_fcf,
        });
    }

    // `fcf` is the last projected year here, or the base value when years == 0
    let denominator = terminal_denominator(r, tg);
    if denominator == TERMINAL_DENOMINATOR_FLOOR {
        debug!(
            discount_rate = r,
            terminal_growth_rate = tg,
            "terminal denominator clamped"
        );
    }

    let terminal_value = fcf * (1.0 + tg) / denominator;
    let present_terminal_value = terminal_value / discount_factor(r, years);
    let total_enterprise_value = sum_discounted_fcf + present_terminal_value;

    let intrinsic_value_per_share = if inputs.shares_outstanding > 0.0 {
        total_enterprise_value / inputs.shares_outstanding
    } else {
        0.0
    };

    let upside_downside_pct = if inputs.current_price > 0.0 {
        (intrinsic_value_per_share - inputs.current_price) / inputs.current_price * 100.0
    } else {
        0.0
    };

    trace!(
        symbol = %inputs.symbol,
        total_enterprise_value,
        intrinsic_value_per_share,
        upside_downside_pct,
        "valuation computed"
    );

    ValuationResult {
        projections,
        terminal_value,
        present_terminal_value,
        total_enterprise_value,
        intrinsic_value_per_share,
        upside_downside_pct,
        is_undervalued: intrinsic_value_per_share > inputs.current_price,
    }
}

fn discount_factor(rate: f64, periods: u32) -> f64 {
    (1.0 + rate).powi(periods as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(years: u32) -> ValuationInputs {
        ValuationInputs {
            free_cash_flow: 100.0,
            shares_outstanding: 10.0,
            current_price: 50.0,
            projection_years: years,
            ..ValuationInputs::default()
        }
    }

    #[test]
    fn test_terminal_denominator() {
        assert!((terminal_denominator(0.09, 0.025) - 0.065).abs() < 1e-15);
        assert_eq!(terminal_denominator(0.02, 0.05), TERMINAL_DENOMINATOR_FLOOR);
        assert_eq!(terminal_denominator(0.05, 0.05), TERMINAL_DENOMINATOR_FLOOR);
        assert_eq!(terminal_denominator(0.0305, 0.03), TERMINAL_DENOMINATOR_FLOOR);
    }

    #[test]
    fn test_is_terminal_clamped() {
        let mut i = inputs(5);
        assert!(!is_terminal_clamped(&i));
        i.discount_rate_pct = 2.0;
        i.terminal_growth_rate_pct = 5.0;
        assert!(is_terminal_clamped(&i));
    }

    #[test]
    fn test_fcf_compounds_on_previous_year() {
        let result = compute(&inputs(3));
        let fcfs: Vec<f64> = result.projections.iter().map(|p| p.fcf).collect();
        assert!((fcfs[0] - 110.0).abs() < 1e-9);
        assert!((fcfs[1] - 121.0).abs() < 1e-9);
        assert!((fcfs[2] - 133.1).abs() < 1e-9);
    }

    #[test]
    fn test_zero_years_anchors_on_base_fcf() {
        let result = compute(&inputs(0));
        assert!(result.projections.is_empty());
        let expected = 100.0 * 1.025 / 0.065;
        assert!((result.terminal_value - expected).abs() < 1e-9);
        assert_eq!(result.present_terminal_value, result.terminal_value);
        assert_eq!(result.total_enterprise_value, result.terminal_value);
    }

    #[test]
    fn test_negative_fcf_flows_through() {
        let mut i = inputs(5);
        i.free_cash_flow = -100.0;
        let result = compute(&i);
        assert!(result.total_enterprise_value < 0.0);
        assert!(result.intrinsic_value_per_share < 0.0);
        assert!(!result.is_undervalued);
        assert!(result.upside_downside_pct < -100.0);
    }
}
