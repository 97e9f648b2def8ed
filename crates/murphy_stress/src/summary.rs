//! Summary statistics over a simulated path matrix.
//!
//! Reduces the matrix to expected terminal value, the 5th-percentile terminal
//! value (Value-at-Risk proxy), and the worst running-peak drawdown across
//! all paths and days.

use serde::Serialize;

use murphy_core::drawdown::max_drawdown_of;

use crate::simulate::PathMatrix;

/// Percentile used for the Value-at-Risk proxy.
pub const VAR_PERCENTILE: f64 = 5.0;

/// Tail-risk summary of a simulated path matrix. Derived, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Mean terminal value across simulations.
    pub expected_terminal_value: f64,
    /// 5th-percentile terminal value (linear-interpolated).
    pub var_5_terminal_value: f64,
    /// Most negative drawdown over all paths and days.
    pub worst_drawdown: f64,
}

impl SummaryStats {
    /// The statistics as named rows, in report order.
    pub fn rows(&self) -> [(&'static str, f64); 3] {
        [
            ("Expected Terminal Value", self.expected_terminal_value),
            ("5% VaR", self.var_5_terminal_value),
            ("Worst Drawdown", self.worst_drawdown),
        ]
    }
}

/// Reduces a path matrix to its summary statistics.
pub fn summarize(matrix: &PathMatrix) -> SummaryStats {
    let terminals = matrix.terminal_values();
    let expected_terminal_value = terminals.iter().sum::<f64>() / terminals.len() as f64;
    let var_5_terminal_value = percentile(&terminals, VAR_PERCENTILE);

    let worst_drawdown = (0..matrix.n_simulations())
        .map(|sim| max_drawdown_of(matrix.path(sim)))
        .fold(0.0_f64, f64::min);

    SummaryStats {
        expected_terminal_value,
        var_5_terminal_value,
        worst_drawdown,
    }
}

/// Linear-interpolated percentile of a sample; `NaN` for an empty one.
///
/// Uses the rank `pct/100 * (n-1)` convention: the value is interpolated
/// between the two order statistics bracketing the fractional rank.
pub(crate) fn percentile(values: &[f64], pct: f64) -> f64 {
    debug_assert!((0.0..=100.0).contains(&pct));
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let weight = rank - lo as f64;
        sorted[lo] * (1.0 - weight) + sorted[hi] * weight
    }
}
