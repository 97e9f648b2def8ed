//! Drawdown series and maximum drawdown.
//!
//! Drawdown at each point is the relative decline from the running peak of a
//! value curve: `(v - running_max) / running_max`, always <= 0 and exactly 0
//! at each new running maximum.

use chrono::NaiveDate;

use crate::types::{CoreError, CumulativeCurve};

/// Maximum drawdown of a raw value sequence.
///
/// Returns the most negative running-peak decline, or 0.0 for a sequence
/// that never falls below its running maximum. The sequence must be
/// non-empty; this is the per-path reduction reused by the stress layer.
pub fn max_drawdown_of(values: &[f64]) -> f64 {
    let mut running_max = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;
    for &v in values {
        if v > running_max {
            running_max = v;
        }
        worst = worst.min((v - running_max) / running_max);
    }
    worst
}

/// Date-indexed drawdown series with its scalar maximum drawdown.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawdownSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    max_drawdown: f64,
}

impl DrawdownSeries {
    /// Wraps an already-computed drawdown series (e.g. loaded from disk).
    ///
    /// # Errors
    ///
    /// - [`CoreError::EmptyInput`] if the series is empty
    /// - [`CoreError::LengthMismatch`] if dates and values differ in length
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, CoreError> {
        if values.is_empty() {
            return Err(CoreError::EmptyInput("drawdown series"));
        }
        if dates.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                left: "dates",
                left_len: dates.len(),
                right: "drawdowns",
                right_len: values.len(),
            });
        }
        let max_drawdown = values.iter().copied().fold(f64::INFINITY, f64::min);
        Ok(Self {
            dates,
            values,
            max_drawdown,
        })
    }

    /// Derives the drawdown series of a cumulative value curve.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyInput`] if the curve is empty, or
    /// [`CoreError::LengthMismatch`] if dates and curve differ in length.
    pub fn from_curve(dates: Vec<NaiveDate>, curve: &CumulativeCurve) -> Result<Self, CoreError> {
        if curve.is_empty() {
            return Err(CoreError::EmptyInput("cumulative value curve"));
        }
        let mut running_max = f64::NEG_INFINITY;
        let values = curve
            .values()
            .iter()
            .map(|&v| {
                if v > running_max {
                    running_max = v;
                }
                (v - running_max) / running_max
            })
            .collect();
        Self::new(dates, values)
    }

    /// The ordered dates.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The drawdown fractions, one per date.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The most negative drawdown in the series.
    #[inline]
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }
}
