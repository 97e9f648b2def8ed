//! Portfolio return composition.
//!
//! Reduces an aligned return table and weight vector to a single scalar
//! daily-return sequence via a per-date dot product, and compounds it into
//! the cumulative value curve. Pure and deterministic.

use chrono::NaiveDate;

use crate::types::{CoreError, CumulativeCurve, ReturnSeries, WeightVector};

/// Scalar daily portfolio returns, one per date of the aligned table.
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
}

impl PortfolioSeries {
    /// Creates a portfolio series from matching date and return vectors.
    ///
    /// # Errors
    ///
    /// [`CoreError::LengthMismatch`] if the vectors differ in length.
    pub fn new(dates: Vec<NaiveDate>, returns: Vec<f64>) -> Result<Self, CoreError> {
        if dates.len() != returns.len() {
            return Err(CoreError::LengthMismatch {
                left: "dates",
                left_len: dates.len(),
                right: "returns",
                right_len: returns.len(),
            });
        }
        Ok(Self { dates, returns })
    }

    /// The ordered dates.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The daily portfolio returns.
    #[inline]
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Returns true if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Compounds the daily returns into a value curve starting from 1.0.
    pub fn cumulative_curve(&self) -> CumulativeCurve {
        CumulativeCurve::from_returns(&self.returns)
    }
}

/// Composes the weighted portfolio return series from an aligned pair.
///
/// For each date the portfolio return is the dot product of the row with the
/// weights; no cash drag or residual weight is assumed. The inputs must be
/// aligned: same tickers, same order (as produced by
/// [`align`](crate::align::align)).
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] if the return table has no rows
/// - [`CoreError::LengthMismatch`] if the ticker counts differ
pub fn compose(
    returns: &ReturnSeries,
    weights: &WeightVector,
) -> Result<PortfolioSeries, CoreError> {
    if returns.is_empty() {
        return Err(CoreError::EmptyInput("return table has no rows"));
    }
    if returns.n_tickers() != weights.len() {
        return Err(CoreError::LengthMismatch {
            left: "return columns",
            left_len: returns.n_tickers(),
            right: "weights",
            right_len: weights.len(),
        });
    }

    let w = weights.weights();
    let series = (0..returns.n_rows())
        .map(|r| {
            returns
                .row(r)
                .iter()
                .zip(w)
                .map(|(ret, weight)| ret * weight)
                .sum()
        })
        .collect();

    PortfolioSeries::new(returns.dates().to_vec(), series)
}
