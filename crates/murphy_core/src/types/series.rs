//! Return table, weight vector, and cumulative value curve.
//!
//! # Memory Layout
//!
//! `ReturnSeries` stores its values row-major:
//! `values[row_idx * n_tickers + ticker_idx]`, one row per calendar date.
//! Missing observations are represented as `NaN` and handled explicitly by
//! the consumers that care (regression drops them, row means skip them).

use chrono::NaiveDate;

use super::error::CoreError;

/// Date-ordered table of daily fractional returns, one column per ticker.
///
/// # Invariants
///
/// - Dates are strictly increasing (no duplicates).
/// - The value buffer is rectangular: `dates.len() * tickers.len()` entries.
/// - Tickers are unique.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use murphy_core::types::ReturnSeries;
///
/// let series = ReturnSeries::new(
///     vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
///     vec!["SPY".into()],
///     vec![0.004],
/// )
/// .unwrap();
/// assert_eq!(series.n_rows(), 1);
/// assert_eq!(series.column("SPY"), Some(vec![0.004]));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    /// Row-major: `values[row * tickers.len() + col]`.
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Creates a return table, validating shape and date ordering.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NonIncreasingDates`] if dates are not strictly increasing
    /// - [`CoreError::ShapeMismatch`] if the buffer is not rectangular
    /// - [`CoreError::DuplicateTicker`] if a ticker appears twice
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        values: Vec<f64>,
    ) -> Result<Self, CoreError> {
        for (index, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(CoreError::NonIncreasingDates { index: index + 1 });
            }
        }
        let expected = dates.len() * tickers.len();
        if values.len() != expected {
            return Err(CoreError::ShapeMismatch {
                got: values.len(),
                expected,
                rows: dates.len(),
                cols: tickers.len(),
            });
        }
        for (i, ticker) in tickers.iter().enumerate() {
            if tickers[..i].contains(ticker) {
                return Err(CoreError::DuplicateTicker(ticker.clone()));
            }
        }
        Ok(Self {
            dates,
            tickers,
            values,
        })
    }

    /// Number of rows (dates).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    /// Number of ticker columns.
    #[inline]
    pub fn n_tickers(&self) -> usize {
        self.tickers.len()
    }

    /// Returns true if the table holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The ordered dates.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The ordered ticker columns.
    #[inline]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// One row of per-ticker returns.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.tickers.len();
        &self.values[row * n..(row + 1) * n]
    }

    /// Column index for a ticker, if present.
    pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Copies out one ticker's return column.
    pub fn column(&self, ticker: &str) -> Option<Vec<f64>> {
        let col = self.ticker_index(ticker)?;
        let n = self.tickers.len();
        Some(self.dates.iter().enumerate().map(|(r, _)| self.values[r * n + col]).collect())
    }

    /// Per-date mean across tickers, skipping `NaN` entries.
    ///
    /// Matches the cross-sectional mean used as the benchmark fallback. A row
    /// with no finite entries yields `NaN`.
    pub fn cross_sectional_mean(&self) -> Vec<f64> {
        (0..self.n_rows())
            .map(|r| {
                let mut sum = 0.0;
                let mut count = 0usize;
                for &v in self.row(r) {
                    if !v.is_nan() {
                        sum += v;
                        count += 1;
                    }
                }
                if count == 0 {
                    f64::NAN
                } else {
                    sum / count as f64
                }
            })
            .collect()
    }

    /// Restricts the table to the given column indices, in the given order.
    ///
    /// Used by the alignment step; indices must be valid column indices.
    pub(crate) fn select_columns(&self, indices: &[usize]) -> Self {
        let n = self.tickers.len();
        let tickers = indices.iter().map(|&c| self.tickers[c].clone()).collect();
        let mut values = Vec::with_capacity(self.dates.len() * indices.len());
        for r in 0..self.dates.len() {
            for &c in indices {
                values.push(self.values[r * n + c]);
            }
        }
        Self {
            dates: self.dates.clone(),
            tickers,
            values,
        }
    }
}

/// Ticker-indexed portfolio weights.
///
/// Weights are taken as given: they need not sum to one and are never
/// renormalised by the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightVector {
    tickers: Vec<String>,
    weights: Vec<f64>,
}

impl WeightVector {
    /// Creates a weight vector from `(ticker, weight)` pairs.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidWeight`] for negative or non-finite weights
    /// - [`CoreError::DuplicateTicker`] if a ticker appears twice
    pub fn new(pairs: Vec<(String, f64)>) -> Result<Self, CoreError> {
        let mut tickers = Vec::with_capacity(pairs.len());
        let mut weights = Vec::with_capacity(pairs.len());
        for (ticker, weight) in pairs {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CoreError::InvalidWeight { ticker, weight });
            }
            if tickers.contains(&ticker) {
                return Err(CoreError::DuplicateTicker(ticker));
            }
            tickers.push(ticker);
            weights.push(weight);
        }
        Ok(Self { tickers, weights })
    }

    /// Number of weighted tickers.
    #[inline]
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Returns true if no tickers are weighted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// The ordered tickers.
    #[inline]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// The weights, ordered to match [`WeightVector::tickers`].
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight for a ticker, if present.
    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.tickers.iter().position(|t| t == ticker).map(|i| self.weights[i])
    }
}

/// Cumulative value curve of a return sequence, from initial capital 1.0.
///
/// Element `t` is the compounded value `prod_{i<=t} (1 + r_i)`; the curve has
/// the same length as the return sequence it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct CumulativeCurve {
    values: Vec<f64>,
}

impl CumulativeCurve {
    /// Compounds a daily return sequence starting from 1.0.
    pub fn from_returns(returns: &[f64]) -> Self {
        let mut values = Vec::with_capacity(returns.len());
        let mut acc = 1.0;
        for &r in returns {
            acc *= 1.0 + r;
            values.push(acc);
        }
        Self { values }
    }

    /// The compounded values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Length of the curve.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the curve is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Final compounded value, if the curve is non-empty.
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}
