//! Error types for the historical analytics pipeline.

use thiserror::Error;

/// Categorised analytics errors.
///
/// Every fatal condition carries enough context (which input, which index)
/// to be diagnosed without re-running with added instrumentation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// An input that must be non-empty was empty.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Dates must be strictly increasing with no duplicates.
    #[error("dates are not strictly increasing at row {index}")]
    NonIncreasingDates {
        /// Index of the offending row.
        index: usize,
    },

    /// The value buffer does not match the declared table shape.
    #[error("value buffer holds {got} values, expected {expected} ({rows} rows x {cols} tickers)")]
    ShapeMismatch {
        /// Number of values provided.
        got: usize,
        /// Number of values required by the shape.
        expected: usize,
        /// Declared row count.
        rows: usize,
        /// Declared ticker count.
        cols: usize,
    },

    /// A ticker appeared more than once in a table or weight vector.
    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),

    /// Weights must be non-negative and finite.
    #[error("invalid weight for {ticker}: {weight}")]
    InvalidWeight {
        /// Ticker carrying the invalid weight.
        ticker: String,
        /// The offending weight value.
        weight: f64,
    },

    /// The return table and weight vector share no tickers.
    #[error("no tickers in common between returns and weights")]
    NoCommonTickers,

    /// Two series that must be date-for-date compatible have different lengths.
    #[error("length mismatch between {left} ({left_len}) and {right} ({right_len})")]
    LengthMismatch {
        /// Name of the first series.
        left: &'static str,
        /// Length of the first series.
        left_len: usize,
        /// Name of the second series.
        right: &'static str,
        /// Length of the second series.
        right_len: usize,
    },

    /// The regression needs at least two overlapping observations.
    #[error("insufficient overlapping observations for regression: got {got}, need at least {need}")]
    InsufficientOverlap {
        /// Overlapping observations found.
        got: usize,
        /// Minimum required.
        need: usize,
    },

    /// The benchmark series has zero variance, so beta is undefined.
    #[error("benchmark has zero variance over the overlap; beta is undefined")]
    DegenerateBenchmark,
}
