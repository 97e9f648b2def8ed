//! CLI error types with input-path context.

use thiserror::Error;

use murphy_core::CoreError;
use murphy_stress::{ConfigError, StressError};

/// Convenient result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error.
///
/// File and parse failures carry the offending path so a bad cell in one of
/// several inputs is attributable from the message alone.
#[derive(Error, Debug)]
pub enum CliError {
    /// Could not read an input file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Input path.
        path: String,
        /// Underlying io error.
        source: std::io::Error,
    },

    /// Could not write an output file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// Output path.
        path: String,
        /// Underlying io error.
        source: std::io::Error,
    },

    /// CSV structure or encoding problem in an input.
    #[error("malformed csv in {path}: {source}")]
    MalformedCsv {
        /// Input path.
        path: String,
        /// Underlying csv error.
        source: csv::Error,
    },

    /// A cell failed to parse as the expected type.
    #[error("{path}: row {row}, column {column}: cannot parse {value:?} as {expected}")]
    BadCell {
        /// Input path.
        path: String,
        /// One-based data row.
        row: usize,
        /// Column header or position.
        column: String,
        /// Raw cell contents.
        value: String,
        /// Expected type description.
        expected: &'static str,
    },

    /// An input table had no data rows.
    #[error("{path}: no data rows")]
    EmptyTable {
        /// Input path.
        path: String,
    },

    /// Failure in the analytics layer.
    #[error("analytics error: {0}")]
    Core(#[from] CoreError),

    /// Invalid stress simulation configuration.
    #[error("simulation configuration error: {0}")]
    StressConfig(#[from] ConfigError),

    /// Failure in the stress simulation layer.
    #[error("simulation error: {0}")]
    Stress(#[from] StressError),
}
