//! # murphy_core: Historical Portfolio Analytics
//!
//! ## Core Layer Role
//!
//! murphy_core is the bottom layer of the workspace, providing the historical
//! analytics pipeline over immutable value objects:
//! - Return/weight data model with construction-time invariants (`types`)
//! - Ticker alignment between returns and weights (`align`)
//! - Portfolio return composition and cumulative value curve (`portfolio`)
//! - Drawdown series and maximum drawdown (`drawdown`)
//! - Annualised performance metrics with regression beta/alpha (`metrics`)
//!
//! ## No Ambient State
//!
//! Every entry point receives its configuration explicitly. The crate performs
//! no I/O and holds no global state; logging goes through `tracing` macros and
//! is only ever *configured* by the service layer.
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use murphy_core::align::align;
//! use murphy_core::drawdown::DrawdownSeries;
//! use murphy_core::portfolio::compose;
//! use murphy_core::types::{ReturnSeries, WeightVector};
//!
//! let dates = vec![
//!     NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
//! ];
//! let returns = ReturnSeries::new(
//!     dates,
//!     vec!["AAPL".into(), "MSFT".into()],
//!     vec![0.01, 0.02, -0.02, 0.01],
//! )
//! .unwrap();
//! let weights = WeightVector::new(vec![("AAPL".into(), 0.5), ("MSFT".into(), 0.5)]).unwrap();
//!
//! let aligned = align(&returns, &weights).unwrap();
//! let portfolio = compose(&aligned.returns, &aligned.weights).unwrap();
//! let curve = portfolio.cumulative_curve();
//! let drawdown = DrawdownSeries::from_curve(portfolio.dates().to_vec(), &curve).unwrap();
//! assert!(drawdown.max_drawdown() <= 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod align;
pub mod drawdown;
pub mod metrics;
pub mod portfolio;
pub mod types;

pub use types::CoreError;
