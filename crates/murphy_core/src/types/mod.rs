//! Value objects shared across the analytics pipeline.
//!
//! All types here are immutable after construction; invariants are enforced
//! by the constructors so downstream components can consume them unchecked.

mod error;
mod series;

pub use error::CoreError;
pub use series::{CumulativeCurve, ReturnSeries, WeightVector};
