//! # murphy_stress: Shock-Injection Monte Carlo Stress Testing
//!
//! Generates many independent synthetic portfolio value paths under a
//! drift/volatility model with probabilistic adverse "shock" jumps, and
//! reduces the resulting path matrix to tail-risk summary statistics.
//!
//! ## Determinism Contract
//!
//! Identical seed and configuration reproduce a bit-identical path matrix.
//! The canonical draw order is simulation-major: every simulation owns its
//! own random stream, seeded from the base seed and the simulation index
//! (see [`rng::StressRng::for_path`]). Within a step the normal return draw
//! is taken before the shock uniform draw. Because no stream is shared,
//! sequential and parallel execution produce the same bits.
//!
//! ## Parallelism
//!
//! Paths are statistically and computationally independent, so the simulator
//! fans out across the simulation axis with `rayon`. The only shared state is
//! the read-only configuration and a cooperative [`simulate::CancelToken`]
//! checked between path computations.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod rng;
pub mod simulate;
pub mod summary;

pub use config::{ConfigError, StressConfig};
pub use simulate::{CancelToken, PathMatrix, ShockModelParams, StressError};
pub use summary::SummaryStats;
