//! Shock-injection path simulation.
//!
//! Each path starts at value 1.0 and takes `n_days - 1` compounding steps.
//! Per step, a daily return is drawn from a normal distribution with the
//! estimated drift and volatility; independently, with the configured
//! probability, the shock magnitude is *added* to that return (an adverse
//! jump on top of the normal draw, not a replacement). See the crate docs
//! for the canonical draw order and determinism contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use murphy_core::portfolio::PortfolioSeries;

use crate::config::{ConfigError, StressConfig};
use crate::rng::StressRng;

/// Errors from parameter estimation and simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StressError {
    /// Invalid configuration, rejected before any simulation work.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Cannot estimate drift/volatility from an empty series.
    #[error("cannot estimate shock model from an empty return series")]
    EmptyHistory,

    /// Volatility estimation needs at least two observations.
    #[error("need at least {need} observations to estimate volatility, got {got}")]
    InsufficientHistory {
        /// Observations available.
        got: usize,
        /// Minimum required.
        need: usize,
    },

    /// Drift or volatility out of range.
    #[error("invalid shock model parameters: drift={drift}, volatility={volatility}")]
    InvalidParams {
        /// Offending drift.
        drift: f64,
        /// Offending volatility.
        volatility: f64,
    },

    /// The run was cancelled between path computations.
    #[error("simulation cancelled")]
    Cancelled,
}

/// Drift and volatility of the simulated daily return distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShockModelParams {
    /// Mean daily return.
    pub drift: f64,
    /// Daily return standard deviation.
    pub volatility: f64,
}

impl ShockModelParams {
    /// Creates parameters, validating them.
    ///
    /// # Errors
    ///
    /// [`StressError::InvalidParams`] for non-finite drift or negative or
    /// non-finite volatility.
    pub fn new(drift: f64, volatility: f64) -> Result<Self, StressError> {
        let params = Self { drift, volatility };
        if params.is_valid() {
            Ok(params)
        } else {
            Err(StressError::InvalidParams { drift, volatility })
        }
    }

    /// Returns true if drift is finite and volatility is finite and >= 0.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.drift.is_finite() && self.volatility.is_finite() && self.volatility >= 0.0
    }

    /// Estimates drift and volatility from a historical portfolio series.
    ///
    /// Drift is the mean daily return; volatility is the sample (n-1)
    /// standard deviation.
    ///
    /// # Errors
    ///
    /// [`StressError::EmptyHistory`] for an empty series,
    /// [`StressError::InsufficientHistory`] for fewer than two observations.
    pub fn estimate(series: &PortfolioSeries) -> Result<Self, StressError> {
        let returns = series.returns();
        if returns.is_empty() {
            return Err(StressError::EmptyHistory);
        }
        if returns.len() < 2 {
            return Err(StressError::InsufficientHistory {
                got: returns.len(),
                need: 2,
            });
        }
        let n = returns.len() as f64;
        let drift = returns.iter().sum::<f64>() / n;
        let var = returns.iter().map(|r| (r - drift) * (r - drift)).sum::<f64>() / (n - 1.0);
        Self::new(drift, var.sqrt())
    }
}

/// Matrix of simulated value paths, shape `(n_days, n_simulations)`.
///
/// Column `j` is one synthetic value curve. Storage is column-major so each
/// path is contiguous in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMatrix {
    n_days: usize,
    n_simulations: usize,
    /// Column-major: `values[sim * n_days + day]`.
    values: Vec<f64>,
}

impl PathMatrix {
    /// Matrix shape as `(n_days, n_simulations)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_days, self.n_simulations)
    }

    /// Number of days per path.
    #[inline]
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// One simulated value path.
    #[inline]
    pub fn path(&self, sim: usize) -> &[f64] {
        &self.values[sim * self.n_days..(sim + 1) * self.n_days]
    }

    /// The raw column-major buffer.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Terminal value of each path (the last matrix row).
    pub fn terminal_values(&self) -> Vec<f64> {
        (0..self.n_simulations)
            .map(|sim| self.values[sim * self.n_days + self.n_days - 1])
            .collect()
    }
}

/// Cooperative cancellation flag shared with a simulation run.
///
/// Checked between path computations; a cancelled run fails with
/// [`StressError::Cancelled`] and produces no output.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Runs the shock-injection simulation.
///
/// Fans out across the simulation axis with rayon; each path derives its own
/// random stream from the configured seed and its index, so the result is
/// bit-identical to a sequential run and to any re-run with the same seed
/// and configuration.
///
/// # Errors
///
/// - [`StressError::Config`] for an invalid configuration
/// - [`StressError::InvalidParams`] for invalid model parameters
/// - [`StressError::Cancelled`] if the token was cancelled mid-run
pub fn simulate(
    params: ShockModelParams,
    config: &StressConfig,
    cancel: &CancelToken,
) -> Result<PathMatrix, StressError> {
    config.validate()?;
    if !params.is_valid() {
        return Err(StressError::InvalidParams {
            drift: params.drift,
            volatility: params.volatility,
        });
    }

    let n_days = config.n_days();
    let n_simulations = config.n_simulations();
    info!(
        n_simulations,
        n_days,
        seed = config.seed(),
        drift = params.drift,
        volatility = params.volatility,
        "starting shock simulation"
    );

    let paths: Vec<Vec<f64>> = (0..n_simulations)
        .into_par_iter()
        .map(|sim| {
            if cancel.is_cancelled() {
                return Err(StressError::Cancelled);
            }
            Ok(simulate_path(params, config, sim))
        })
        .collect::<Result<_, _>>()?;

    let mut values = Vec::with_capacity(n_days * n_simulations);
    for path in &paths {
        values.extend_from_slice(path);
    }

    debug!(n_simulations, n_days, "shock simulation complete");
    Ok(PathMatrix {
        n_days,
        n_simulations,
        values,
    })
}

/// Computes one simulated value path.
///
/// Deterministic in `(params, config, path_index)`; the parallel driver and
/// tests both call this, which is what makes scheduling irrelevant to the
/// output.
pub fn simulate_path(params: ShockModelParams, config: &StressConfig, path_index: usize) -> Vec<f64> {
    let mut rng = StressRng::for_path(config.seed(), path_index);
    let mut path = Vec::with_capacity(config.n_days());

    let mut value = 1.0;
    path.push(value);
    for _ in 1..config.n_days() {
        // Normal draw first, shock uniform second: canonical per-step order.
        let mut daily_return = params.drift + params.volatility * rng.gen_normal();
        if rng.gen_uniform() < config.shock_probability() {
            daily_return += config.shock_magnitude();
        }
        value *= 1.0 + daily_return;
        path.push(value);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn small_config(n_simulations: usize, n_days: usize) -> StressConfig {
        StressConfig::builder()
            .n_simulations(n_simulations)
            .n_days(n_days)
            .build()
            .unwrap()
    }

    #[test]
    fn test_estimate_from_history() {
        let dates: Vec<NaiveDate> = (0..3)
            .map(|i| NaiveDate::from_num_days_from_ce_opt(738600 + i).unwrap())
            .collect();
        let series = PortfolioSeries::new(dates, vec![0.01, -0.01, 0.03]).unwrap();

        let params = ShockModelParams::estimate(&series).unwrap();
        assert_relative_eq!(params.drift, 0.01, epsilon = 1e-15);
        // Sample variance of [0.01, -0.01, 0.03] around 0.01 is 0.0004.
        assert_relative_eq!(params.volatility, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_rejects_empty() {
        let series = PortfolioSeries::new(vec![], vec![]).unwrap();
        assert_eq!(
            ShockModelParams::estimate(&series).unwrap_err(),
            StressError::EmptyHistory
        );
    }

    #[test]
    fn test_estimate_rejects_single_observation() {
        let dates = vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()];
        let series = PortfolioSeries::new(dates, vec![0.01]).unwrap();
        assert_eq!(
            ShockModelParams::estimate(&series).unwrap_err(),
            StressError::InsufficientHistory { got: 1, need: 2 }
        );
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(ShockModelParams::new(f64::NAN, 0.01).is_err());
        assert!(ShockModelParams::new(0.0, -0.01).is_err());
        assert!(ShockModelParams::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_paths_start_at_one() {
        let params = ShockModelParams::new(0.001, 0.02).unwrap();
        let matrix = simulate(params, &small_config(8, 5), &CancelToken::new()).unwrap();

        assert_eq!(matrix.shape(), (5, 8));
        for sim in 0..8 {
            assert_eq!(matrix.path(sim)[0], 1.0);
        }
    }

    #[test]
    fn test_degenerate_path_is_constant_one() {
        // drift=0, volatility=0, shock_probability=0: nothing moves the path.
        let params = ShockModelParams::new(0.0, 0.0).unwrap();
        let config = StressConfig::builder()
            .n_simulations(1)
            .n_days(3)
            .shock_probability(0.0)
            .build()
            .unwrap();

        let matrix = simulate(params, &config, &CancelToken::new()).unwrap();
        assert_eq!(matrix.path(0), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_certain_shock_compounds_exactly() {
        // With zero volatility and probability 1 every step is the shock.
        let params = ShockModelParams::new(0.0, 0.0).unwrap();
        let config = StressConfig::builder()
            .n_simulations(2)
            .n_days(4)
            .shock_probability(1.0)
            .shock_magnitude(-0.20)
            .build()
            .unwrap();

        let matrix = simulate(params, &config, &CancelToken::new()).unwrap();
        for sim in 0..2 {
            let path = matrix.path(sim);
            for (day, &value) in path.iter().enumerate() {
                assert_relative_eq!(value, 0.8_f64.powi(day as i32), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_bit_identical_reruns() {
        let params = ShockModelParams::new(0.0004, 0.012).unwrap();
        let config = small_config(64, 32);

        let a = simulate(params, &config, &CancelToken::new()).unwrap();
        let b = simulate(params, &config, &CancelToken::new()).unwrap();
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn test_parallel_matches_per_path_reconstruction() {
        let params = ShockModelParams::new(0.0004, 0.012).unwrap();
        let config = small_config(16, 20);

        let matrix = simulate(params, &config, &CancelToken::new()).unwrap();
        for sim in 0..16 {
            assert_eq!(matrix.path(sim), simulate_path(params, &config, sim).as_slice());
        }
    }

    #[test]
    fn test_different_seed_changes_output() {
        let params = ShockModelParams::new(0.0004, 0.012).unwrap();
        let a = simulate(
            params,
            &StressConfig::builder().n_simulations(4).n_days(10).seed(1).build().unwrap(),
            &CancelToken::new(),
        )
        .unwrap();
        let b = simulate(
            params,
            &StressConfig::builder().n_simulations(4).n_days(10).seed(2).build().unwrap(),
            &CancelToken::new(),
        )
        .unwrap();
        assert_ne!(a.values(), b.values());
    }

    #[test]
    fn test_shockless_mean_terminal_approaches_drift_compounding() {
        // With shock_probability=0 the expected terminal value is exactly
        // (1+drift)^(n_days-1); the sample mean converges to it.
        let drift = 0.0005;
        let params = ShockModelParams::new(drift, 0.01).unwrap();
        let config = StressConfig::builder()
            .n_simulations(4_000)
            .n_days(30)
            .shock_probability(0.0)
            .build()
            .unwrap();

        let matrix = simulate(params, &config, &CancelToken::new()).unwrap();
        let terminals = matrix.terminal_values();
        let mean = terminals.iter().sum::<f64>() / terminals.len() as f64;
        let expected = (1.0 + drift).powi(29);
        assert_relative_eq!(mean, expected, max_relative = 0.01);
    }

    #[test]
    fn test_cancelled_run_produces_no_output() {
        let params = ShockModelParams::new(0.0, 0.01).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        assert_eq!(
            simulate(params, &small_config(32, 16), &cancel).unwrap_err(),
            StressError::Cancelled
        );
    }

    #[test]
    fn test_cancel_mid_run_aborts() {
        // Workload large enough that the run cannot finish before the
        // cancel fires from the other thread.
        let params = ShockModelParams::new(0.0004, 0.012).unwrap();
        let config = small_config(100_000, 1_000);
        let cancel = CancelToken::new();

        let canceller = {
            let cancel = cancel.clone();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(10));
                cancel.cancel();
            })
        };

        let result = simulate(params, &config, &cancel);
        canceller.join().unwrap();
        assert_eq!(result.unwrap_err(), StressError::Cancelled);
    }

    #[test]
    fn test_invalid_params_rejected_before_work() {
        let params = ShockModelParams {
            drift: f64::NAN,
            volatility: 0.01,
        };
        assert!(matches!(
            simulate(params, &small_config(4, 4), &CancelToken::new()),
            Err(StressError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_terminal_values_are_last_row() {
        let params = ShockModelParams::new(0.001, 0.01).unwrap();
        let matrix = simulate(params, &small_config(6, 4), &CancelToken::new()).unwrap();

        let terminals = matrix.terminal_values();
        for sim in 0..6 {
            assert_eq!(terminals[sim], matrix.path(sim)[3]);
        }
    }

    proptest! {
        #[test]
        fn prop_paths_start_at_one_with_declared_shape(
            n_simulations in 1usize..32,
            n_days in 1usize..64,
            seed in any::<u64>(),
            drift in -0.01f64..0.01,
            volatility in 0.0f64..0.05,
        ) {
            let params = ShockModelParams::new(drift, volatility).unwrap();
            let config = StressConfig::builder()
                .n_simulations(n_simulations)
                .n_days(n_days)
                .seed(seed)
                .build()
                .unwrap();

            let matrix = simulate(params, &config, &CancelToken::new()).unwrap();
            prop_assert_eq!(matrix.shape(), (n_days, n_simulations));
            for sim in 0..n_simulations {
                prop_assert_eq!(matrix.path(sim)[0], 1.0);
            }
        }
    }
}
