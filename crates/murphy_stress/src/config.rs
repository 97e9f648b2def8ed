//! Stress simulation configuration.
//!
//! Invalid configurations are rejected at build time, before any simulation
//! work begins.

use thiserror::Error;

/// Maximum number of simulations allowed.
pub const MAX_SIMULATIONS: usize = 10_000_000;

/// Maximum number of days per path allowed.
pub const MAX_DAYS: usize = 10_000;

/// Configuration errors raised before any simulation work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `n_simulations` outside `[1, MAX_SIMULATIONS]`.
    #[error("n_simulations must be in [1, {MAX_SIMULATIONS}], got {0}")]
    InvalidSimulationCount(usize),

    /// `n_days` outside `[1, MAX_DAYS]`.
    #[error("n_days must be in [1, {MAX_DAYS}], got {0}")]
    InvalidDayCount(usize),

    /// Shock probability outside `[0, 1]`.
    #[error("shock_probability must be within [0, 1], got {0}")]
    InvalidShockProbability(f64),

    /// Shock magnitude is not a finite number.
    #[error("shock_magnitude must be finite, got {0}")]
    InvalidShockMagnitude(f64),
}

/// Immutable stress-test configuration.
///
/// Use [`StressConfig::builder`] to override the defaults; `build` validates.
///
/// # Examples
///
/// ```rust
/// use murphy_stress::StressConfig;
///
/// let config = StressConfig::builder()
///     .n_simulations(1_000)
///     .seed(7)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_simulations(), 1_000);
/// assert_eq!(config.n_days(), 252);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StressConfig {
    n_simulations: usize,
    n_days: usize,
    shock_probability: f64,
    shock_magnitude: f64,
    seed: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            n_simulations: 5_000,
            n_days: 252,
            shock_probability: 0.02,
            shock_magnitude: -0.20,
            seed: 42,
        }
    }
}

impl StressConfig {
    /// Creates a builder pre-populated with the defaults.
    #[inline]
    pub fn builder() -> StressConfigBuilder {
        StressConfigBuilder::default()
    }

    /// Number of independent simulated paths.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Number of days per path (including the fixed 1.0 starting day).
    #[inline]
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Per-step probability of an additive shock.
    #[inline]
    pub fn shock_probability(&self) -> f64 {
        self.shock_probability
    }

    /// Additive return applied when a shock triggers.
    #[inline]
    pub fn shock_magnitude(&self) -> f64 {
        self.shock_magnitude
    }

    /// Base seed for the per-path random streams.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// One of the [`ConfigError`] variants for out-of-range counts, a
    /// probability outside `[0, 1]`, or a non-finite magnitude.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_simulations == 0 || self.n_simulations > MAX_SIMULATIONS {
            return Err(ConfigError::InvalidSimulationCount(self.n_simulations));
        }
        if self.n_days == 0 || self.n_days > MAX_DAYS {
            return Err(ConfigError::InvalidDayCount(self.n_days));
        }
        if !(0.0..=1.0).contains(&self.shock_probability) || self.shock_probability.is_nan() {
            return Err(ConfigError::InvalidShockProbability(self.shock_probability));
        }
        if !self.shock_magnitude.is_finite() {
            return Err(ConfigError::InvalidShockMagnitude(self.shock_magnitude));
        }
        Ok(())
    }
}

/// Builder for [`StressConfig`].
///
/// Starts from the documented defaults (5000 simulations, 252 days, 2% shock
/// probability, -20% shock magnitude, seed 42).
#[derive(Clone, Debug)]
pub struct StressConfigBuilder {
    config: StressConfig,
}

impl Default for StressConfigBuilder {
    fn default() -> Self {
        Self {
            config: StressConfig::default(),
        }
    }
}

impl StressConfigBuilder {
    /// Sets the number of simulated paths.
    #[inline]
    pub fn n_simulations(mut self, n_simulations: usize) -> Self {
        self.config.n_simulations = n_simulations;
        self
    }

    /// Sets the number of days per path.
    #[inline]
    pub fn n_days(mut self, n_days: usize) -> Self {
        self.config.n_days = n_days;
        self
    }

    /// Sets the per-step shock probability.
    #[inline]
    pub fn shock_probability(mut self, shock_probability: f64) -> Self {
        self.config.shock_probability = shock_probability;
        self
    }

    /// Sets the additive shock magnitude.
    #[inline]
    pub fn shock_magnitude(mut self, shock_magnitude: f64) -> Self {
        self.config.shock_magnitude = shock_magnitude;
        self
    }

    /// Sets the base seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// See [`StressConfig::validate`].
    pub fn build(self) -> Result<StressConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
