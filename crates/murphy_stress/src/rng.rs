//! Seeded random stream for stress simulations.
//!
//! [`StressRng`] wraps a seeded `StdRng` so every simulated path gets its own
//! reproducible stream. Streams are derived from a base seed and the
//! simulation index, never shared, which keeps parallel scheduling off the
//! reproducibility path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Reproducible random stream for one simulation path.
///
/// # Examples
///
/// ```rust
/// use murphy_stress::rng::StressRng;
///
/// let mut a = StressRng::for_path(42, 3);
/// let mut b = StressRng::for_path(42, 3);
/// assert_eq!(a.gen_normal(), b.gen_normal());
/// ```
pub struct StressRng {
    inner: StdRng,
    seed: u64,
}

impl StressRng {
    /// Creates a stream from an explicit seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates the stream owned by simulation `path_index`.
    ///
    /// The derived seed is `base_seed + path_index` (wrapping);
    /// `StdRng::seed_from_u64` bit-mixes the value, so consecutive derived
    /// seeds still yield statistically independent streams. This derivation
    /// is part of the determinism contract: changing it changes every
    /// simulated matrix for a given base seed.
    #[inline]
    pub fn for_path(base_seed: u64, path_index: usize) -> Self {
        Self::from_seed(base_seed.wrapping_add(path_index as u64))
    }

    /// The seed this stream was initialised with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a uniform value in `[0, 1)`.
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Draws a standard normal variate (mean 0, std 1).
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }
}
