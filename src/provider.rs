//! Seeded random and coherent-noise providers.
//!
//! The sketch only sees these through [`RandomSource`] and [`NoiseSource`], so
//! tests can script exact draws. Both default implementations are fully
//! deterministic for a given seed.
//!
//! # Example
//!
//! ```ignore
//! use driftfield::provider::{NoiseSource, PerlinNoise, RandomSource, SeededRandom};
//!
//! let mut random = SeededRandom::new(42);
//! let noise = PerlinNoise::new(42);
//!
//! let r = random.random();                // [0, 1)
//! let n = noise.noise3(0.3, 0.7, 0.0);    // [0, 1)
//! ```

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SketchError;

/// Largest value strictly below 1.0, used to keep noise inside `[0, 1)`.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON;

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn random(&mut self) -> f64;

    /// Restart the stream from `seed`.
    fn reseed(&mut self, seed: u64);

    /// Uniform draw mapped into `[low, high)`.
    fn range(&mut self, low: f64, high: f64) -> f64 {
        map_range(self.random(), 0.0, 1.0, low, high)
    }
}

/// Smooth, seeded noise returning values in `[0, 1)`.
pub trait NoiseSource {
    fn noise2(&self, x: f64, y: f64) -> f64;

    fn noise3(&self, x: f64, y: f64, z: f64) -> f64;

    /// Rebuild the noise field from `seed`.
    fn reseed(&mut self, seed: u64);
}

/// Linear remap of `value` from `[start1, stop1]` onto `[start2, stop2]`.
///
/// Not clamped; either range may be descending.
#[inline]
pub fn map_range(value: f64, start1: f64, stop1: f64, start2: f64, stop2: f64) -> f64 {
    start2 + (stop2 - start2) * ((value - start1) / (stop1 - start1))
}

/// Reject draws that break the `[0, 1)` contract.
pub fn checked_unit(value: f64, what: &str) -> Result<f64, SketchError> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SketchError::ProviderFault(format!(
            "{what} returned {value}, expected a value in [0, 1)"
        )))
    }
}

/// Fold a 64-bit seed into the 32 bits the noise generators accept.
#[inline]
pub fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

// =============================================================================
// Random
// =============================================================================

/// ChaCha8-backed random stream.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed the stream was last started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for SeededRandom {
    #[inline]
    fn random(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }
}

// =============================================================================
// Noise
// =============================================================================

/// Four-octave fractal Perlin noise remapped from `[-1, 1]` to `[0, 1)`.
///
/// Octave count and falloff match the classic creative-coding noise defaults
/// (4 octaves, each at half the amplitude of the previous).
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    seed: u64,
    fbm: Fbm<Perlin>,
}

impl PerlinNoise {
    pub const OCTAVES: usize = 4;
    pub const FALLOFF: f64 = 0.5;

    pub fn new(seed: u64) -> Self {
        let fbm = Fbm::<Perlin>::new(fold_seed(seed))
            .set_octaves(Self::OCTAVES)
            .set_persistence(Self::FALLOFF);
        Self { seed, fbm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn to_unit(value: f64) -> f64 {
        (value * 0.5 + 0.5).clamp(0.0, BELOW_ONE)
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseSource for PerlinNoise {
    #[inline]
    fn noise2(&self, x: f64, y: f64) -> f64 {
        Self::to_unit(self.fbm.get([x, y]))
    }

    #[inline]
    fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        Self::to_unit(self.fbm.get([x, y, z]))
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range_descending() {
        assert_eq!(map_range(800.0, 800.0, 0.0, 4.0, 0.0), 4.0);
        assert_eq!(map_range(400.0, 800.0, 0.0, 4.0, 0.0), 2.0);
        assert_eq!(map_range(0.0, 800.0, 0.0, 4.0, 0.0), 0.0);
        assert_eq!(map_range(0.5, 0.0, 1.0, -3.0, 8.5), 2.75);
    }

    #[test]
    fn test_random_is_deterministic_per_seed() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let xs: Vec<f64> = (0..16).map(|_| a.random()).collect();
        let ys: Vec<f64> = (0..16).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|v| (0.0..1.0).contains(v)));

        let mut c = SeededRandom::new(43);
        let zs: Vec<f64> = (0..16).map(|_| c.random()).collect();
        assert_ne!(xs, zs);
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut random = SeededRandom::new(7);
        let first = random.random();
        random.random();
        random.reseed(7);
        assert_eq!(random.random(), first);
        assert_eq!(random.seed(), 7);
    }

    #[test]
    fn test_range_maps_into_bounds() {
        let mut random = SeededRandom::new(1);
        for _ in 0..100 {
            let v = random.range(3.0, 5.0);
            assert!((3.0..5.0).contains(&v));
        }
    }

    #[test]
    fn test_noise_in_unit_interval_and_deterministic() {
        let a = PerlinNoise::new(99);
        let b = PerlinNoise::new(99);
        for i in 0..200 {
            let x = i as f64 * 0.137;
            let y = i as f64 * 0.071;
            let v = a.noise3(x, y, 0.01 * i as f64);
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, b.noise3(x, y, 0.01 * i as f64));
            assert!((0.0..1.0).contains(&a.noise2(x, y)));
        }
    }

    #[test]
    fn test_noise_is_continuous() {
        let noise = PerlinNoise::new(5);
        let base = noise.noise3(0.4, 0.6, 0.0);
        let nudged = noise.noise3(0.4 + 1e-6, 0.6, 0.0);
        assert!((base - nudged).abs() < 1e-3);
    }

    #[test]
    fn test_checked_unit() {
        assert!(checked_unit(0.0, "noise").is_ok());
        assert!(checked_unit(1.0, "noise").is_err());
        assert!(checked_unit(f64::NAN, "random").is_err());
    }
}
