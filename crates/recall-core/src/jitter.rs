//! Randomised interval noise.
//!
//! Each graded review multiplies the new interval by a factor drawn from
//! `[JITTER_MIN, JITTER_MAX]` so that items added together drift apart
//! instead of coming due in lock-step.

use rand::{Rng, SeedableRng, rngs::StdRng};

pub const JITTER_MIN: f64 = 0.75;
pub const JITTER_MAX: f64 = 1.25;

/// A source of jitter samples.
pub trait Jitter: Send {
  /// Draw the next multiplier. Implementations stay within
  /// `[JITTER_MIN, JITTER_MAX]`.
  fn sample(&mut self) -> f64;
}

/// Uniformly distributed jitter backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct UniformJitter {
  rng: StdRng,
}

impl UniformJitter {
  /// Seed from the operating system; the production default.
  pub fn from_entropy() -> Self { Self { rng: StdRng::from_entropy() } }

  /// Reproducible sequence for a given seed.
  pub fn seeded(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed) } }
}

impl Default for UniformJitter {
  fn default() -> Self { Self::from_entropy() }
}

impl Jitter for UniformJitter {
  fn sample(&mut self) -> f64 { self.rng.gen_range(JITTER_MIN..=JITTER_MAX) }
}

/// Always yields the same multiplier. `FixedJitter(1.0)` disables jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
  fn sample(&mut self) -> f64 { self.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uniform_samples_stay_in_range() {
    let mut jitter = UniformJitter::seeded(7);
    for _ in 0..1_000 {
      let s = jitter.sample();
      assert!((JITTER_MIN..=JITTER_MAX).contains(&s), "sample {s} out of range");
    }
  }

  #[test]
  fn seeded_jitter_is_reproducible() {
    let mut a = UniformJitter::seeded(42);
    let mut b = UniformJitter::seeded(42);
    let xs: Vec<f64> = (0..16).map(|_| a.sample()).collect();
    let ys: Vec<f64> = (0..16).map(|_| b.sample()).collect();
    assert_eq!(xs, ys);
  }

  #[test]
  fn fixed_jitter_is_constant() {
    let mut j = FixedJitter(1.0);
    assert_eq!(j.sample(), 1.0);
    assert_eq!(j.sample(), 1.0);
  }
}
