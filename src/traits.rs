//! # Traits
//!
//! $$
//! \text{Trait contracts: }\mathcal{D}:\ x \mapsto \log p(x),\quad \mathcal{S}:\ \text{rng} \to \text{samples}
//! $$
//!
use anyhow::Result;
use ndarray::Array1;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Scalar density used for innovations and initial conditions.
pub trait UnivariateDensity: Send + Sync {
  fn ln_pdf(&self, x: f64) -> f64;

  fn log_density(&self, values: ArrayView1<f64>) -> Array1<f64> {
    values.mapv(|x| self.ln_pdf(x))
  }

  fn log_density_sum(&self, values: ArrayView1<f64>) -> f64 {
    values.iter().map(|&x| self.ln_pdf(x)).sum()
  }
}

/// Vector density evaluated row by row.
pub trait MultivariateDensity: Send + Sync {
  fn ln_pdf(&self, x: ArrayView1<f64>) -> Result<f64>;

  /// Sum of `ln_pdf` over the rows of `xs`. Zero rows give 0.
  fn log_density_sum(&self, xs: ArrayView2<f64>) -> Result<f64> {
    xs.outer_iter().map(|row| self.ln_pdf(row)).sum()
  }
}

/// Innovation distribution driving a multivariate walk.
pub trait MvInnovation: MultivariateDensity {
  fn dim(&self) -> usize;

  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64>;
}

/// Log-density of a whole observed sequence.
pub trait LogpExt {
  type Value: ?Sized;
  type Output;

  fn logp(&self, value: &Self::Value) -> Result<Self::Output>;
}

pub trait SamplingExt: Send + Sync {
  type Output: Send;

  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self::Output>;

  /// Draws `m` independent samples in parallel. Path `i` uses its own
  /// generator seeded with `seed + i`, so the result does not depend on
  /// thread scheduling.
  fn sample_par(&self, m: usize, seed: u64) -> Result<Vec<Self::Output>> {
    (0..m)
      .into_par_iter()
      .map(|i| {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
        self.sample(&mut rng)
      })
      .collect()
  }
}
