//! # Normal
//!
//! $$
//! \log p(x \mid \mu, \tau) = \tfrac12\left(\log\tau - \log 2\pi\right) - \tfrac{\tau}{2}(x-\mu)^2
//! $$
//!
use anyhow::ensure;
use anyhow::Result;
use ndarray::Array1;
use ndarray::ArrayView1;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Distribution;
use rand_distr::StandardNormal;
use statrs::distribution::Continuous;

use super::scale::InnovationScale;
use crate::error::TimeseriesError;
use crate::traits::UnivariateDensity;

fn check_scale(value: f64) -> Result<()> {
  ensure!(
    value.is_finite() && value > 0.0,
    TimeseriesError::InvalidScale { value }
  );
  Ok(())
}

/// Normal distribution with a validated positive scale. Density evaluation
/// is delegated to `statrs`; the precision is kept next to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
  mu: f64,
  sigma: f64,
  tau: f64,
  dist: statrs::distribution::Normal,
}

impl Normal {
  fn build(mu: f64, sigma: f64, tau: f64) -> Result<Self> {
    Ok(Self {
      mu,
      sigma,
      tau,
      dist: statrs::distribution::Normal::new(mu, sigma)?,
    })
  }

  pub fn new(mu: f64, sigma: f64) -> Result<Self> {
    check_scale(sigma)?;
    Self::build(mu, sigma, sigma.powi(-2))
  }

  pub fn from_precision(mu: f64, tau: f64) -> Result<Self> {
    check_scale(tau)?;
    Self::build(mu, tau.powf(-0.5), tau)
  }

  pub fn from_scale(mu: f64, scale: InnovationScale) -> Result<Self> {
    match scale {
      InnovationScale::Sigma(sigma) => Self::new(mu, sigma),
      InnovationScale::Tau(tau) => Self::from_precision(mu, tau),
    }
  }

  pub fn mu(&self) -> f64 {
    self.mu
  }

  pub fn sigma(&self) -> f64 {
    self.sigma
  }

  pub fn tau(&self) -> f64 {
    self.tau
  }

  pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array1<f64> {
    Array1::random_using(n, *self, rng)
  }
}

impl Distribution<f64> for Normal {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
    self.mu + self.sigma * rng.sample::<f64, _>(StandardNormal)
  }
}

impl UnivariateDensity for Normal {
  fn ln_pdf(&self, x: f64) -> f64 {
    self.dist.ln_pdf(x)
  }
}

/// Normal log-density with parameters supplied per evaluation.
pub fn normal_ln_pdf(x: f64, mu: f64, sigma: f64) -> Result<f64> {
  check_scale(sigma)?;
  Ok(statrs::distribution::Normal::new(mu, sigma)?.ln_pdf(x))
}

/// Elementwise Normal log-density where mean and scale vary per element.
pub fn normal_log_density(
  x: ArrayView1<f64>,
  mu: ArrayView1<f64>,
  sigma: ArrayView1<f64>,
) -> Result<Array1<f64>> {
  ensure!(
    mu.len() == x.len(),
    TimeseriesError::ShapeMismatch {
      expected: x.len(),
      actual: mu.len(),
    }
  );
  ensure!(
    sigma.len() == x.len(),
    TimeseriesError::ShapeMismatch {
      expected: x.len(),
      actual: sigma.len(),
    }
  );

  x.iter()
    .zip(mu.iter())
    .zip(sigma.iter())
    .map(|((&x, &m), &s)| normal_ln_pdf(x, m, s))
    .collect()
}
