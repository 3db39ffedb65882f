//! # Multivariate Normal
//!
//! $$
//! \log p(x) = -\tfrac12\left(d\log 2\pi + \log|\Sigma| + (x-\mu)^\top\Sigma^{-1}(x-\mu)\right)
//! $$
//!
use std::f64::consts::PI;

use anyhow::ensure;
use anyhow::Result;
use ndarray::Array1;
use ndarray::ArrayView1;
use rand::Rng;
use rand_distr::StandardNormal;

use super::covariance::CholeskyFactor;
use super::covariance::CovarianceSpec;
use crate::error::TimeseriesError;
use crate::traits::MultivariateDensity;
use crate::traits::MvInnovation;

/// Broadcasts a length-1 mean to `dim`, otherwise requires an exact match.
pub(crate) fn broadcast_mu(mu: Array1<f64>, dim: usize) -> Result<Array1<f64>> {
  if mu.len() == 1 && dim != 1 {
    return Ok(Array1::from_elem(dim, mu[0]));
  }
  ensure!(
    mu.len() == dim,
    TimeseriesError::ShapeMismatch {
      expected: dim,
      actual: mu.len(),
    }
  );
  Ok(mu)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MvNormal {
  pub mu: Array1<f64>,
  factor: CholeskyFactor,
}

impl MvNormal {
  pub fn new(mu: Array1<f64>, cov: CovarianceSpec) -> Result<Self> {
    let factor = CholeskyFactor::from_spec(&cov)?;
    let mu = broadcast_mu(mu, factor.dim())?;
    Ok(Self { mu, factor })
  }

  pub fn factor(&self) -> &CholeskyFactor {
    &self.factor
  }
}

impl MultivariateDensity for MvNormal {
  fn ln_pdf(&self, x: ArrayView1<f64>) -> Result<f64> {
    ensure!(
      x.len() == self.mu.len(),
      TimeseriesError::ShapeMismatch {
        expected: self.mu.len(),
        actual: x.len(),
      }
    );
    let diff = &x - &self.mu;
    let q = self.factor.mahalanobis(diff.view())?;
    let d = self.mu.len() as f64;
    Ok(-0.5 * (d * (2.0 * PI).ln() + q) - self.factor.half_log_det())
  }
}

impl MvInnovation for MvNormal {
  fn dim(&self) -> usize {
    self.mu.len()
  }

  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
    let z: Vec<f64> = (0..self.dim())
      .map(|_| rng.sample::<f64, _>(StandardNormal))
      .collect();
    &self.mu + &self.factor.color(&z)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;
  use ndarray::array;
  use ndarray::Array2;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;
  use crate::distributions::normal::Normal;
  use crate::traits::UnivariateDensity;

  #[test]
  fn diagonal_covariance_factorises_into_normals() {
    let mvn = MvNormal::new(
      array![1.0, -1.0],
      CovarianceSpec::Cov(array![[4.0, 0.0], [0.0, 0.25]]),
    )
    .unwrap();
    let x = array![0.5, 0.0];
    let expected =
      Normal::new(1.0, 2.0).unwrap().ln_pdf(0.5) + Normal::new(-1.0, 0.5).unwrap().ln_pdf(0.0);
    assert_relative_eq!(mvn.ln_pdf(x.view()).unwrap(), expected, epsilon = 1e-12);
  }

  #[test]
  fn scalar_mean_is_broadcast() {
    let mvn = MvNormal::new(array![0.5], CovarianceSpec::Cov(Array2::eye(3))).unwrap();
    assert_eq!(mvn.mu, array![0.5, 0.5, 0.5]);
  }

  #[test]
  fn mean_of_wrong_length_is_rejected() {
    assert!(MvNormal::new(array![0.0, 0.0], CovarianceSpec::Cov(Array2::eye(3))).is_err());
  }

  #[test]
  fn value_of_wrong_length_is_rejected() {
    let mvn = MvNormal::new(array![0.0], CovarianceSpec::Cov(Array2::eye(2))).unwrap();
    let err = mvn.ln_pdf(array![1.0, 2.0, 3.0].view()).unwrap_err();
    assert!(matches!(
      err.downcast_ref::<TimeseriesError>(),
      Some(TimeseriesError::ShapeMismatch { .. })
    ));
  }

  #[test]
  fn precision_and_covariance_give_same_density() {
    let by_cov = MvNormal::new(array![0.0], CovarianceSpec::Cov(array![[2.0, 0.0], [0.0, 0.5]]))
      .unwrap();
    let by_tau = MvNormal::new(array![0.0], CovarianceSpec::Tau(array![[0.5, 0.0], [0.0, 2.0]]))
      .unwrap();
    let x = array![0.3, -1.2];
    assert_abs_diff_eq!(
      by_cov.ln_pdf(x.view()).unwrap(),
      by_tau.ln_pdf(x.view()).unwrap(),
      epsilon = 1e-12
    );
  }

  #[test]
  fn sample_mean_approaches_mu() {
    let mvn = MvNormal::new(
      array![1.0, -2.0],
      CovarianceSpec::Cov(array![[1.0, 0.5], [0.5, 2.0]]),
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let n = 20_000;
    let mut acc = Array1::<f64>::zeros(2);
    for _ in 0..n {
      acc += &mvn.sample(&mut rng);
    }
    acc /= n as f64;
    assert_abs_diff_eq!(acc[0], 1.0, epsilon = 0.05);
    assert_abs_diff_eq!(acc[1], -2.0, epsilon = 0.05);
  }
}
