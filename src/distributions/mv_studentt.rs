//! # Multivariate Student-t
//!
//! $$
//! \log p(x) = \log\Gamma\!\left(\tfrac{\nu+d}{2}\right) - \log\Gamma\!\left(\tfrac{\nu}{2}\right)
//!   - \tfrac d2\log(\nu\pi) - \tfrac12\log|\Sigma|
//!   - \tfrac{\nu+d}{2}\log\!\left(1 + \tfrac{(x-\mu)^\top\Sigma^{-1}(x-\mu)}{\nu}\right)
//! $$
//!
use std::f64::consts::PI;

use anyhow::ensure;
use anyhow::Result;
use ndarray::Array1;
use ndarray::ArrayView1;
use rand::Rng;
use rand_distr::ChiSquared;
use rand_distr::StandardNormal;
use statrs::function::gamma::ln_gamma;

use super::covariance::CholeskyFactor;
use super::covariance::CovarianceSpec;
use super::mv_normal::broadcast_mu;
use crate::error::TimeseriesError;
use crate::traits::MultivariateDensity;
use crate::traits::MvInnovation;

#[derive(Debug, Clone)]
pub struct MvStudentT {
  pub nu: f64,
  pub mu: Array1<f64>,
  factor: CholeskyFactor,
  chi2: ChiSquared<f64>,
}

impl MvStudentT {
  pub fn new(nu: f64, mu: Array1<f64>, cov: CovarianceSpec) -> Result<Self> {
    ensure!(
      nu.is_finite() && nu > 0.0,
      TimeseriesError::InvalidParameter { name: "nu", value: nu }
    );
    let factor = CholeskyFactor::from_spec(&cov)?;
    let mu = broadcast_mu(mu, factor.dim())?;
    let chi2 = ChiSquared::new(nu)?;
    Ok(Self {
      nu,
      mu,
      factor,
      chi2,
    })
  }

  pub fn factor(&self) -> &CholeskyFactor {
    &self.factor
  }
}

impl MultivariateDensity for MvStudentT {
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
    let nu = self.nu;

    Ok(
      ln_gamma(0.5 * (nu + d)) - ln_gamma(0.5 * nu) - 0.5 * d * (nu * PI).ln()
        - self.factor.half_log_det()
        - 0.5 * (nu + d) * (q / nu).ln_1p(),
    )
  }
}

impl MvInnovation for MvStudentT {
  fn dim(&self) -> usize {
    self.mu.len()
  }

  /// `mu + L z * sqrt(nu / w)` with `z ~ N(0, I)` and `w ~ ChiSquared(nu)`.
  /// The normal draws come before the chi-squared draw.
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
    let z: Vec<f64> = (0..self.dim())
      .map(|_| rng.sample::<f64, _>(StandardNormal))
      .collect();
    let w: f64 = rng.sample(&self.chi2);
    let scale = (self.nu / w).sqrt();
    &self.mu + &(self.factor.color(&z) * scale)
  }
}
