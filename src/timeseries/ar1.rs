use anyhow::ensure;
use anyhow::Result;
use ndarray::s;
use ndarray::Array1;
use rand::Rng;
use rand_distr::Distribution;
use tracing::debug;
use tracing::warn;

use crate::distributions::normal::Normal;
use crate::error::TimeseriesError;
use crate::scan::scan;
use crate::traits::LogpExt;
use crate::traits::UnivariateDensity;

/// Autoregressive process with one lag:
///
/// \[
///   X_0 \sim \mathcal{N}\!\left(0, \tau^{-1}\right),\quad
///   X_t = k X_{t-1} + \epsilon_t,\quad \epsilon_t \sim \mathcal{N}(0, \tau_e^{-1}),
/// \]
///
/// where \(\tau = \tau_e (1 - k^2)\) is the stationary precision.
///
/// # Fields
/// - `k`: Effect of the lagged value on the current value.
/// - `tau_e`: Precision of the innovations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ar1 {
  pub k: f64,
  pub tau_e: f64,
}

impl Ar1 {
  pub fn new(k: f64, tau_e: f64) -> Self {
    if k.abs() >= 1.0 {
      warn!(k, "AR(1) with |k| >= 1 has no stationary distribution");
    }
    debug!(k, tau_e, "built AR(1)");
    Self { k, tau_e }
  }

  /// Stationary precision of `X_0`.
  pub fn tau(&self) -> f64 {
    self.tau_e * (1.0 - self.k.powi(2))
  }

  /// Simulates `n` values. `X_0` is drawn first from the stationary
  /// distribution, then the `n - 1` innovations in time order.
  pub fn simulate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Array1<f64>> {
    ensure!(n > 0, TimeseriesError::InvalidSteps { steps: n });
    let x0 = Normal::from_precision(0.0, self.tau())?.sample(rng);
    let noise = Normal::from_precision(0.0, self.tau_e)?.sample_n(n - 1, rng);

    let k = self.k;
    let path = scan(x0, noise.iter(), |prev, &e| k * prev + e);
    Ok(std::iter::once(x0).chain(path).collect())
  }
}

impl LogpExt for Ar1 {
  type Value = Array1<f64>;
  type Output = f64;

  fn logp(&self, x: &Array1<f64>) -> Result<f64> {
    ensure!(!x.is_empty(), TimeseriesError::EmptySequence);
    let boundary = Normal::from_precision(0.0, self.tau())?;
    let innovation = Normal::from_precision(0.0, self.tau_e)?;

    let lagged = &x.slice(s![..-1]) * self.k;
    let residuals = &x.slice(s![1..]) - &lagged;

    Ok(boundary.ln_pdf(x[0]) + innovation.log_density_sum(residuals.view()))
  }
}
