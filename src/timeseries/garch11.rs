use anyhow::ensure;
use anyhow::Result;
use impl_new_derive::ImplNew;
use ndarray::s;
use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::debug;
use tracing::warn;

use crate::distributions::normal::normal_log_density;
use crate::error::TimeseriesError;
use crate::scan::scan;
use crate::traits::LogpExt;

/// Implements a GARCH(1,1) model with an exogenous starting volatility.
///
/// \[
///   \sigma_t^2 = \omega + \alpha_1 X_{t-1}^2 + \beta_1 \sigma_{t-1}^2,
///   \quad X_t = \sigma_t \, z_t, \quad z_t \sim \mathcal{N}(0,1),
///   \quad \sigma_0 = \text{initial\_vol}.
/// \]
///
/// # Parameters
/// - `omega`: Constant term of the variance equation.
/// - `alpha_1`: Weight of the lagged squared observation.
/// - `beta_1`: Weight of the lagged variance.
/// - `initial_vol`: Volatility at `t = 0`.
///
/// # Notes
/// Covariance stationarity requires \(\alpha_1 + \beta_1 < 1\). This is not
/// enforced, see [`Garch11::is_stationary`].
#[derive(ImplNew, Debug, Clone, Copy, PartialEq)]
pub struct Garch11 {
  pub omega: f64,
  pub alpha_1: f64,
  pub beta_1: f64,
  pub initial_vol: f64,
}

impl Garch11 {
  pub fn is_stationary(&self) -> bool {
    self.alpha_1 + self.beta_1 < 1.0
  }

  fn next_vol(&self, x_prev: f64, vol_prev: f64) -> f64 {
    (self.omega + self.alpha_1 * x_prev.powi(2) + self.beta_1 * vol_prev.powi(2)).sqrt()
  }

  /// Conditional volatility path, one entry per observation. `vol[t]` only
  /// depends on `x[..t]`, so the last observation is never read.
  pub fn volatility(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
    ensure!(!x.is_empty(), TimeseriesError::EmptySequence);
    let rest = scan(self.initial_vol, x.slice(s![..-1]).iter(), |&vol, &x_prev| {
      self.next_vol(x_prev, vol)
    });
    Ok(std::iter::once(self.initial_vol).chain(rest).collect())
  }

  /// Simulates `n` returns. The `n` standard Normal shocks are drawn up front,
  /// then the volatility recursion runs forward over them.
  pub fn simulate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Array1<f64>> {
    ensure!(n > 0, TimeseriesError::InvalidSteps { steps: n });
    ensure!(
      self.initial_vol.is_finite() && self.initial_vol > 0.0,
      TimeseriesError::InvalidScale {
        value: self.initial_vol,
      }
    );
    debug!(n, stationary = self.is_stationary(), "simulating GARCH(1,1)");

    let z = Array1::<f64>::random_using(n, StandardNormal, rng);
    let first = (self.initial_vol * z[0], self.initial_vol);
    let rest = scan(first, z.iter().skip(1), |&(x_prev, vol_prev), &z_t| {
      let vol = self.next_vol(x_prev, vol_prev);
      (vol * z_t, vol)
    });

    Ok(std::iter::once(first).chain(rest).map(|(x, _)| x).collect())
  }
}

impl LogpExt for Garch11 {
  type Value = Array1<f64>;
  type Output = f64;

  fn logp(&self, x: &Array1<f64>) -> Result<f64> {
    if !self.is_stationary() {
      warn!(
        alpha_1 = self.alpha_1,
        beta_1 = self.beta_1,
        "GARCH(1,1) with alpha_1 + beta_1 >= 1 is not covariance stationary"
      );
    }
    let vol = self.volatility(x)?;
    let zeros = Array1::<f64>::zeros(x.len());
    Ok(normal_log_density(x.view(), zeros.view(), vol.view())?.sum())
  }
}
