use anyhow::ensure;
use anyhow::Result;
use ndarray::s;
use ndarray::Array1;
use ndarray::ArrayView1;
use rand::Rng;
use tracing::debug;

use crate::distributions::flat::Flat;
use crate::distributions::normal::Normal;
use crate::distributions::scale::InnovationScale;
use crate::error::TimeseriesError;
use crate::traits::LogpExt;
use crate::traits::UnivariateDensity;

/// Implements an AR(p) model:
///
/// \[
///   X_t = \rho_0 + \rho_1 X_{t-1} + \dots + \rho_p X_{t-p} + \epsilon_t,
///   \quad \epsilon_t \sim \mathcal{N}(0, \tau^{-1}).
/// \]
///
/// # Fields
/// - `rho`: Coefficients. With `constant` the first entry is \(\rho_0\) and
///   entry `i` is the weight of lag `i`; without it entry `i` is the weight of
///   lag `i + 1`.
/// - `scale`: Innovation standard deviation or precision.
/// - `constant`: Whether `rho[0]` is an intercept.
/// - `init`: Density of the first `p` values, `Flat` by default.
pub struct Ar {
  pub rho: Array1<f64>,
  pub scale: InnovationScale,
  pub constant: bool,
  pub init: Box<dyn UnivariateDensity>,
  p: usize,
}

impl Ar {
  /// Builds the process from mutually exclusive `sigma` / `tau`.
  pub fn new(
    rho: Array1<f64>,
    sigma: Option<f64>,
    tau: Option<f64>,
    constant: bool,
    init: Option<Box<dyn UnivariateDensity>>,
  ) -> Result<Self> {
    Self::with_scale(rho, InnovationScale::from_options(sigma, tau)?, constant, init)
  }

  pub fn with_scale(
    rho: Array1<f64>,
    scale: InnovationScale,
    constant: bool,
    init: Option<Box<dyn UnivariateDensity>>,
  ) -> Result<Self> {
    let p = rho.len().saturating_sub(constant as usize);
    ensure!(
      p > 0,
      TimeseriesError::InvalidLagOrder {
        len: rho.len(),
        constant,
      }
    );
    debug!(p, constant, "built AR(p)");

    Ok(Self {
      rho,
      scale,
      constant,
      init: init.unwrap_or_else(|| Box::new(Flat)),
      p,
    })
  }

  /// Lag order.
  pub fn p(&self) -> usize {
    self.p
  }

  fn lag_coefficient(&self, lag: usize) -> f64 {
    if self.constant {
      self.rho[lag]
    } else {
      self.rho[lag - 1]
    }
  }

  /// Innovations `x[t] - E[x[t] | x[t-p..t]]` for `t = p..T`.
  pub fn residuals(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
    let (p, n) = (self.p, x.len());
    ensure!(
      n > p,
      TimeseriesError::SequenceTooShort {
        required: p + 1,
        actual: n,
      }
    );

    let fitted = if !self.constant && self.rho.len() == 1 {
      &x.slice(s![..-1]) * self.rho[0]
    } else {
      let mut fitted = Array1::<f64>::zeros(n - p);
      if self.constant {
        fitted.fill(self.rho[0]);
      }
      for lag in 1..=p {
        fitted.scaled_add(self.lag_coefficient(lag), &x.slice(s![p - lag..n - lag]));
      }
      fitted
    };

    Ok(&x.slice(s![p..]) - &fitted)
  }

  /// Simulates `n` values. The first `p` are copied from `x0`, the remaining
  /// ones follow the recursion with innovations drawn in time order.
  pub fn simulate<R: Rng + ?Sized>(
    &self,
    n: usize,
    x0: ArrayView1<f64>,
    rng: &mut R,
  ) -> Result<Array1<f64>> {
    let p = self.p;
    ensure!(n > 0, TimeseriesError::InvalidSteps { steps: n });
    ensure!(
      x0.len() >= p,
      TimeseriesError::SequenceTooShort {
        required: p,
        actual: x0.len(),
      }
    );

    let head = p.min(n);
    let noise = Normal::from_scale(0.0, self.scale)?.sample_n(n - head, rng);
    let intercept = if self.constant { self.rho[0] } else { 0.0 };

    let mut series = Array1::<f64>::zeros(n);
    series.slice_mut(s![..head]).assign(&x0.slice(s![..head]));
    for t in p..n {
      let mut val = intercept;
      for lag in 1..=p {
        val += self.lag_coefficient(lag) * series[t - lag];
      }
      series[t] = val + noise[t - p];
    }

    Ok(series)
  }
}

impl LogpExt for Ar {
  type Value = Array1<f64>;
  type Output = f64;

  fn logp(&self, x: &Array1<f64>) -> Result<f64> {
    let eps = self.residuals(x)?;
    let innovation = Normal::from_scale(0.0, self.scale)?;
    let init_like = self.init.log_density_sum(x.slice(s![..self.p]));
    Ok(innovation.log_density_sum(eps.view()) + init_like)
  }
}
