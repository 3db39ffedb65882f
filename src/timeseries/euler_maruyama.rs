use anyhow::ensure;
use anyhow::Result;
use ndarray::aview1;
use ndarray::s;
use ndarray::Array1;
use ndarray::ArrayView1;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::debug;

use crate::distributions::normal::normal_log_density;
use crate::error::TimeseriesError;
use crate::traits::LogpExt;

/// Euler–Maruyama discretisation of a scalar SDE
///
/// \[
///   dX_t = f(X_t, \theta)\,dt + g(X_t, \theta)\,dW_t,
/// \]
///
/// scored as a chain of Gaussian transitions
///
/// \[
///   X_{t+1} \mid X_t \sim \mathcal{N}\!\left(X_t + f\,\Delta t,\ g\sqrt{\Delta t}\right).
/// \]
///
/// # Fields
/// - `dt`: Time step of the discretisation.
/// - `sde_fn`: Returns drift `f` and diffusion `g`, one entry per input value.
/// - `sde_pars`: Parameters forwarded to `sde_fn` on every call.
pub struct EulerMaruyama<F>
where
  F: Fn(ArrayView1<f64>, &[f64]) -> (Array1<f64>, Array1<f64>),
{
  pub dt: f64,
  pub sde_fn: F,
  pub sde_pars: Vec<f64>,
}

impl<F> EulerMaruyama<F>
where
  F: Fn(ArrayView1<f64>, &[f64]) -> (Array1<f64>, Array1<f64>),
{
  pub fn new(dt: f64, sde_fn: F, sde_pars: Vec<f64>) -> Self {
    debug!(dt, pars = sde_pars.len(), "built Euler-Maruyama");
    Self {
      dt,
      sde_fn,
      sde_pars,
    }
  }

  fn check_dt(&self) -> Result<()> {
    ensure!(
      self.dt.is_finite() && self.dt > 0.0,
      TimeseriesError::InvalidScale { value: self.dt }
    );
    Ok(())
  }

  fn coefficients(&self, x: ArrayView1<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
    let (f, g) = (self.sde_fn)(x, &self.sde_pars);
    for coef in [&f, &g] {
      ensure!(
        coef.len() == x.len(),
        TimeseriesError::ShapeMismatch {
          expected: x.len(),
          actual: coef.len(),
        }
      );
    }
    Ok((f, g))
  }

  /// Forward path of `n` values starting at `x0`. The `n - 1` Brownian
  /// increments are drawn before stepping.
  pub fn simulate<R: Rng + ?Sized>(&self, x0: f64, n: usize, rng: &mut R) -> Result<Array1<f64>> {
    ensure!(n > 0, TimeseriesError::InvalidSteps { steps: n });
    self.check_dt()?;

    let sqrt_dt = self.dt.sqrt();
    let gn = Array1::<f64>::random_using(n - 1, StandardNormal, rng);

    let mut x = Array1::<f64>::zeros(n);
    x[0] = x0;
    for i in 1..n {
      let prev = [x[i - 1]];
      let (f, g) = self.coefficients(aview1(&prev))?;
      x[i] = x[i - 1] + f[0] * self.dt + g[0] * sqrt_dt * gn[i - 1];
    }

    Ok(x)
  }
}

impl<F> LogpExt for EulerMaruyama<F>
where
  F: Fn(ArrayView1<f64>, &[f64]) -> (Array1<f64>, Array1<f64>),
{
  type Value = Array1<f64>;
  type Output = f64;

  fn logp(&self, x: &Array1<f64>) -> Result<f64> {
    ensure!(
      x.len() >= 2,
      TimeseriesError::SequenceTooShort {
        required: 2,
        actual: x.len(),
      }
    );
    self.check_dt()?;

    let xt = x.slice(s![..-1]);
    let (f, g) = self.coefficients(xt)?;
    let mu = &xt + &(f * self.dt);
    let sd = g * self.dt.sqrt();

    Ok(normal_log_density(x.slice(s![1..]), mu.view(), sd.view())?.sum())
  }
}
