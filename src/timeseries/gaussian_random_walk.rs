use anyhow::ensure;
use anyhow::Result;
use either::Either;
use ndarray::concatenate;
use ndarray::s;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;
use ndarray_rand::RandomExt;
use rand::Rng;
use tracing::debug;

use crate::distributions::normal::Normal;
use crate::error::TimeseriesError;
use crate::traits::LogpExt;
use crate::traits::SamplingExt;
use crate::traits::UnivariateDensity;

/// Random walk with Normal innovations:
///
/// \[
///   X_0 \sim \mathcal{N}(\text{init}, \sigma^2),\quad
///   X_t = X_{t-1} + \epsilon_t,\quad \epsilon_t \sim \mathcal{N}(\mu, \sigma^2).
/// \]
///
/// # Fields
/// - `mu`: Innovation drift.
/// - `sigma`: Innovation standard deviation, also used for the initial draw.
/// - `init`: Mean of the initial value.
/// - `steps`: Number of innovations; a sampled series has `steps + 1` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianRandomWalk {
  pub mu: f64,
  pub sigma: f64,
  pub init: f64,
  pub steps: usize,
}

impl Default for GaussianRandomWalk {
  fn default() -> Self {
    Self {
      mu: 0.0,
      sigma: 1.0,
      init: 0.0,
      steps: 0,
    }
  }
}

impl GaussianRandomWalk {
  pub fn new(mu: f64, sigma: f64, init: f64, steps: usize) -> Self {
    Self {
      mu,
      sigma,
      init,
      steps,
    }
  }

  /// Draws `size` series (one when `None`), see [`gaussian_random_walk`].
  pub fn sample_batch<R: Rng + ?Sized>(
    &self,
    rng: &mut R,
    size: Option<usize>,
  ) -> Result<Either<Array1<f64>, Array2<f64>>> {
    gaussian_random_walk(rng, self.mu, self.sigma, self.init, self.steps, size)
  }

  /// Sum of the per-step log-density returned by `logp`.
  pub fn logp_sum(&self, value: &Array1<f64>) -> Result<f64> {
    Ok(self.logp(value)?.sum())
  }
}

/// Gaussian random walk generator.
///
/// All `size` initial values `~ N(init, sigma)` are drawn first, then the
/// `size x steps` increments `~ N(mu, sigma)` row by row. The columns are
/// cumulatively summed. A single series is returned as `Left` with
/// `steps + 1` values, several series as `Right` with shape
/// `(size, steps + 1)`.
pub fn gaussian_random_walk<R: Rng + ?Sized>(
  rng: &mut R,
  mu: f64,
  sigma: f64,
  init: f64,
  steps: usize,
  size: Option<usize>,
) -> Result<Either<Array1<f64>, Array2<f64>>> {
  ensure!(steps > 0, TimeseriesError::InvalidSteps { steps });
  let size = size.unwrap_or(1);
  debug!(steps, size, "sampling gaussian random walk");

  let init_dist = Normal::new(init, sigma)?;
  let step_dist = Normal::new(mu, sigma)?;
  let init_val = Array2::random_using((size, 1), init_dist, rng);
  let increments = Array2::random_using((size, steps), step_dist, rng);

  let mut grw = concatenate(Axis(1), &[init_val.view(), increments.view()])?;
  grw.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);

  if size == 1 {
    Ok(Either::Left(grw.index_axis_move(Axis(0), 0)))
  } else {
    Ok(Either::Right(grw))
  }
}

impl LogpExt for GaussianRandomWalk {
  type Value = Array1<f64>;
  type Output = Array1<f64>;

  /// Per-step log-density with one entry per observation: the first entry
  /// scores a zero gap under `N(init, sigma)`, the rest score the first
  /// differences under `N(mu, sigma)`.
  fn logp(&self, value: &Array1<f64>) -> Result<Array1<f64>> {
    ensure!(!value.is_empty(), TimeseriesError::EmptySequence);
    let init_logp = Normal::new(self.init, self.sigma)?.ln_pdf(0.0);

    let stationary = &value.slice(s![1..]) - &value.slice(s![..-1]);
    let series_logp = Normal::new(self.mu, self.sigma)?.log_density(stationary.view());

    Ok(std::iter::once(init_logp).chain(series_logp.iter().copied()).collect())
  }
}

impl SamplingExt for GaussianRandomWalk {
  type Output = Array1<f64>;

  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Array1<f64>> {
    match self.sample_batch(rng, None)? {
      Either::Left(series) => Ok(series),
      Either::Right(batch) => Ok(batch.index_axis_move(Axis(0), 0)),
    }
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;
  use ndarray::array;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use rand_distr::Distribution;

  use super::*;

  #[test]
  fn single_series_has_steps_plus_one_values() {
    let mut rng = StdRng::seed_from_u64(5);
    let out = gaussian_random_walk(&mut rng, 0.0, 1.0, 0.0, 5, Some(1)).unwrap();
    let series = out.left().unwrap();
    assert_eq!(series.len(), 6);
  }

  #[test]
  fn draws_follow_documented_order() {
    let (mu, sigma, init) = (0.5, 2.0, 3.0);
    let mut rng = StdRng::seed_from_u64(17);
    let series = gaussian_random_walk(&mut rng, mu, sigma, init, 4, None)
      .unwrap()
      .left()
      .unwrap();

    let mut replay = StdRng::seed_from_u64(17);
    let first = rand_distr::Normal::new(init, sigma).unwrap().sample(&mut replay);
    let step_dist = rand_distr::Normal::new(mu, sigma).unwrap();
    let steps: Vec<f64> = (0..4).map(|_| step_dist.sample(&mut replay)).collect();

    assert_abs_diff_eq!(series[0], first, epsilon = 1e-12);
    for t in 1..5 {
      assert_abs_diff_eq!(series[t] - series[t - 1], steps[t - 1], epsilon = 1e-12);
    }
  }

  #[test]
  fn batch_has_one_row_per_series() {
    let mut rng = StdRng::seed_from_u64(5);
    let out = GaussianRandomWalk::new(0.1, 0.5, 0.0, 7)
      .sample_batch(&mut rng, Some(3))
      .unwrap();
    let batch = out.right().unwrap();
    assert_eq!(batch.dim(), (3, 8));
  }

  #[test]
  fn zero_steps_fail_before_drawing() {
    let mut rng = StdRng::seed_from_u64(5);
    let err = GaussianRandomWalk::default()
      .sample_batch(&mut rng, None)
      .unwrap_err();
    assert_eq!(
      err.downcast_ref::<TimeseriesError>(),
      Some(&TimeseriesError::InvalidSteps { steps: 0 })
    );

    let mut untouched = StdRng::seed_from_u64(5);
    assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
  }

  #[test]
  fn logp_is_per_step() {
    let grw = GaussianRandomWalk::new(0.2, 1.5, 1.0, 0);
    let value = array![1.0, 1.4, 0.9, 2.0];
    let lp = grw.logp(&value).unwrap();
    assert_eq!(lp.len(), 4);

    let init = Normal::new(1.0, 1.5).unwrap();
    let step = Normal::new(0.2, 1.5).unwrap();
    assert_relative_eq!(lp[0], init.ln_pdf(0.0), epsilon = 1e-12);
    assert_relative_eq!(lp[1], step.ln_pdf(0.4), epsilon = 1e-12);
    assert_relative_eq!(lp[2], step.ln_pdf(-0.5), epsilon = 1e-12);
    assert_relative_eq!(lp[3], step.ln_pdf(1.1), epsilon = 1e-12);
    assert_relative_eq!(grw.logp_sum(&value).unwrap(), lp.sum(), epsilon = 1e-12);
  }

  #[test]
  fn sampled_trajectory_round_trips_through_logp() {
    let grw = GaussianRandomWalk::new(-0.3, 0.8, 0.0, 25);
    let mut rng = StdRng::seed_from_u64(99);
    let path = grw.sample(&mut rng).unwrap();
    let lp = grw.logp(&path).unwrap();
    assert_eq!(lp.len(), path.len());
    assert!(lp.iter().all(|v| v.is_finite()));
  }

  #[test]
  fn empty_value_is_rejected() {
    assert!(GaussianRandomWalk::default().logp(&Array1::zeros(0)).is_err());
  }

  #[test]
  fn parallel_samples_are_reproducible() {
    let grw = GaussianRandomWalk::new(0.0, 1.0, 0.0, 10);
    let a = grw.sample_par(4, 123).unwrap();
    let b = grw.sample_par(4, 123).unwrap();
    assert_eq!(a.len(), 4);
    assert_eq!(a, b);
    assert_ne!(a[0], a[1]);
  }
}
