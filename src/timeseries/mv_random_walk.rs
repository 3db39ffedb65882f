use anyhow::bail;
use anyhow::ensure;
use anyhow::Result;
use ndarray::s;
use ndarray::Array1;
use ndarray::Array3;
use ndarray::ArrayD;
use ndarray::Axis;
use ndarray::Ix2;
use ndarray::IxDyn;
use rand::Rng;
use tracing::debug;

use crate::distributions::covariance::CovarianceSpec;
use crate::distributions::flat::Flat;
use crate::distributions::mv_normal::MvNormal;
use crate::distributions::mv_studentt::MvStudentT;
use crate::error::TimeseriesError;
use crate::traits::LogpExt;
use crate::traits::MultivariateDensity;
use crate::traits::MvInnovation;
use crate::traits::SamplingExt;

/// Event shape of a multivariate walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkShape {
  /// A single vector of `dim` components, no time axis.
  Spatial(usize),
  /// `time` steps of `dim` components each.
  TimeSpatial(usize, usize),
}

impl WalkShape {
  pub fn dim(&self) -> usize {
    match *self {
      WalkShape::Spatial(dim) | WalkShape::TimeSpatial(_, dim) => dim,
    }
  }

  pub fn time(&self) -> usize {
    match *self {
      WalkShape::Spatial(_) => 1,
      WalkShape::TimeSpatial(time, _) => time,
    }
  }

  pub fn dims(&self) -> Vec<usize> {
    match *self {
      WalkShape::Spatial(dim) => vec![dim],
      WalkShape::TimeSpatial(time, dim) => vec![time, dim],
    }
  }
}

/// Multivariate random walk driven by i.i.d. vector innovations:
///
/// \[
///   X_0 \sim \text{init},\quad X_t - X_{t-1} \sim \text{innovation}.
/// \]
///
/// # Fields
/// - `innovation`: Distribution of the increments.
/// - `init`: Density of the first row, `Flat` by default. Wrap a scalar
///   density in [`Elementwise`](crate::distributions::Elementwise) to score
///   each component independently.
/// - `shape`: Event shape used when sampling.
pub struct MvRandomWalk<I: MvInnovation> {
  pub innovation: I,
  pub init: Box<dyn MultivariateDensity>,
  pub shape: WalkShape,
}

/// Random walk with multivariate Normal innovations.
pub type MvGaussianRandomWalk = MvRandomWalk<MvNormal>;

/// Random walk with multivariate Student-t innovations.
pub type MvStudentTRandomWalk = MvRandomWalk<MvStudentT>;

impl<I: MvInnovation> MvRandomWalk<I> {
  pub fn new(
    innovation: I,
    shape: WalkShape,
    init: Option<Box<dyn MultivariateDensity>>,
  ) -> Result<Self> {
    ensure!(
      shape.dim() == innovation.dim(),
      TimeseriesError::ShapeMismatch {
        expected: innovation.dim(),
        actual: shape.dim(),
      }
    );
    ensure!(
      shape.time() > 0,
      TimeseriesError::InvalidSteps { steps: shape.time() }
    );
    debug!(?shape, "built multivariate random walk");

    Ok(Self {
      innovation,
      init: init.unwrap_or_else(|| Box::new(Flat)),
      shape,
    })
  }

  /// Draws walks with output shape `size ++ shape`.
  ///
  /// Innovation rows are drawn draw-major, then in time order. With a time
  /// axis every draw is cumulatively summed and re-anchored on its own first
  /// row, so it starts at zero and its consecutive differences are the drawn
  /// innovations from index 1 on. A spatial-only shape returns the raw
  /// innovations.
  pub fn sample_batch<R: Rng + ?Sized>(&self, rng: &mut R, size: &[usize]) -> Result<ArrayD<f64>> {
    let n_draws: usize = size.iter().product();
    let (time, dim) = (self.shape.time(), self.shape.dim());
    debug!(n_draws, time, dim, "sampling multivariate random walk");

    let mut draws = Array3::<f64>::zeros((n_draws, time, dim));
    for mut row in draws.rows_mut() {
      row.assign(&self.innovation.sample(rng));
    }

    if let WalkShape::TimeSpatial(..) = self.shape {
      draws.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);
      for mut draw in draws.outer_iter_mut() {
        let first = draw.row(0).to_owned();
        draw -= &first;
      }
    }

    let full: Vec<usize> = size.iter().copied().chain(self.shape.dims()).collect();
    Ok(draws.into_shape_with_order(IxDyn(&full))?)
  }
}

impl MvGaussianRandomWalk {
  pub fn gaussian(
    mu: Array1<f64>,
    cov: CovarianceSpec,
    shape: WalkShape,
    init: Option<Box<dyn MultivariateDensity>>,
  ) -> Result<Self> {
    Self::new(MvNormal::new(mu, cov)?, shape, init)
  }
}

impl MvStudentTRandomWalk {
  /// Precision matrices are rejected, the Student-t innovation is only
  /// defined here through a covariance or its Cholesky factor.
  pub fn student_t(
    nu: f64,
    mu: Array1<f64>,
    cov: CovarianceSpec,
    shape: WalkShape,
    init: Option<Box<dyn MultivariateDensity>>,
  ) -> Result<Self> {
    if cov.is_precision() {
      bail!(TimeseriesError::UnsupportedParameterization {
        reason: "Student-t random walk does not accept a precision matrix",
      });
    }
    Self::new(MvStudentT::new(nu, mu, cov)?, shape, init)
  }
}

impl<I: MvInnovation> LogpExt for MvRandomWalk<I> {
  type Value = ArrayD<f64>;
  type Output = f64;

  /// A 1-D value is read as a single time step.
  fn logp(&self, x: &ArrayD<f64>) -> Result<f64> {
    let x = match x.ndim() {
      1 => x.view().insert_axis(Axis(0)).into_dimensionality::<Ix2>()?,
      2 => x.view().into_dimensionality::<Ix2>()?,
      n => bail!(TimeseriesError::ShapeMismatch {
        expected: 2,
        actual: n,
      }),
    };
    ensure!(x.nrows() > 0, TimeseriesError::EmptySequence);
    ensure!(
      x.ncols() == self.innovation.dim(),
      TimeseriesError::ShapeMismatch {
        expected: self.innovation.dim(),
        actual: x.ncols(),
      }
    );

    let diffs = &x.slice(s![1.., ..]) - &x.slice(s![..-1, ..]);
    let init_like = self.init.log_density_sum(x.slice(s![..1, ..]))?;
    Ok(init_like + self.innovation.log_density_sum(diffs.view())?)
  }
}

impl<I: MvInnovation> SamplingExt for MvRandomWalk<I> {
  type Output = ArrayD<f64>;

  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ArrayD<f64>> {
    self.sample_batch(rng, &[])
  }
}
