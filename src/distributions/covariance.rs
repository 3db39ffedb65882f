//! # Covariance
//!
//! $$
//! \Sigma = L L^\top,\qquad \Sigma = \tau^{-1}
//! $$
//!
//! Every covariance input is canonicalised once into a lower
//! triangular Cholesky factor.
use anyhow::bail;
use anyhow::ensure;
use anyhow::Result;
use nalgebra::DMatrix;
use nalgebra::DVector;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;

use crate::error::TimeseriesError;

/// How the innovation covariance of a multivariate distribution is given.
#[derive(Debug, Clone, PartialEq)]
pub enum CovarianceSpec {
  /// Covariance matrix.
  Cov(Array2<f64>),
  /// Precision (inverse covariance) matrix.
  Tau(Array2<f64>),
  /// Cholesky factor of the covariance. `lower` selects which triangle holds
  /// the factor; the other triangle is ignored.
  Chol { factor: Array2<f64>, lower: bool },
}

impl CovarianceSpec {
  /// Builds the covariance input from mutually exclusive optional inputs.
  pub fn from_options(
    cov: Option<Array2<f64>>,
    tau: Option<Array2<f64>>,
    chol: Option<Array2<f64>>,
    lower: bool,
  ) -> Result<Self> {
    match (cov, tau, chol) {
      (Some(cov), None, None) => Ok(CovarianceSpec::Cov(cov)),
      (None, Some(tau), None) => Ok(CovarianceSpec::Tau(tau)),
      (None, None, Some(factor)) => Ok(CovarianceSpec::Chol { factor, lower }),
      (None, None, None) => bail!(TimeseriesError::InvalidParameterization {
        reason: "one of cov, tau or chol is required",
      }),
      _ => bail!(TimeseriesError::InvalidParameterization {
        reason: "only one of cov, tau or chol may be given",
      }),
    }
  }

  pub fn is_precision(&self) -> bool {
    matches!(self, CovarianceSpec::Tau(_))
  }
}

fn to_square(a: &Array2<f64>) -> Result<DMatrix<f64>> {
  let (rows, cols) = a.dim();
  ensure!(
    rows == cols,
    TimeseriesError::ShapeMismatch {
      expected: rows,
      actual: cols,
    }
  );
  Ok(DMatrix::from_fn(rows, cols, |i, j| a[[i, j]]))
}

/// Lower Cholesky factor `L` of a covariance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactor {
  l: DMatrix<f64>,
  half_log_det: f64,
}

impl CholeskyFactor {
  pub fn from_spec(spec: &CovarianceSpec) -> Result<Self> {
    let l = match spec {
      CovarianceSpec::Cov(cov) => to_square(cov)?
        .cholesky()
        .ok_or(TimeseriesError::NotPositiveDefinite)?
        .l(),
      CovarianceSpec::Tau(tau) => to_square(tau)?
        .try_inverse()
        .ok_or(TimeseriesError::NotPositiveDefinite)?
        .cholesky()
        .ok_or(TimeseriesError::NotPositiveDefinite)?
        .l(),
      CovarianceSpec::Chol { factor, lower } => {
        let m = to_square(factor)?;
        if *lower {
          m.lower_triangle()
        } else {
          m.upper_triangle().transpose()
        }
      }
    };

    let diag = l.diagonal();
    ensure!(
      diag.iter().all(|d| d.is_finite() && *d != 0.0),
      TimeseriesError::NotPositiveDefinite
    );
    let half_log_det = diag.iter().map(|d| d.abs().ln()).sum();

    Ok(Self { l, half_log_det })
  }

  pub fn dim(&self) -> usize {
    self.l.nrows()
  }

  /// `0.5 * log det(Sigma)`.
  pub fn half_log_det(&self) -> f64 {
    self.half_log_det
  }

  /// Squared Mahalanobis norm `diff^T Sigma^{-1} diff`.
  pub fn mahalanobis(&self, diff: ArrayView1<f64>) -> Result<f64> {
    ensure!(
      diff.len() == self.dim(),
      TimeseriesError::ShapeMismatch {
        expected: self.dim(),
        actual: diff.len(),
      }
    );
    let b = DVector::from_iterator(diff.len(), diff.iter().copied());
    let z = self
      .l
      .solve_lower_triangular(&b)
      .ok_or(TimeseriesError::NotPositiveDefinite)?;
    Ok(z.norm_squared())
  }

  /// Maps standard normal draws `z` to `L z`.
  pub fn color(&self, z: &[f64]) -> Array1<f64> {
    let v = &self.l * DVector::from_column_slice(z);
    Array1::from_iter(v.iter().copied())
  }

  /// Reconstructed covariance `L L^T`.
  pub fn covariance(&self) -> Array2<f64> {
    let cov = &self.l * self.l.transpose();
    Array2::from_shape_fn((self.dim(), self.dim()), |(i, j)| cov[(i, j)])
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  fn cov() -> Array2<f64> {
    array![[2.0, 0.3], [0.3, 1.0]]
  }

  fn assert_matrix_close(a: &Array2<f64>, b: &Array2<f64>, eps: f64) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
      assert_abs_diff_eq!(*x, *y, epsilon = eps);
    }
  }

  #[test]
  fn all_parameterizations_agree() {
    let from_cov = CholeskyFactor::from_spec(&CovarianceSpec::Cov(cov())).unwrap();
    assert_matrix_close(&from_cov.covariance(), &cov(), 1e-12);

    let inv = {
      let det = 2.0 * 1.0 - 0.3 * 0.3;
      array![[1.0 / det, -0.3 / det], [-0.3 / det, 2.0 / det]]
    };
    let from_tau = CholeskyFactor::from_spec(&CovarianceSpec::Tau(inv)).unwrap();
    assert_matrix_close(&from_tau.covariance(), &cov(), 1e-10);

    let a = 2.0_f64.sqrt();
    let b = 0.3 / a;
    let c = (1.0 - b * b).sqrt();
    let lower = CholeskyFactor::from_spec(&CovarianceSpec::Chol {
      factor: array![[a, 0.0], [b, c]],
      lower: true,
    })
    .unwrap();
    let upper = CholeskyFactor::from_spec(&CovarianceSpec::Chol {
      factor: array![[a, b], [0.0, c]],
      lower: false,
    })
    .unwrap();
    assert_matrix_close(&lower.covariance(), &cov(), 1e-12);
    assert_matrix_close(&upper.covariance(), &cov(), 1e-12);
    assert_abs_diff_eq!(
      lower.half_log_det(),
      0.5 * (2.0 - 0.09_f64).ln(),
      epsilon = 1e-12
    );
  }

  #[test]
  fn exactly_one_parameterization_is_required() {
    assert!(CovarianceSpec::from_options(None, None, None, true).is_err());
    assert!(CovarianceSpec::from_options(Some(cov()), Some(cov()), None, true).is_err());
    assert!(CovarianceSpec::from_options(Some(cov()), None, Some(cov()), true).is_err());
    assert!(CovarianceSpec::from_options(None, Some(cov()), None, true)
      .unwrap()
      .is_precision());
  }

  #[test]
  fn indefinite_covariance_is_rejected() {
    let err =
      CholeskyFactor::from_spec(&CovarianceSpec::Cov(array![[1.0, 2.0], [2.0, 1.0]])).unwrap_err();
    assert_eq!(
      err.downcast_ref::<TimeseriesError>(),
      Some(&TimeseriesError::NotPositiveDefinite)
    );
  }

  #[test]
  fn non_square_matrix_is_rejected() {
    let err = CholeskyFactor::from_spec(&CovarianceSpec::Cov(Array2::zeros((2, 3)))).unwrap_err();
    assert!(matches!(
      err.downcast_ref::<TimeseriesError>(),
      Some(TimeseriesError::ShapeMismatch { .. })
    ));
  }

  #[test]
  fn mahalanobis_of_identity_is_squared_norm() {
    let f = CholeskyFactor::from_spec(&CovarianceSpec::Cov(Array2::eye(3))).unwrap();
    let d = array![1.0, -2.0, 0.5];
    assert_abs_diff_eq!(f.mahalanobis(d.view()).unwrap(), 5.25, epsilon = 1e-12);
  }
}
