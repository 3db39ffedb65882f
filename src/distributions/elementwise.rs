//! # Elementwise
//!
//! $$
//! \log p(x_1, \ldots, x_d) = \sum_{i=1}^{d} \log p(x_i)
//! $$
//!
use anyhow::Result;
use ndarray::ArrayView1;

use crate::traits::MultivariateDensity;
use crate::traits::UnivariateDensity;

/// Scores every component of a vector with the same scalar density, e.g. a
/// `Normal` initial condition for a multivariate walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elementwise<D>(pub D);

impl<D: UnivariateDensity> MultivariateDensity for Elementwise<D> {
  fn ln_pdf(&self, x: ArrayView1<f64>) -> Result<f64> {
    Ok(self.0.log_density_sum(x))
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;
  use crate::distributions::normal::Normal;

  #[test]
  fn sums_component_densities() {
    let normal = Normal::new(1.0, 2.0).unwrap();
    let x = array![0.5, -1.0, 3.0];
    let expected = normal.ln_pdf(0.5) + normal.ln_pdf(-1.0) + normal.ln_pdf(3.0);
    assert_relative_eq!(
      Elementwise(normal).ln_pdf(x.view()).unwrap(),
      expected,
      epsilon = 1e-12
    );
  }

  #[test]
  fn rows_are_summed_too() {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let rows = array![[0.1, 0.2], [0.3, 0.4]];
    let expected: f64 = rows.iter().map(|&v| normal.ln_pdf(v)).sum();
    assert_relative_eq!(
      Elementwise(normal).log_density_sum(rows.view()).unwrap(),
      expected,
      epsilon = 1e-12
    );
  }
}
