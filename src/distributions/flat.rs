use anyhow::Result;
use ndarray::ArrayView1;

use crate::traits::MultivariateDensity;
use crate::traits::UnivariateDensity;

/// Improper uniform distribution over the real line (or `R^d`). Its
/// log-density is the constant 0, so it contributes nothing to a total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flat;

impl UnivariateDensity for Flat {
  fn ln_pdf(&self, _x: f64) -> f64 {
    0.0
  }
}

impl MultivariateDensity for Flat {
  fn ln_pdf(&self, _x: ArrayView1<f64>) -> Result<f64> {
    Ok(0.0)
  }
}
