//! # Innovation scale
//!
//! $$
//! \tau = \frac{1}{\sigma^2}
//! $$
//!
use anyhow::bail;
use anyhow::Result;

use crate::error::TimeseriesError;

/// Scale of a Normal innovation, given either as standard deviation or as
/// precision. Exactly one of the two is ever stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InnovationScale {
  Sigma(f64),
  Tau(f64),
}

impl InnovationScale {
  /// Builds the scale from mutually exclusive optional inputs.
  pub fn from_options(sigma: Option<f64>, tau: Option<f64>) -> Result<Self> {
    match (sigma, tau) {
      (Some(sigma), None) => Ok(InnovationScale::Sigma(sigma)),
      (None, Some(tau)) => Ok(InnovationScale::Tau(tau)),
      (Some(_), Some(_)) => bail!(TimeseriesError::InvalidParameterization {
        reason: "can't pass both tau and sigma",
      }),
      (None, None) => bail!(TimeseriesError::InvalidParameterization {
        reason: "one of tau or sigma must be given",
      }),
    }
  }

  pub fn sigma(&self) -> f64 {
    match *self {
      InnovationScale::Sigma(sigma) => sigma,
      InnovationScale::Tau(tau) => tau.powf(-0.5),
    }
  }

  pub fn tau(&self) -> f64 {
    match *self {
      InnovationScale::Sigma(sigma) => sigma.powi(-2),
      InnovationScale::Tau(tau) => tau,
    }
  }
}

/// Returns `(tau, sigma)` from exactly one of the two.
///
/// Signs are not checked here; a non-positive value is rejected later by the
/// density that consumes it.
pub fn get_tau_sigma(tau: Option<f64>, sigma: Option<f64>) -> Result<(f64, f64)> {
  let scale = InnovationScale::from_options(sigma, tau)?;
  Ok((scale.tau(), scale.sigma()))
}
