//! # Errors
//!
//! $$
//! \text{logp}:\ (\theta, x_{0:T-1}) \mapsto \mathbb{R} \cup \{\text{TimeseriesError}\}
//! $$
//!
//! Failures are carried through `anyhow::Result`; the payload is always a
//! [`TimeseriesError`] so callers can `downcast_ref` and match on it.
use std::error::Error;
use std::fmt;

/// Error taxonomy shared by every distribution in the crate.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeseriesError {
  /// Mutually exclusive parameters were supplied together, or none was supplied.
  InvalidParameterization { reason: &'static str },

  /// The parameterization is valid in general but not for this distribution.
  UnsupportedParameterization { reason: &'static str },

  /// A walk or simulation was requested with zero steps.
  InvalidSteps { steps: usize },

  /// The observed sequence has no elements.
  EmptySequence,

  /// The observed sequence is shorter than the recurrence needs.
  SequenceTooShort { required: usize, actual: usize },

  /// The lag order derived from the coefficients is zero.
  InvalidLagOrder { len: usize, constant: bool },

  /// A scale or precision reaching a base density is non-positive or not finite.
  InvalidScale { value: f64 },

  /// A scalar parameter is outside its domain.
  InvalidParameter { name: &'static str, value: f64 },

  /// Lengths or dimensions do not line up.
  ShapeMismatch { expected: usize, actual: usize },

  /// Cholesky factorisation or triangular solve failed.
  NotPositiveDefinite,
}

impl fmt::Display for TimeseriesError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TimeseriesError::InvalidParameterization { reason } => {
        write!(f, "invalid parameterization: {reason}")
      }
      TimeseriesError::UnsupportedParameterization { reason } => {
        write!(f, "unsupported parameterization: {reason}")
      }
      TimeseriesError::InvalidSteps { steps } => {
        write!(f, "steps must be greater than 0, got {steps}")
      }
      TimeseriesError::EmptySequence => write!(f, "sequence is empty"),
      TimeseriesError::SequenceTooShort { required, actual } => write!(
        f,
        "sequence too short: need at least {required} values, got {actual}"
      ),
      TimeseriesError::InvalidLagOrder { len, constant } => write!(
        f,
        "lag order must be at least 1 (rho has {len} entries, constant = {constant})"
      ),
      TimeseriesError::InvalidScale { value } => {
        write!(f, "scale/precision must be positive and finite, got {value}")
      }
      TimeseriesError::InvalidParameter { name, value } => {
        write!(f, "invalid value for `{name}`: {value}")
      }
      TimeseriesError::ShapeMismatch { expected, actual } => {
        write!(f, "shape mismatch: expected {expected}, got {actual}")
      }
      TimeseriesError::NotPositiveDefinite => {
        write!(f, "matrix is not positive definite")
      }
    }
  }
}

impl Error for TimeseriesError {}
