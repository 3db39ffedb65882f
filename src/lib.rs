//! # stochastic-ts
//!
//! $$
//! \log p(x_{0:T-1} \mid \theta) = \log p(x_{0:p-1}) + \sum_{t \ge p} \log p(x_t \mid x_{t-p:t-1}, \theta)
//! $$
//!
//! Time-series probability distributions: each one scores an observed
//! sequence and, where the process is generative, samples new ones.
//!
//! ## Modules
//!
//! | Module              | Description                                                                  |
//! |---------------------|------------------------------------------------------------------------------|
//! | [`distributions`]   | Base densities: Normal, Flat, multivariate Normal and Student-t.             |
//! | [`timeseries`]      | AR(1), AR(p), random walks, GARCH(1,1) and Euler–Maruyama.                   |
//! | [`traits`]          | Density, log-density and sampling contracts.                                 |
//! | [`scan`]            | Sequential fold used by recurrences.                                         |
//! | [`error`]           | Error taxonomy carried inside `anyhow::Error`.                               |
//!
//! ## Logging
//!
//! Construction and sampling emit `tracing` events. Non-stationary
//! parameters are reported with `warn!`. No subscriber is installed.

pub mod distributions;
pub mod error;
pub mod scan;
pub mod timeseries;
pub mod traits;

pub use error::TimeseriesError;
pub use traits::LogpExt;
pub use traits::SamplingExt;

/// Default simulation length.
pub const N: usize = 1000;
