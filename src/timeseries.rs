//! # Time-Series Distributions
//!
//! `timeseries` provides log-densities and samplers for sequences whose
//! elements depend on their predecessors.
//!
//! ## Modules
//!
//! | Module                     | Description                                                             |
//! |----------------------------|-------------------------------------------------------------------------|
//! | [`ar1`]                    | AR(1) with a stationary initial value.                                  |
//! | [`ar`]                     | AR(p) with optional intercept and a pluggable initial-value density.   |
//! | [`gaussian_random_walk`]   | Scalar random walk with Normal innovations, per-step log-density.       |
//! | [`garch11`]                | GARCH(1,1) with an exogenous starting volatility.                       |
//! | [`euler_maruyama`]         | Gaussian transition density of a discretised scalar SDE.                |
//! | [`mv_random_walk`]         | Vector random walks with multivariate Normal or Student-t innovations.  |
//!
//! ## Parallelism
//!
//! Walks implementing [`SamplingExt`](crate::traits::SamplingExt) get
//! `sample_par(m, seed)`, which draws `m` paths with `rayon`, one seeded
//! generator per path.

pub mod ar;
pub mod ar1;
pub mod euler_maruyama;
pub mod garch11;
pub mod gaussian_random_walk;
pub mod mv_random_walk;

pub use ar::Ar;
pub use ar1::Ar1;
pub use euler_maruyama::EulerMaruyama;
pub use garch11::Garch11;
pub use gaussian_random_walk::gaussian_random_walk;
pub use gaussian_random_walk::GaussianRandomWalk;
pub use mv_random_walk::MvGaussianRandomWalk;
pub use mv_random_walk::MvRandomWalk;
pub use mv_random_walk::MvStudentTRandomWalk;
pub use mv_random_walk::WalkShape;
