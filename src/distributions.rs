//! # Distributions
//!
//! $$
//! \varepsilon_t \sim \mathcal{N}(0, \tau^{-1}),\quad \varepsilon_t \sim \mathcal{N}_d(\mu, \Sigma),\quad \varepsilon_t \sim t_\nu(\mu, \Sigma)
//! $$
//!
//! Base densities the time-series distributions are built from.
//!
//! | Module | Description |
//! |---------------|------------------------------------------------------------|
//! | [`scale`] | Precision / standard deviation parameterization. |
//! | [`normal`] | Univariate Normal, fixed or per-element parameters. |
//! | [`flat`] | Improper uniform, the default initial-condition density. |
//! | [`elementwise`] | Scalar density applied to every component of a vector. |
//! | [`covariance`] | Covariance, precision or Cholesky input, canonicalised to `L`. |
//! | [`mv_normal`] | Multivariate Normal innovations. |
//! | [`mv_studentt`] | Multivariate Student-t innovations. |
pub mod covariance;
pub mod elementwise;
pub mod flat;
pub mod mv_normal;
pub mod mv_studentt;
pub mod normal;
pub mod scale;

pub use covariance::CovarianceSpec;
pub use elementwise::Elementwise;
pub use flat::Flat;
pub use mv_normal::MvNormal;
pub use mv_studentt::MvStudentT;
pub use normal::Normal;
pub use scale::InnovationScale;
