//! Numeric helpers shared by the fitting and testing modules.

pub mod ols;
pub mod stats;

pub use ols::{lag_matrix, ols_fit, ols_residuals, OLSResult};
pub use stats::{mean, pearson};
