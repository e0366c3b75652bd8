//! Pre-screening statistics for the forecasting workflow.
//!
//! Provides the significance check used to decide whether one period's series
//! helps predict another, and information criteria for lag-order selection.
//!
//! # Example
//!
//! ```
//! use ridership_forecast::validation::{compute_information_criteria, test_significance};
//!
//! let a: Vec<f64> = (0..30).map(|i| (i as f64 * 0.7).sin()).collect();
//! let b: Vec<f64> = a.iter().map(|x| 2.0 * x + 1.0).collect();
//! let result = test_significance(&a, &b, 3).unwrap();
//! assert_eq!(result.is_significant, result.p_value < 0.05);
//!
//! let criteria = compute_information_criteria(&[1.0, -1.0, 1.0, -1.0], 1).unwrap();
//! assert!(criteria.aic.is_finite());
//! ```

pub mod criteria;
pub mod significance;

pub use criteria::{
    compute_information_criteria, select_lag_order, CriteriaResult, LagScore, LagSelection,
};
pub use significance::{
    granger_f_test, test_significance, SignificanceResult, SIGNIFICANCE_LEVEL,
};
