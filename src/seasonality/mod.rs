//! Additive seasonal decomposition.
//!
//! A fixed-period profile of mean detrended residuals, one slot per position
//! in the cycle (52 slots for a yearly cycle of weekly data).
//!
//! # Example
//!
//! ```
//! use ridership_forecast::seasonality::decompose;
//! use ridership_forecast::trend::fit_indexed;
//!
//! let values: Vec<f64> = (0..8).map(|i| 10.0 * i as f64 + [3.0, -3.0][i % 2]).collect();
//! let trend = fit_indexed(&values).unwrap();
//! let profile = decompose(&values, &trend, 2).unwrap();
//! assert_eq!(profile.season_length(), 2);
//! ```

pub mod profile;

pub use profile::{decompose, SeasonalProfile};
