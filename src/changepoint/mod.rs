//! Changepoint detection.
//!
//! Flags indices where the local trend slope shifts, by comparing least-squares
//! slopes fitted to the windows immediately before and after each candidate.
//!
//! Adjacent indices may all qualify around a single break; no merging is done.
//!
//! # Example
//!
//! ```
//! use ridership_forecast::changepoint::{slope_deltas, SlopeChangeConfig};
//!
//! // Flat, then rising by 10 per step
//! let mut series = vec![100.0; 20];
//! series.extend((1..=20).map(|i| 100.0 + 10.0 * i as f64));
//!
//! let config = SlopeChangeConfig::default().window_size(5).threshold(5.0);
//! let flagged: Vec<usize> = slope_deltas(&series, config.window_size)
//!     .into_iter()
//!     .filter(|&(_, delta)| delta > config.threshold)
//!     .map(|(i, _)| i)
//!     .collect();
//! assert!(flagged.contains(&20));
//! ```

pub mod slope;

pub use slope::{detect_changepoints, slope_deltas, Changepoint, SlopeChangeConfig};
