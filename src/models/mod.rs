//! Forecasting models.
//!
//! Fitting produces an immutable [`FittedModel`] that can be shared and
//! queried for any number of horizons without refitting.

pub mod prophet;

pub use prophet::{fit, forecast_weeks, FittedModel, ForecastConfig};
