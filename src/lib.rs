//! # ridership-forecast
//!
//! Additive trend + seasonality forecasting with slope changepoints, plus the
//! pre-screening statistics (a Granger-style significance check and
//! information criteria) used to decide which history to forecast from.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use ridership_forecast::prelude::*;
//!
//! let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
//! let history: Vec<ObservedPoint> = (0..104)
//!     .map(|week| {
//!         let season = if week % 52 < 26 { 1500.0 } else { -1500.0 };
//!         let value = 26000.0 + 40.0 * week as f64 + season;
//!         ObservedPoint::new(start + Duration::weeks(week), value).unwrap()
//!     })
//!     .collect();
//!
//! let model = fit_forecast_model(&history).unwrap();
//! let forecast = predict(&model, &weekly_horizon(&history, 12).unwrap());
//! assert_eq!(forecast.len(), 12);
//! assert!(forecast
//!     .iter()
//!     .all(|p| p.lower_bound <= p.point_estimate && p.point_estimate <= p.upper_bound));
//! ```

#![allow(clippy::needless_range_loop)]

pub mod batch;
pub mod changepoint;
pub mod core;
pub mod error;
pub mod models;
pub mod seasonality;
pub mod trend;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

use chrono::{DateTime, Utc};

/// Fit the forecaster with [`models::ForecastConfig::default`].
///
/// Fails with [`ForecastError::InsufficientData`] for fewer than two points.
pub fn fit_forecast_model(history: &[core::ObservedPoint]) -> Result<models::FittedModel> {
    models::fit(history, &models::ForecastConfig::default())
}

/// Forecast one point per future timestamp.
pub fn predict(model: &models::FittedModel, future: &[DateTime<Utc>]) -> Vec<core::ForecastPoint> {
    model.predict(future)
}

pub use validation::{compute_information_criteria, test_significance};

pub mod prelude {
    pub use crate::core::{weekly_horizon, ForecastPoint, ForecastRow, ObservedPoint};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{fit, FittedModel, ForecastConfig};
    pub use crate::validation::{
        compute_information_criteria, select_lag_order, test_significance, CriteriaResult,
        SignificanceResult,
    };
    pub use crate::{fit_forecast_model, predict};
}
