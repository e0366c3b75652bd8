//! Parallel fitting and forecasting of independent series.
//!
//! Each series is fitted on its own; results come back in input order and a
//! failure in one series does not affect the others.

use crate::core::{ForecastPoint, ObservedPoint};
use crate::error::Result;
use crate::models::{fit, forecast_weeks, FittedModel, ForecastConfig};
use rayon::prelude::*;

/// Fit one model per history in parallel.
pub fn fit_batch(
    histories: &[Vec<ObservedPoint>],
    config: &ForecastConfig,
) -> Vec<Result<FittedModel>> {
    histories
        .par_iter()
        .map(|history| fit(history, config))
        .collect()
}

/// Fit and forecast `periods` weekly steps for every history in parallel.
pub fn forecast_batch(
    histories: &[Vec<ObservedPoint>],
    config: &ForecastConfig,
    periods: usize,
) -> Vec<Result<Vec<ForecastPoint>>> {
    histories
        .par_iter()
        .map(|history| forecast_weeks(history, config, periods))
        .collect()
}
