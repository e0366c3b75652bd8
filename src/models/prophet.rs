//! Additive trend + seasonality forecaster with slope changepoints.
//!
//! A simplified Prophet-style model:
//!
//! ```text
//! trend(t)    = slope * t + intercept + Σ_{cp.index < t} cp.slope_delta * (t - cp.index)
//! estimate(t) = max(floor, trend(t) + seasonal[t mod L])
//! band(t)     = estimate(t) * uncertainty_fraction + uncertainty_base
//! ```
//!
//! Every detected changepoint keeps bending all later trend values; nothing
//! decays or merges. Predictions are deterministic.

use crate::changepoint::{detect_changepoints, Changepoint, SlopeChangeConfig};
use crate::core::{future_timestamps, validate_history, values_of, ForecastPoint, ObservedPoint};
use crate::error::{ForecastError, Result};
use crate::seasonality::{decompose, SeasonalProfile};
use crate::trend::{fit_indexed, TrendModel};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

/// Parameters of the forecaster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// Number of seasonal slots (52 for weekly data with a yearly cycle)
    pub season_length: usize,
    /// Window size of the changepoint slope comparison
    pub changepoint_window: usize,
    /// Minimum absolute slope delta for a changepoint
    pub changepoint_threshold: f64,
    /// Minimum point estimate
    pub floor: f64,
    /// Minimum lower bound; must not exceed `floor`
    pub lower_floor: f64,
    /// Band width proportional to the estimate
    pub uncertainty_fraction: f64,
    /// Constant band width
    pub uncertainty_base: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        let changepoints = SlopeChangeConfig::default();
        Self {
            season_length: 52,
            changepoint_window: changepoints.window_size,
            changepoint_threshold: changepoints.threshold,
            floor: 1000.0,
            lower_floor: 1000.0,
            uncertainty_fraction: 0.15,
            uncertainty_base: 2000.0,
        }
    }
}

impl ForecastConfig {
    /// Set the seasonal period.
    pub fn season_length(mut self, season_length: usize) -> Self {
        self.season_length = season_length;
        self
    }

    /// Set the changepoint window size.
    pub fn changepoint_window(mut self, window: usize) -> Self {
        self.changepoint_window = window;
        self
    }

    /// Set the changepoint slope-delta threshold.
    pub fn changepoint_threshold(mut self, threshold: f64) -> Self {
        self.changepoint_threshold = threshold;
        self
    }

    /// Set the point-estimate floor and the lower-bound floor.
    pub fn floors(mut self, floor: f64, lower_floor: f64) -> Self {
        self.floor = floor;
        self.lower_floor = lower_floor;
        self
    }

    /// Set the uncertainty band as `fraction * estimate + base`.
    pub fn uncertainty(mut self, fraction: f64, base: f64) -> Self {
        self.uncertainty_fraction = fraction;
        self.uncertainty_base = base;
        self
    }

    /// Changepoint detector settings derived from this config.
    pub fn changepoint_config(&self) -> SlopeChangeConfig {
        SlopeChangeConfig::default()
            .window_size(self.changepoint_window)
            .threshold(self.changepoint_threshold)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.season_length == 0 {
            return Err(ForecastError::InvalidParameter(
                "season length must be positive".to_string(),
            ));
        }
        self.changepoint_config().validate()?;
        if !self.floor.is_finite() || self.floor < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "floor must be finite and non-negative, got {}",
                self.floor
            )));
        }
        if !self.lower_floor.is_finite() || self.lower_floor > self.floor {
            return Err(ForecastError::InvalidParameter(format!(
                "lower floor {} must be finite and not above floor {}",
                self.lower_floor, self.floor
            )));
        }
        for (name, v) in [
            ("uncertainty fraction", self.uncertainty_fraction),
            ("uncertainty base", self.uncertainty_base),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be finite and non-negative, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }
}

/// Result of fitting: trend, seasonal profile and changepoints of one history.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    trend: TrendModel,
    seasonal: SeasonalProfile,
    changepoints: Vec<Changepoint>,
    n_obs: usize,
    last_timestamp: DateTime<Utc>,
    residuals: Vec<f64>,
    config: ForecastConfig,
}

/// Fit the model to a chronological history.
///
/// Needs at least two points. Position in the history is the time index.
pub fn fit(history: &[ObservedPoint], config: &ForecastConfig) -> Result<FittedModel> {
    config.validate()?;
    let last = match history {
        [_, .., last] => *last,
        _ => {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: history.len(),
            })
        }
    };
    validate_history(history)?;

    let values = values_of(history);
    let trend = fit_indexed(&values)?;
    let seasonal = decompose(&values, &trend, config.season_length)?;
    let changepoints = detect_changepoints(history, &config.changepoint_config())?;

    let residuals = values
        .iter()
        .enumerate()
        .map(|(i, v)| v - trend.value_at(i as f64) - seasonal.value_at(i))
        .collect();

    debug!(
        n_obs = values.len(),
        slope = trend.slope,
        intercept = trend.intercept,
        changepoints = changepoints.len(),
        "fitted additive forecaster"
    );

    Ok(FittedModel {
        trend,
        seasonal,
        changepoints,
        n_obs: values.len(),
        last_timestamp: last.timestamp(),
        residuals,
        config: *config,
    })
}

impl FittedModel {
    pub fn trend(&self) -> &TrendModel {
        &self.trend
    }

    pub fn seasonal(&self) -> &SeasonalProfile {
        &self.seasonal
    }

    pub fn changepoints(&self) -> &[Changepoint] {
        &self.changepoints
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Length of the history the model was fitted on.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    /// In-sample residuals `value - trend(i) - seasonal(i)`.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Parameter count for information criteria: slope, intercept, one per
    /// seasonal slot and one per changepoint.
    pub fn num_parameters(&self) -> usize {
        2 + self.seasonal.season_length() + self.changepoints.len()
    }

    /// Trend at absolute index `index`, including changepoint adjustments.
    pub fn trend_at(&self, index: usize) -> f64 {
        let base = self.trend.value_at(index as f64);
        self.changepoints
            .iter()
            .filter(|cp| cp.index < index)
            .fold(base, |acc, cp| acc + cp.slope_delta * (index - cp.index) as f64)
    }

    /// Forecast one point per future timestamp, in input order.
    ///
    /// The `i`-th timestamp is placed at index `n_obs + i`; the timestamps
    /// themselves only label the output.
    pub fn predict(&self, future: &[DateTime<Utc>]) -> Vec<ForecastPoint> {
        trace!(horizon = future.len(), "predicting");
        future
            .iter()
            .enumerate()
            .map(|(offset, &timestamp)| self.point_at(self.n_obs + offset, timestamp))
            .collect()
    }

    /// Forecast `periods` weekly steps after the last observation.
    pub fn predict_weeks(&self, periods: usize) -> Result<Vec<ForecastPoint>> {
        let future = future_timestamps(self.last_timestamp, periods, Duration::weeks(1))?;
        Ok(self.predict(&future))
    }

    fn point_at(&self, index: usize, timestamp: DateTime<Utc>) -> ForecastPoint {
        let cfg = &self.config;
        let trend_component = self.trend_at(index);
        let seasonal_component = self.seasonal.value_at(index);

        let point_estimate = (trend_component + seasonal_component).max(cfg.floor);
        let uncertainty = point_estimate * cfg.uncertainty_fraction + cfg.uncertainty_base;

        ForecastPoint {
            timestamp,
            point_estimate,
            lower_bound: (point_estimate - uncertainty).max(cfg.lower_floor),
            upper_bound: point_estimate + uncertainty,
            trend_component,
            seasonal_component,
        }
    }
}

/// Fit on `history` and forecast `periods` weekly steps after it.
pub fn forecast_weeks(
    history: &[ObservedPoint],
    config: &ForecastConfig,
    periods: usize,
) -> Result<Vec<ForecastPoint>> {
    fit(history, config)?.predict_weeks(periods)
}
