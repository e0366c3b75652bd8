//! Core data structures shared by the trend, seasonal and forecast stages.

mod forecast;
mod observation;

pub use forecast::{write_csv, ForecastPoint, ForecastRow, CSV_HEADER};
pub use observation::{
    future_timestamps, validate_history, values_of, weekly_horizon, ObservedPoint,
};
