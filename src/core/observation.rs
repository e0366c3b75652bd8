//! Observed history points and horizon generation.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// A single historical observation, e.g. weekly ridership.
///
/// Values are finite and non-negative; construction rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservedPoint {
    timestamp: DateTime<Utc>,
    value: f64,
}

impl ObservedPoint {
    /// Create an observation.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "observed value must be finite and non-negative, got {}",
                value
            )));
        }
        Ok(Self { timestamp, value })
    }

    /// Build a chronological history from parallel timestamp and value vectors.
    pub fn series(timestamps: &[DateTime<Utc>], values: &[f64]) -> Result<Vec<Self>> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        let points = timestamps
            .iter()
            .zip(values)
            .map(|(&ts, &v)| Self::new(ts, v))
            .collect::<Result<Vec<_>>>()?;
        validate_history(&points)?;
        Ok(points)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Check that timestamps are strictly increasing.
pub fn validate_history(points: &[ObservedPoint]) -> Result<()> {
    for pair in points.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(ForecastError::TimestampError(
                "timestamps must be strictly increasing".to_string(),
            ));
        }
    }
    Ok(())
}

/// Extract the value column of a history.
pub fn values_of(points: &[ObservedPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value).collect()
}

/// Generate `periods` timestamps after `last`, spaced by a positive `step`.
///
/// The first generated timestamp is `last + step`. Fails with
/// [`ForecastError::TimestampError`] when the horizon runs past the
/// representable date range.
pub fn future_timestamps(
    last: DateTime<Utc>,
    periods: usize,
    step: Duration,
) -> Result<Vec<DateTime<Utc>>> {
    if step <= Duration::zero() {
        return Err(ForecastError::InvalidParameter(
            "horizon step must be positive".to_string(),
        ));
    }
    if periods == 0 {
        return Ok(Vec::new());
    }

    let overflow = || {
        ForecastError::TimestampError(format!(
            "horizon of {} steps overflows the date range",
            periods
        ))
    };
    // Reject out-of-range horizons before allocating
    let span = i64::try_from(periods)
        .ok()
        .and_then(|p| step.num_milliseconds().checked_mul(p))
        .and_then(Duration::try_milliseconds)
        .ok_or_else(overflow)?;
    last.checked_add_signed(span).ok_or_else(overflow)?;

    let mut timestamps = Vec::with_capacity(periods);
    let mut current = last;
    for _ in 0..periods {
        current = current.checked_add_signed(step).ok_or_else(overflow)?;
        timestamps.push(current);
    }
    Ok(timestamps)
}

/// Weekly horizon following the last observation of `history`.
///
/// Returns an empty vector for an empty history.
pub fn weekly_horizon(history: &[ObservedPoint], periods: usize) -> Result<Vec<DateTime<Utc>>> {
    match history.last() {
        Some(last) => future_timestamps(last.timestamp, periods, Duration::days(7)),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        assert!(ObservedPoint::new(day(1), -1.0).is_err());
        assert!(ObservedPoint::new(day(1), f64::NAN).is_err());
        assert!(ObservedPoint::new(day(1), f64::INFINITY).is_err());
        assert!(ObservedPoint::new(day(1), 0.0).is_ok());
    }

    #[test]
    fn series_requires_increasing_timestamps() {
        let err = ObservedPoint::series(&[day(2), day(1)], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ForecastError::TimestampError(_)));

        let err = ObservedPoint::series(&[day(1), day(1)], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ForecastError::TimestampError(_)));

        let err = ObservedPoint::series(&[day(1)], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, ForecastError::DimensionMismatch { expected: 1, got: 2 });

        let points = ObservedPoint::series(&[day(1), day(8)], &[3.0, 4.0]).unwrap();
        assert_eq!(values_of(&points), vec![3.0, 4.0]);
    }

    #[test]
    fn weekly_horizon_steps_seven_days() {
        let history = ObservedPoint::series(&[day(1), day(8)], &[1.0, 2.0]).unwrap();
        let horizon = weekly_horizon(&history, 3).unwrap();
        assert_eq!(horizon, vec![day(15), day(22), day(29)]);
        assert!(weekly_horizon(&[], 3).unwrap().is_empty());
        assert!(weekly_horizon(&history, 0).unwrap().is_empty());
    }

    #[test]
    fn horizon_longer_than_u32_is_not_truncated() {
        let periods = (1usize << 32) + 3;
        let err = future_timestamps(day(1), periods, Duration::weeks(1)).unwrap_err();
        assert!(matches!(err, ForecastError::TimestampError(_)));
    }

    #[test]
    fn horizon_past_date_range_is_an_error() {
        let near_end = DateTime::<Utc>::MAX_UTC - Duration::days(10);
        let err = future_timestamps(near_end, 3, Duration::weeks(1)).unwrap_err();
        assert!(matches!(err, ForecastError::TimestampError(_)));
        assert_eq!(
            future_timestamps(near_end, 1, Duration::days(7)).unwrap(),
            vec![near_end + Duration::days(7)]
        );
    }

    #[test]
    fn horizon_step_must_be_positive() {
        for step in [Duration::zero(), Duration::days(-7)] {
            let err = future_timestamps(day(1), 2, step).unwrap_err();
            assert!(matches!(err, ForecastError::InvalidParameter(_)));
        }
    }
}
