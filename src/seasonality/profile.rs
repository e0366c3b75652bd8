//! Seasonal profile from detrended residuals.

use crate::error::{ForecastError, Result};
use crate::trend::TrendModel;
use serde::{Deserialize, Serialize};

/// Mean residual per seasonal slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    slots: Vec<f64>,
}

impl SeasonalProfile {
    /// Number of slots in the cycle.
    pub fn season_length(&self) -> usize {
        self.slots.len()
    }

    /// Seasonal offset for an absolute index (`index mod season_length`).
    pub fn value_at(&self, index: usize) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.slots[index % self.slots.len()]
    }

    pub fn slots(&self) -> &[f64] {
        &self.slots
    }

    /// Peak-to-trough spread of the profile.
    pub fn amplitude(&self) -> f64 {
        let max = self.slots.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = self.slots.iter().cloned().fold(f64::INFINITY, f64::min);
        max - min
    }
}

/// Build a seasonal profile of length `season_length`.
///
/// Each point's residual `value - trend(i)` is averaged into slot
/// `i mod season_length`; slots without observations are 0.
pub fn decompose(
    values: &[f64],
    trend: &TrendModel,
    season_length: usize,
) -> Result<SeasonalProfile> {
    if season_length == 0 {
        return Err(ForecastError::InvalidParameter(
            "season length must be positive".to_string(),
        ));
    }

    let mut sums = vec![0.0; season_length];
    let mut counts = vec![0usize; season_length];
    for (i, residual) in trend.detrend(values).into_iter().enumerate() {
        let slot = i % season_length;
        sums[slot] += residual;
        counts[slot] += 1;
    }

    let slots = sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| if count == 0 { 0.0 } else { sum / count as f64 })
        .collect();

    Ok(SeasonalProfile { slots })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::fit_indexed;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_series_has_flat_profile() {
        let values = [100.0, 200.0, 300.0, 400.0];
        let trend = fit_indexed(&values).unwrap();
        let profile = decompose(&values, &trend, 2).unwrap();
        assert_eq!(profile.season_length(), 2);
        for &s in profile.slots() {
            assert_abs_diff_eq!(s, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn recovers_zero_mean_pattern() {
        let pattern = [5.0, -2.0, 1.0, -4.0];
        let values: Vec<f64> = (0..24)
            .map(|i| 1000.0 + 3.0 * i as f64 + pattern[i % 4])
            .collect();
        let trend = TrendModel {
            slope: 3.0,
            intercept: 1000.0,
        };
        let profile = decompose(&values, &trend, 4).unwrap();
        for (got, want) in profile.slots().iter().zip(pattern) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(profile.amplitude(), 9.0, epsilon = 1e-9);
    }

    #[test]
    fn fitted_trend_recovers_index_orthogonal_pattern() {
        // Σ j·p[j] = 0, so the pattern does not tilt the fitted slope
        let pattern = [1.0, -1.0, -1.0, 1.0];
        let values: Vec<f64> = (0..32)
            .map(|i| 500.0 - 2.0 * i as f64 + pattern[i % 4])
            .collect();
        let trend = fit_indexed(&values).unwrap();
        let profile = decompose(&values, &trend, 4).unwrap();
        for (got, want) in profile.slots().iter().zip(pattern) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-6);
        }
    }

    #[test]
    fn empty_slots_default_to_zero() {
        let values = [1.0, 2.0, 4.0];
        let trend = TrendModel {
            slope: 1.0,
            intercept: 1.0,
        };
        let profile = decompose(&values, &trend, 5).unwrap();
        assert_eq!(profile.slots(), &[0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn value_at_wraps_around() {
        let trend = TrendModel {
            slope: 0.0,
            intercept: 0.0,
        };
        let profile = decompose(&[1.0, 2.0, 3.0], &trend, 3).unwrap();
        assert_eq!(profile.value_at(4), 2.0);
        assert_eq!(profile.value_at(6), 1.0);
    }

    #[test]
    fn zero_season_length_is_invalid() {
        let trend = TrendModel {
            slope: 0.0,
            intercept: 0.0,
        };
        let err = decompose(&[1.0, 2.0], &trend, 0).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));
    }
}
