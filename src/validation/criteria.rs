//! Information criteria and lag-order selection.

use crate::error::{ForecastError, Result};
use crate::utils::{lag_matrix, ols_fit, ols_residuals};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// AIC, BIC (Schwarz) and Hannan-Quinn scores of one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriteriaResult {
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
}

/// Compute information criteria from residuals under a Gaussian likelihood.
///
/// `logL = -n/2 · ln(2π · rss/n) - n/2`, `aic = -2logL + 2k`,
/// `bic = -2logL + k·ln n`, `hqic = -2logL + 2k·ln(ln n)`.
///
/// Fails for fewer than two residuals, non-finite residuals or a zero
/// residual sum of squares.
pub fn compute_information_criteria(
    residuals: &[f64],
    num_parameters: usize,
) -> Result<CriteriaResult> {
    let n = residuals.len();
    if n < 2 {
        return Err(ForecastError::InsufficientData { needed: 2, got: n });
    }
    if residuals.iter().any(|r| !r.is_finite()) {
        return Err(ForecastError::DegenerateInput(
            "residuals must be finite".to_string(),
        ));
    }

    let rss: f64 = residuals.iter().map(|r| r * r).sum();
    if rss <= 0.0 {
        return Err(ForecastError::DegenerateInput(
            "residual sum of squares is zero".to_string(),
        ));
    }

    let nf = n as f64;
    let k = num_parameters as f64;
    let log_likelihood = -nf / 2.0 * (2.0 * PI * rss / nf).ln() - nf / 2.0;
    let deviance = -2.0 * log_likelihood;

    Ok(CriteriaResult {
        aic: deviance + 2.0 * k,
        bic: deviance + k * nf.ln(),
        hqic: deviance + 2.0 * k * nf.ln().ln(),
    })
}

/// Scores of one candidate lag order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagScore {
    pub lag: usize,
    pub criteria: CriteriaResult,
    /// Final prediction error
    pub fpe: f64,
}

/// Per-lag scores and the lag minimising each criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagSelection {
    pub scores: Vec<LagScore>,
    pub aic: usize,
    pub hqic: usize,
    /// Schwarz criterion (SC)
    pub bic: usize,
    pub fpe: usize,
}

impl LagSelection {
    /// The larger of the AIC and BIC choices.
    pub fn recommended(&self) -> usize {
        self.aic.max(self.bic)
    }
}

/// Select an autoregressive lag order for `series` among `1..=max_lag`.
///
/// Every AR(p) model is fitted by OLS on the same effective sample
/// `series[max_lag..]` so the scores are comparable. Ties go to the smaller lag.
pub fn select_lag_order(series: &[f64], max_lag: usize) -> Result<LagSelection> {
    if max_lag == 0 {
        return Err(ForecastError::InvalidParameter(
            "maximum lag must be positive".to_string(),
        ));
    }
    let needed = 2 * max_lag + 3;
    if series.len() < needed {
        return Err(ForecastError::InsufficientData {
            needed,
            got: series.len(),
        });
    }

    let y = &series[max_lag..];
    let m = y.len() as f64;
    let scores = (1..=max_lag)
        .map(|lag| -> Result<LagScore> {
            let columns = lag_matrix(series, lag, max_lag);
            let fit = ols_fit(y, &columns)?;
            let residuals = ols_residuals(y, &fit, &columns)?;
            let k = lag + 1;
            let criteria = compute_information_criteria(&residuals, k)?;
            let kf = k as f64;
            let fpe = (fit.rss / m) * (m + kf) / (m - kf);
            Ok(LagScore {
                lag,
                criteria,
                fpe,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let selection = LagSelection {
        aic: argmin(&scores, |s| s.criteria.aic),
        hqic: argmin(&scores, |s| s.criteria.hqic),
        bic: argmin(&scores, |s| s.criteria.bic),
        fpe: argmin(&scores, |s| s.fpe),
        scores,
    };
    debug!(
        aic = selection.aic,
        hqic = selection.hqic,
        bic = selection.bic,
        fpe = selection.fpe,
        "selected lag orders"
    );
    Ok(selection)
}

fn argmin(scores: &[LagScore], key: impl Fn(&LagScore) -> f64) -> usize {
    scores
        .iter()
        .fold(None::<&LagScore>, |best, s| match best {
            Some(b) if key(b) <= key(s) => Some(b),
            _ => Some(s),
        })
        .map(|s| s.lag)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5
            })
            .collect()
    }

    #[test]
    fn matches_closed_form() {
        let result = compute_information_criteria(&[1.0, -1.0, 1.0, -1.0], 1).unwrap();
        // rss/n = 1, so -2logL = 4·ln(2π) + 4
        let deviance = 4.0 * (2.0 * PI).ln() + 4.0;
        assert_relative_eq!(result.aic, deviance + 2.0, epsilon = 1e-12);
        assert_relative_eq!(result.bic, deviance + 4f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(result.hqic, deviance + 2.0 * 4f64.ln().ln(), epsilon = 1e-12);
        assert_relative_eq!(result.aic, 13.351508265637381, epsilon = 1e-9);
        assert_relative_eq!(result.bic, 12.737802626757272, epsilon = 1e-9);
        assert_relative_eq!(result.hqic, 12.004776785593943, epsilon = 1e-9);
    }

    #[test]
    fn zero_parameters_leave_only_the_deviance() {
        let result = compute_information_criteria(&[0.5, -2.0, 1.5], 0).unwrap();
        assert_eq!(result.aic, result.bic);
        assert_eq!(result.aic, result.hqic);
    }

    #[test]
    fn two_residuals_are_finite() {
        let result = compute_information_criteria(&[1.0, 2.0], 3).unwrap();
        assert!(result.aic.is_finite() && result.bic.is_finite() && result.hqic.is_finite());
        // ln(ln 2) < 0
        assert!(result.hqic < result.bic);
    }

    #[test]
    fn degenerate_inputs_fail() {
        assert_eq!(
            compute_information_criteria(&[1.0], 1).unwrap_err(),
            ForecastError::InsufficientData { needed: 2, got: 1 }
        );
        assert_eq!(
            compute_information_criteria(&[], 1).unwrap_err(),
            ForecastError::InsufficientData { needed: 2, got: 0 }
        );
        assert!(matches!(
            compute_information_criteria(&[0.0, 0.0, 0.0], 1).unwrap_err(),
            ForecastError::DegenerateInput(_)
        ));
        assert!(matches!(
            compute_information_criteria(&[1.0, f64::NAN], 1).unwrap_err(),
            ForecastError::DegenerateInput(_)
        ));
    }

    #[test]
    fn selects_ar2_order() {
        let e = noise(400, 42);
        let mut x = vec![0.0; 400];
        for t in 2..400 {
            x[t] = 0.5 * x[t - 1] - 0.4 * x[t - 2] + e[t];
        }
        let selection = select_lag_order(&x, 6).unwrap();

        assert_eq!(selection.scores.len(), 6);
        assert!(selection.bic >= 2);
        assert!(selection.bic <= selection.hqic);
        assert!(selection.hqic <= selection.aic);
        assert_eq!(selection.recommended(), selection.aic);
        for (i, score) in selection.scores.iter().enumerate() {
            assert_eq!(score.lag, i + 1);
            assert!(score.fpe > 0.0);
        }
    }

    #[test]
    fn lag_selection_rejects_bad_input() {
        assert!(matches!(
            select_lag_order(&[1.0; 20], 0).unwrap_err(),
            ForecastError::InvalidParameter(_)
        ));
        assert_eq!(
            select_lag_order(&[1.0; 8], 3).unwrap_err(),
            ForecastError::InsufficientData { needed: 9, got: 8 }
        );
    }

    #[test]
    fn argmin_prefers_smaller_lag_on_ties() {
        let c = CriteriaResult {
            aic: 1.0,
            bic: 1.0,
            hqic: 1.0,
        };
        let scores = vec![
            LagScore {
                lag: 1,
                criteria: c,
                fpe: 2.0,
            },
            LagScore {
                lag: 2,
                criteria: c,
                fpe: 1.0,
            },
        ];
        assert_eq!(argmin(&scores, |s| s.criteria.aic), 1);
        assert_eq!(argmin(&scores, |s| s.fpe), 2);
    }
}
