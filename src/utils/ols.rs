//! Ordinary Least Squares (OLS) regression on ordered regressor columns.
//!
//! Used by the lagged regressions behind the Granger F-test and lag-order
//! selection.

use crate::error::{ForecastError, Result};

/// OLS regression coefficients and intercept.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Regression coefficients, one per regressor column in input order.
    pub coefficients: Vec<f64>,
    /// Intercept term.
    pub intercept: f64,
    /// Residual sum of squares of the fit.
    pub rss: f64,
}

impl OLSResult {
    /// Predict values for the given regressor columns.
    pub fn predict(&self, columns: &[Vec<f64>]) -> Result<Vec<f64>> {
        if columns.len() != self.coefficients.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: columns.len(),
            });
        }
        let n = columns.first().map(|c| c.len()).unwrap_or(0);
        for col in columns {
            if col.len() != n {
                return Err(ForecastError::DimensionMismatch {
                    expected: n,
                    got: col.len(),
                });
            }
        }

        let mut predictions = vec![self.intercept; n];
        for (coef, col) in self.coefficients.iter().zip(columns) {
            for (pred, x) in predictions.iter_mut().zip(col) {
                *pred += coef * x;
            }
        }
        Ok(predictions)
    }

    /// Get the number of regressors.
    pub fn num_regressors(&self) -> usize {
        self.coefficients.len()
    }
}

/// Fit OLS regression: y = intercept + X @ coefficients
///
/// Uses Cholesky decomposition to solve the normal equations.
///
/// # Arguments
/// * `y` - Target values (length n)
/// * `columns` - Regressor columns (each length n)
pub fn ols_fit(y: &[f64], columns: &[Vec<f64>]) -> Result<OLSResult> {
    let n = y.len();
    let k = columns.len();

    if n <= k {
        return Err(ForecastError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    for col in columns {
        if col.len() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: col.len(),
            });
        }
    }

    // Design matrix has k+1 columns: [1, x1, x2, ...]
    let num_params = k + 1;
    let mut xtx = vec![vec![0.0; num_params]; num_params];
    let mut xty = vec![0.0; num_params];

    for obs in 0..n {
        let y_obs = y[obs];

        xtx[0][0] += 1.0;
        for j in 0..k {
            let xj = columns[j][obs];
            xtx[0][j + 1] += xj;
            xtx[j + 1][0] += xj;
        }
        for i in 0..k {
            let xi = columns[i][obs];
            for j in 0..k {
                xtx[i + 1][j + 1] += xi * columns[j][obs];
            }
        }

        xty[0] += y_obs;
        for i in 0..k {
            xty[i + 1] += columns[i][obs] * y_obs;
        }
    }

    // Small ridge term keeps nearly collinear lag columns solvable
    for i in 0..num_params {
        xtx[i][i] += 1e-8;
    }

    let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::DegenerateInput("OLS normal equations are not positive definite".into())
    })?;

    let mut fit = OLSResult {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
        rss: 0.0,
    };
    fit.rss = ols_residuals(y, &fit, columns)?
        .iter()
        .map(|r| r * r)
        .sum();
    Ok(fit)
}

/// Solve symmetric positive definite system using Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L @ L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

/// Compute residuals (y - y_hat) of a fitted model.
pub fn ols_residuals(y: &[f64], ols_result: &OLSResult, columns: &[Vec<f64>]) -> Result<Vec<f64>> {
    let predictions = if columns.is_empty() {
        vec![ols_result.intercept; y.len()]
    } else {
        ols_result.predict(columns)?
    };

    if predictions.len() != y.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: y.len(),
            got: predictions.len(),
        });
    }

    Ok(y.iter().zip(&predictions).map(|(yi, pi)| yi - pi).collect())
}

/// Build `lags` lagged copies of `series` aligned to `series[max_lag..]`.
///
/// Column `j` (0-based) holds `series[t - (j + 1)]` for `t` in `max_lag..len`.
pub fn lag_matrix(series: &[f64], lags: usize, max_lag: usize) -> Vec<Vec<f64>> {
    (1..=lags)
        .map(|lag| (max_lag..series.len()).map(|t| series[t - lag]).collect())
        .collect()
}
