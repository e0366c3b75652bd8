//! Statistical utility functions.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation of the aligned prefix of two series.
///
/// Both series are truncated to the shorter length. Returns 0.0 for an empty
/// overlap or when either side has zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut numerator = 0.0;
    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        numerator += da * db;
        sum_a += da * da;
        sum_b += db * db;
    }

    let denominator = (sum_a * sum_b).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        (numerator / denominator).clamp(-1.0, 1.0)
    }
}
