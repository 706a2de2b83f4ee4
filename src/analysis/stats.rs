//! Numeric helpers shared by the forecasting methods and diagnostics.
//!
//! Every function accepts short or empty input and answers with a neutral default
//! (usually `0.0`) instead of failing or producing `NaN`.

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Least-squares slope of `values` against the positions `1..=n`.
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (idx, &y) in values.iter().enumerate() {
        let x = (idx + 1) as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    let denominator = n_f * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n_f * sum_xy - sum_x * sum_y) / denominator
}

/// Sample standard deviation (`n - 1` denominator).
pub fn volatility(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Population standard deviation (`n` denominator).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Volatility relative to the mean; `0.0` when the mean is not positive.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let avg = mean(values);
    if avg <= 0.0 {
        return 0.0;
    }
    volatility(values) / avg
}

/// Per-period compound growth between the first and last value.
pub fn compound_growth_rate(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let first = values[0];
    let last = values[n - 1];
    if first <= 0.0 || last <= 0.0 {
        return 0.0;
    }
    (last / first).powf(1.0 / (n - 1) as f64) - 1.0
}

/// Distance of `value` from `avg` in units of `std_dev`; `0.0` for a flat series.
pub fn z_score(value: f64, avg: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    (value - avg) / std_dev
}
