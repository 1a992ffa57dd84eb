//! Weighted Moving Average (WMA).
//!
//! Linear weights: the newest value gets weight `period`, the oldest weight 1.
//!
//! ```text
//! WMA = (P₁ × n + P₂ × (n-1) + ... + Pₙ × 1) / (n × (n+1) / 2)
//! ```
//!
//! Lookback: period - 1.

fn weight_sum(period: usize) -> f64 {
    (period * (period + 1)) as f64 / 2.0
}

/// Weighted mean of the window of `period` values ending at `index`.
///
/// Returns `None` during warm-up or past the end of `values`.
pub fn wma_at(values: &[f64], index: usize, period: usize) -> Option<f64> {
    if period == 0 || index >= values.len() || index + 1 < period {
        return None;
    }
    let window = &values[index + 1 - period..=index];
    let weighted: f64 = window
        .iter()
        .enumerate()
        .map(|(k, &v)| v * (k + 1) as f64)
        .sum();
    Some(weighted / weight_sum(period))
}

/// WMA over a full series. Warm-up positions are `f64::NAN`.
///
/// Uses the O(n) update: the new value enters with weight `period`, every
/// value already in the window loses one weight unit, the oldest drops out.
pub fn wma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let divisor = weight_sum(period);
    let mut weighted = 0.0;
    let mut plain = 0.0;
    for (k, &v) in values.iter().take(period).enumerate() {
        weighted += v * (k + 1) as f64;
        plain += v;
    }
    result[period - 1] = weighted / divisor;

    for i in period..n {
        if values[i].is_nan() || values[i - period].is_nan() || weighted.is_nan() {
            // Rebuild from the window so a NaN stops poisoning once it leaves.
            if let Some(v) = wma_at(values, i, period) {
                result[i] = v;
            }
            let window = &values[i + 1 - period..=i];
            plain = window.iter().sum();
            weighted = window
                .iter()
                .enumerate()
                .map(|(k, &v)| v * (k + 1) as f64)
                .sum();
            continue;
        }
        weighted = weighted + period as f64 * values[i] - plain;
        plain = plain + values[i] - values[i - period];
        result[i] = weighted / divisor;
    }

    result
}
