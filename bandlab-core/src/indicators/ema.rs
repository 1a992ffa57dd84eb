//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1)
//! Seed: EMA[period-1] = SMA of the first `period` values.
//! Lookback: period - 1.

use super::sma::sma_at;

/// Smoothing factor for a period.
pub fn ema_alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// One recursive smoothing step.
#[inline]
pub fn ema_step(prev: f64, value: f64, alpha: f64) -> f64 {
    alpha * value + (1.0 - alpha) * prev
}

/// EMA value at `index`, replaying the recursion from the seed.
///
/// Used when no carried state is available for the previous index.
pub fn ema_at(values: &[f64], index: usize, period: usize) -> Option<f64> {
    let seed_index = period.checked_sub(1)?;
    let mut prev = sma_at(values, seed_index, period)?;
    if index < seed_index || index >= values.len() {
        return None;
    }
    let alpha = ema_alpha(period);
    for &v in &values[seed_index + 1..=index] {
        prev = ema_step(prev, v, alpha);
    }
    Some(prev)
}

/// EMA over a full series. Warm-up positions are `f64::NAN`.
///
/// A NaN in the seed window leaves the whole output NaN; a NaN after the seed
/// taints every later value.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    let Some(seed) = period
        .checked_sub(1)
        .and_then(|seed_index| sma_at(values, seed_index, period))
    else {
        return result;
    };
    if seed.is_nan() {
        return result;
    }
    result[period - 1] = seed;

    let alpha = ema_alpha(period);
    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            return result;
        }
        prev = ema_step(prev, values[i], alpha);
        result[i] = prev;
    }

    result
}
