//! Simple Moving Average (SMA).
//!
//! Rolling mean over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

/// Mean of the window of `period` values ending at `index`.
///
/// Returns `None` during warm-up or when `index` is past the end of `values`.
/// A NaN inside the window yields `Some(NaN)`.
pub fn sma_at(values: &[f64], index: usize, period: usize) -> Option<f64> {
    if period == 0 || index >= values.len() || index + 1 < period {
        return None;
    }
    let window = &values[index + 1 - period..=index];
    let sum: f64 = window.iter().sum();
    Some(sum / period as f64)
}

/// Rolling SMA over a full series. Warm-up positions are `f64::NAN`.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let mut sum = 0.0;
    let mut nan_in_window = false;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            nan_in_window = true;
        }
        sum += v;
    }

    if !nan_in_window {
        result[period - 1] = sum / period as f64;
    }

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];
        sum = sum - leaving + entering;

        // A NaN poisons the running sum; rescan the window until it leaves.
        if entering.is_nan() || leaving.is_nan() || nan_in_window {
            nan_in_window = false;
            sum = 0.0;
            for &v in &values[(i + 1 - period)..=i] {
                if v.is_nan() {
                    nan_in_window = true;
                }
                sum += v;
            }
            if nan_in_window {
                continue;
            }
        }

        result[i] = sum / period as f64;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let result = sma_of_series(&values, 5);

        assert_eq!(result.len(), 7);
        for (i, v) in result.iter().enumerate().take(4) {
            assert!(v.is_nan(), "expected NaN at index {i}");
        }
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_identity() {
        let result = sma_of_series(&[100.0, 200.0, 300.0], 1);
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn sma_nan_propagation() {
        let values = [10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0];
        let result = sma_of_series(&values, 3);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        assert_approx(result[5], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_too_few_values() {
        let result = sma_of_series(&[10.0, 11.0], 5);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sma_at_matches_rolling() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let rolling = sma_of_series(&values, 3);
        assert_eq!(sma_at(&values, 1, 3), None);
        for i in 2..values.len() {
            assert_approx(sma_at(&values, i, 3).unwrap(), rolling[i], DEFAULT_EPSILON);
        }
        assert_eq!(sma_at(&values, values.len(), 3), None);
        assert_eq!(sma_at(&values, 4, 0), None);
    }
}
