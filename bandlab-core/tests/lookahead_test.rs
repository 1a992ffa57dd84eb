//! Look-ahead contamination tests for every band line and moving average.
//!
//! Invariant: no value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs.

use bandlab_core::domain::{Bar, PriceSource};
use bandlab_core::indicators::{AverageMode, Indicator, MovingAverage};
use bandlab_core::study::{BandIndicator, BandLine, StudyConfig};
use chrono::NaiveDate;

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
        price += change;
        price = price.max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;

        bars.push(Bar::new(
            base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            1000 + (i as u64 * 100),
        ));
    }

    bars
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let truncated = &full_bars[..truncated_len];
    let full_result = indicator.compute(full_bars);
    let truncated_result = indicator.compute(truncated);

    assert_eq!(
        truncated_result.len(),
        truncated_len,
        "{}: truncated result length mismatch",
        indicator.name()
    );
    assert_eq!(
        full_result.len(),
        full_bars.len(),
        "{}: full result length mismatch",
        indicator.name()
    );

    for i in 0..truncated_len {
        let t = truncated_result[i];
        let f = full_result[i];

        if t.is_nan() && f.is_nan() {
            continue;
        }

        assert!(
            !t.is_nan() && !f.is_nan(),
            "{}: NaN mismatch at bar {i} (truncated={t}, full={f})",
            indicator.name()
        );

        assert!(
            (t - f).abs() < 1e-10,
            "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}, diff={}",
            indicator.name(),
            (t - f).abs()
        );
    }
}

fn assert_warm_up(indicator: &dyn Indicator, bars: &[Bar]) {
    let result = indicator.compute(bars);
    let lookback = indicator.lookback().min(bars.len());
    for (i, v) in result.iter().enumerate().take(lookback) {
        assert!(v.is_nan(), "{}: expected warm-up NaN at bar {i}", indicator.name());
    }
    if lookback < bars.len() {
        assert!(
            !result[lookback].is_nan(),
            "{}: expected first value at bar {lookback}",
            indicator.name()
        );
    }
}

#[test]
fn lookahead_moving_averages() {
    let bars = make_test_bars(200);
    for period in [1, 10, 20] {
        assert_no_lookahead(&MovingAverage::sma(period), &bars, 100);
        assert_no_lookahead(&MovingAverage::ema(period), &bars, 100);
        assert_no_lookahead(&MovingAverage::wma(period), &bars, 100);
    }
}

#[test]
fn lookahead_band_lines_every_mode_and_source() {
    let bars = make_test_bars(200);
    for mode in AverageMode::ALL {
        for source in PriceSource::ALL {
            let config = StudyConfig::new(14, mode, 2.0, source).unwrap();
            for line in BandLine::ALL {
                assert_no_lookahead(&BandIndicator::new(config.clone(), line), &bars, 100);
            }
        }
    }
}

#[test]
fn lookahead_short_and_long_windows() {
    let bars = make_test_bars(200);
    for length in [1, 2, 3, 50, 150] {
        let config = StudyConfig::new(length, AverageMode::Exponential, 1.5, PriceSource::Hlc3)
            .unwrap();
        for line in BandLine::ALL {
            assert_no_lookahead(&BandIndicator::new(config.clone(), line), &bars, 100);
        }
    }
}

#[test]
fn warm_up_matches_lookback() {
    let bars = make_test_bars(120);
    for mode in AverageMode::ALL {
        for length in [1, 2, 7, 20] {
            let config = StudyConfig::new(length, mode, 2.0, PriceSource::Close).unwrap();
            for line in BandLine::ALL {
                assert_warm_up(&BandIndicator::new(config.clone(), line), &bars);
            }
        }
        assert_warm_up(&MovingAverage::new(9, mode, PriceSource::Ohlc4), &bars);
    }
}
