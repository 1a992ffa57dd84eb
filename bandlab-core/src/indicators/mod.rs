//! Moving averages and the `Indicator` trait.
//!
//! Indicators are pure functions: bar history in, numeric series out. The
//! first `lookback()` values of every output are `f64::NAN` (warm-up).
//!
//! # Look-ahead contamination guard
//! No value at bar t may depend on price data from bar t+1 or later. Every
//! indicator must pass the truncated-vs-full series test.

pub mod ema;
pub mod sma;
pub mod wma;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, PriceSource};
use crate::error::ConfigError;

pub use ema::{ema_alpha, ema_at, ema_of_series, ema_step};
pub use sma::{sma_at, sma_of_series};
pub use wma::{wma_at, wma_of_series};

/// Trait for indicators.
///
/// Takes a full bar series and produces an output series of the same length.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "bands_upper_14_2").
    fn name(&self) -> &str;

    /// Number of leading NaN values before the first valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Averaging method used for both the main line and the signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AverageMode {
    #[default]
    Simple,
    Exponential,
    Weighted,
}

impl AverageMode {
    pub const ALL: [AverageMode; 3] = [
        AverageMode::Simple,
        AverageMode::Exponential,
        AverageMode::Weighted,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AverageMode::Simple => "simple",
            AverageMode::Exponential => "exponential",
            AverageMode::Weighted => "weighted",
        }
    }

    /// Short form used in study labels.
    pub fn abbreviation(self) -> &'static str {
        match self {
            AverageMode::Simple => "SMA",
            AverageMode::Exponential => "EMA",
            AverageMode::Weighted => "WMA",
        }
    }

    /// Full-series average of `values` under this mode.
    pub fn series(self, values: &[f64], period: usize) -> Vec<f64> {
        match self {
            AverageMode::Simple => sma_of_series(values, period),
            AverageMode::Exponential => ema_of_series(values, period),
            AverageMode::Weighted => wma_of_series(values, period),
        }
    }

    /// Average of the window ending at `index`, computed from scratch.
    ///
    /// For `Exponential` this replays the recursion from the seed.
    pub fn at(self, values: &[f64], index: usize, period: usize) -> Option<f64> {
        match self {
            AverageMode::Simple => sma_at(values, index, period),
            AverageMode::Exponential => ema_at(values, index, period),
            AverageMode::Weighted => wma_at(values, index, period),
        }
    }
}

impl fmt::Display for AverageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AverageMode {
    type Err = ConfigError;

    /// Accepts `simple`/`sma`, `exponential`/`ema`, `weighted`/`wma`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| {
                mode.key().eq_ignore_ascii_case(wanted)
                    || mode.abbreviation().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ConfigError::UnknownAverageMode(s.to_string()))
    }
}

impl TryFrom<String> for AverageMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AverageMode> for String {
    fn from(mode: AverageMode) -> Self {
        mode.key().to_string()
    }
}

/// A moving average of a selected bar price.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    period: usize,
    mode: AverageMode,
    source: PriceSource,
    name: String,
}

impl MovingAverage {
    pub fn new(period: usize, mode: AverageMode, source: PriceSource) -> Self {
        assert!(period >= 1, "moving average period must be >= 1");
        Self {
            period,
            mode,
            source,
            name: format!("{}_{}_{}", mode.abbreviation().to_lowercase(), period, source.key()),
        }
    }

    pub fn sma(period: usize) -> Self {
        Self::new(period, AverageMode::Simple, PriceSource::Close)
    }

    pub fn ema(period: usize) -> Self {
        Self::new(period, AverageMode::Exponential, PriceSource::Close)
    }

    pub fn wma(period: usize) -> Self {
        Self::new(period, AverageMode::Weighted, PriceSource::Close)
    }
}

impl Indicator for MovingAverage {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        self.mode.series(&self.source.extract(bars), self.period)
    }
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for the first bar), high = max(open,close) + 1,
/// low = min(open,close) - 1.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                1000,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
