//! The band calculator: per-bar update and full-range pass.
//!
//! Per bar i (once i >= length - 1):
//! - Main = moving average of the last `length` prices
//! - StdDev = sqrt(sum((price - Main)^2) / length), measured from Main
//! - Upper / Lower = Main +/- multiplier * StdDev
//! - Signal = moving average of the last floor(length / 2) Main values
//! - alerts when the price crosses a band between bar i-1 and bar i
//!
//! Calling `update` for every index in order and calling `compute` once give
//! bit-identical outputs.

use crate::domain::Bar;
use crate::error::ConfigError;
use crate::indicators::{ema_alpha, ema_step, sma_at, AverageMode};

use super::alert::{crossings, AlertEvent, BandSample};
use super::config::StudyConfig;
use super::output::{BandPoint, BandSeries};
use super::state::{BandState, SmoothingCarry};

/// Outcome of one per-bar update.
#[derive(Debug, Clone, PartialEq)]
pub enum BarUpdate {
    /// The index is past the end of the price series.
    Unavailable,
    /// Not enough history yet.
    WarmUp,
    Computed {
        point: BandPoint,
        alerts: Vec<AlertEvent>,
    },
}

impl BarUpdate {
    pub fn point(&self) -> Option<&BandPoint> {
        match self {
            BarUpdate::Computed { point, .. } => Some(point),
            _ => None,
        }
    }

    pub fn alerts(&self) -> &[AlertEvent] {
        match self {
            BarUpdate::Computed { alerts, .. } => alerts,
            _ => &[],
        }
    }
}

/// Outputs of a full-range pass.
#[derive(Debug, Clone, Default)]
pub struct BandRun {
    pub series: BandSeries,
    pub alerts: Vec<AlertEvent>,
}

/// Stateless calculation routine bound to one validated configuration.
#[derive(Debug, Clone)]
pub struct BandCalculator {
    config: StudyConfig,
}

impl BandCalculator {
    pub fn new(config: StudyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Evaluate bar `index` of `prices`, writing into `out`.
    ///
    /// Bars between the last evaluated one and `index` are filled in first;
    /// alerts are only reported for `index` itself. Evaluating an index again
    /// rewrites the same values.
    pub fn update(
        &self,
        prices: &[f64],
        index: usize,
        state: &mut BandState,
        out: &mut BandSeries,
    ) -> BarUpdate {
        if index >= prices.len() {
            return BarUpdate::Unavailable;
        }
        out.ensure_len(index + 1);

        for gap in state.computed.min(index)..index {
            self.evaluate(prices, gap, state, out);
        }
        self.evaluate(prices, index, state, out)
    }

    /// Single pass over the whole price series.
    pub fn compute(&self, prices: &[f64]) -> BandRun {
        let mut state = BandState::new();
        let mut series = BandSeries::with_capacity(prices.len());
        let mut alerts = Vec::new();
        for index in 0..prices.len() {
            let update = self.update(prices, index, &mut state, &mut series);
            alerts.extend_from_slice(update.alerts());
        }
        BandRun { series, alerts }
    }

    /// Single pass over bars, using the configured price source.
    pub fn compute_bars(&self, bars: &[Bar]) -> BandRun {
        self.compute(&self.config.price_source.extract(bars))
    }

    fn evaluate(
        &self,
        prices: &[f64],
        index: usize,
        state: &mut BandState,
        out: &mut BandSeries,
    ) -> BarUpdate {
        state.computed = state.computed.max(index + 1);

        let length = self.config.length;
        if index + 1 < length {
            return BarUpdate::WarmUp;
        }

        let main = self.main_value(prices, index, state);
        let window = &prices[index + 1 - length..=index];
        let variance = window
            .iter()
            .map(|price| {
                let diff = price - main;
                diff * diff
            })
            .sum::<f64>()
            / length as f64;
        let std_dev = variance.sqrt();
        let offset = self.config.multiplier * std_dev;
        let upper = main + offset;
        let lower = main - offset;

        out.main[index] = main;
        out.std_dev[index] = std_dev;
        out.upper[index] = upper;
        out.lower[index] = lower;
        out.highlight[index] = prices[index] > upper;

        let signal = self.signal_value(index, state, out);
        out.signal[index] = signal.unwrap_or(f64::NAN);

        let alerts = self.alerts_at(prices, index, out);

        BarUpdate::Computed {
            point: BandPoint {
                main,
                signal,
                upper,
                lower,
                std_dev,
            },
            alerts,
        }
    }

    fn main_value(&self, prices: &[f64], index: usize, state: &mut BandState) -> f64 {
        let length = self.config.length;
        let carried = state.main.and_then(|c| c.previous_for(index));
        let value = smoothed(self.config.average_mode, prices, index, length, carried);
        if self.config.average_mode == AverageMode::Exponential {
            SmoothingCarry::commit(&mut state.main, index, value);
        }
        value
    }

    /// Average of the main line over the signal window; `None` while it fills.
    fn signal_value(&self, index: usize, state: &mut BandState, out: &BandSeries) -> Option<f64> {
        let first_index = self.config.first_signal_index()?;
        if index < first_index {
            return None;
        }
        // Main is defined from the first band index on; index from there.
        let base = self.config.first_band_index();
        let main = &out.main[base..=index];
        let local = index - base;

        let carried = state.signal.and_then(|c| c.previous_for(index));
        let value = smoothed(
            self.config.average_mode,
            main,
            local,
            self.config.signal_length(),
            carried,
        );
        if self.config.average_mode == AverageMode::Exponential {
            SmoothingCarry::commit(&mut state.signal, index, value);
        }
        Some(value)
    }

    fn alerts_at(&self, prices: &[f64], index: usize, out: &BandSeries) -> Vec<AlertEvent> {
        let Some(prev_index) = index.checked_sub(1) else {
            return Vec::new();
        };
        let (Some(prev_upper), Some(prev_lower)) = (out.upper_at(prev_index), out.lower_at(prev_index))
        else {
            return Vec::new();
        };
        let prev = BandSample {
            price: prices[prev_index],
            upper: prev_upper,
            lower: prev_lower,
        };
        let curr = BandSample {
            price: prices[index],
            upper: out.upper[index],
            lower: out.lower[index],
        };
        crossings(prev, curr)
            .map(|kind| AlertEvent {
                bar_index: index,
                kind,
            })
            .collect()
    }
}

/// Average of the window ending at `index` (`index + 1 >= period`).
///
/// The exponential mode continues from `carried` (its value at `index - 1`)
/// when there is one and replays the recursion otherwise; both paths run the
/// same arithmetic.
fn smoothed(
    mode: AverageMode,
    values: &[f64],
    index: usize,
    period: usize,
    carried: Option<f64>,
) -> f64 {
    match mode {
        AverageMode::Exponential if index + 1 > period => {
            let prev = carried
                .or_else(|| mode.at(values, index - 1, period))
                .unwrap_or(f64::NAN);
            ema_step(prev, values[index], ema_alpha(period))
        }
        AverageMode::Exponential => sma_at(values, index, period).unwrap_or(f64::NAN),
        _ => mode.at(values, index, period).unwrap_or(f64::NAN),
    }
}
