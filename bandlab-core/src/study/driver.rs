//! Bar-iteration driver: the host's auto-loop.
//!
//! Owns the configuration, the calculator state and the outputs. Bars arrive
//! either one at a time (`on_bar`) or as a full history (`recompute`); both
//! paths produce the same series.

use crate::domain::Bar;
use crate::error::ConfigError;

use super::alert::AlertSink;
use super::calculator::{BandCalculator, BarUpdate};
use super::config::StudyConfig;
use super::output::BandSeries;
use super::state::BandState;

#[derive(Debug, Clone)]
pub struct BandStudy {
    calculator: BandCalculator,
    fingerprint: String,
    bars: Vec<Bar>,
    prices: Vec<f64>,
    state: BandState,
    series: BandSeries,
}

impl BandStudy {
    pub fn new(config: StudyConfig) -> Result<Self, ConfigError> {
        let fingerprint = config.fingerprint();
        Ok(Self {
            calculator: BandCalculator::new(config)?,
            fingerprint,
            bars: Vec::new(),
            prices: Vec::new(),
            state: BandState::new(),
            series: BandSeries::new(),
        })
    }

    pub fn config(&self) -> &StudyConfig {
        self.calculator.config()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Effective price series fed to the calculator.
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn series(&self) -> &BandSeries {
        &self.series
    }

    pub fn state(&self) -> &BandState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Append one closed bar and evaluate it.
    pub fn on_bar(&mut self, bar: &Bar, sink: &mut dyn AlertSink) -> BarUpdate {
        let index = self.bars.len();
        self.prices.push(self.config().price_source.price(bar));
        self.bars.push(bar.clone());

        let update =
            self.calculator
                .update(&self.prices, index, &mut self.state, &mut self.series);
        for alert in update.alerts() {
            sink.on_alert(*alert);
        }
        update
    }

    /// Replace the history with `bars` and evaluate it in one pass.
    pub fn recompute(&mut self, bars: &[Bar], sink: &mut dyn AlertSink) {
        self.bars = bars.to_vec();
        self.prices = self.config().price_source.extract(bars);
        self.rerun(sink);
    }

    /// Swap in a new configuration.
    ///
    /// Returns `true` when the outputs were recomputed. An identical
    /// configuration (same fingerprint) leaves everything untouched.
    pub fn reconfigure(
        &mut self,
        config: StudyConfig,
        sink: &mut dyn AlertSink,
    ) -> Result<bool, ConfigError> {
        let fingerprint = config.fingerprint();
        if fingerprint == self.fingerprint {
            return Ok(false);
        }
        self.calculator = BandCalculator::new(config)?;
        self.fingerprint = fingerprint;
        self.prices = self.config().price_source.extract(&self.bars);
        tracing::debug!(
            study = %self.config().label(),
            bars = self.bars.len(),
            "configuration changed, recomputing"
        );
        self.rerun(sink);
        Ok(true)
    }

    fn rerun(&mut self, sink: &mut dyn AlertSink) {
        self.state.reset();
        self.series.clear();
        let mut alerts = 0usize;
        for index in 0..self.prices.len() {
            let update =
                self.calculator
                    .update(&self.prices, index, &mut self.state, &mut self.series);
            for alert in update.alerts() {
                sink.on_alert(*alert);
                alerts += 1;
            }
        }
        tracing::debug!(
            study = %self.config().label(),
            bars = self.prices.len(),
            defined = self.series.defined_count(),
            alerts,
            "recomputed"
        );
    }
}
