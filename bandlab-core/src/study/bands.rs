//! The study's output lines as separate `Indicator` instances.
//!
//! Each line is its own named indicator backed by the same calculator, which
//! keeps the single-series `Indicator` trait unchanged.

use crate::domain::Bar;
use crate::indicators::Indicator;

use super::calculator::BandCalculator;
use super::config::StudyConfig;

/// Which output line to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandLine {
    Main,
    Signal,
    Upper,
    Lower,
}

impl BandLine {
    pub const ALL: [BandLine; 4] = [BandLine::Main, BandLine::Signal, BandLine::Upper, BandLine::Lower];

    /// Display name of the line.
    pub fn title(self) -> &'static str {
        match self {
            BandLine::Main => "Main Line",
            BandLine::Signal => "Signal Line",
            BandLine::Upper => "Upper Band",
            BandLine::Lower => "Lower Band",
        }
    }

    fn key(self) -> &'static str {
        match self {
            BandLine::Main => "main",
            BandLine::Signal => "signal",
            BandLine::Upper => "upper",
            BandLine::Lower => "lower",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BandIndicator {
    calculator: BandCalculator,
    line: BandLine,
    name: String,
}

impl BandIndicator {
    /// Panics on an invalid configuration; use `StudyConfig::validate` first
    /// when the parameters come from user input.
    pub fn new(config: StudyConfig, line: BandLine) -> Self {
        let name = format!(
            "bands_{}_{}_{}_{}_{}",
            line.key(),
            config.length,
            config.average_mode.key(),
            config.multiplier,
            config.price_source.key()
        );
        let calculator = BandCalculator::new(config).expect("invalid band study configuration");
        Self {
            calculator,
            line,
            name,
        }
    }

    pub fn main(config: StudyConfig) -> Self {
        Self::new(config, BandLine::Main)
    }

    pub fn signal(config: StudyConfig) -> Self {
        Self::new(config, BandLine::Signal)
    }

    pub fn upper(config: StudyConfig) -> Self {
        Self::new(config, BandLine::Upper)
    }

    pub fn lower(config: StudyConfig) -> Self {
        Self::new(config, BandLine::Lower)
    }

    pub fn line(&self) -> BandLine {
        self.line
    }
}

impl Indicator for BandIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let config = self.calculator.config();
        match self.line {
            BandLine::Signal => config
                .first_signal_index()
                .unwrap_or(usize::MAX),
            _ => config.first_band_index(),
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let series = self.calculator.compute_bars(bars).series;
        match self.line {
            BandLine::Main => series.main,
            BandLine::Signal => series.signal,
            BandLine::Upper => series.upper,
            BandLine::Lower => series.lower,
        }
    }
}
