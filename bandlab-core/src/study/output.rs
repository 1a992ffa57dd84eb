//! Output series of the band study.

use serde::{Deserialize, Serialize};

/// Values of one bar once the bands are defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub main: f64,
    /// `None` until the signal window has filled (or never, for length 1).
    pub signal: Option<f64>,
    pub upper: f64,
    pub lower: f64,
    pub std_dev: f64,
}

impl BandPoint {
    /// Half the distance between the bands.
    pub fn half_width(&self) -> f64 {
        self.upper - self.main
    }
}

fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

/// Aligned output series. Undefined positions hold `f64::NAN`.
///
/// Positions are written once, in index order, by
/// [`BandCalculator::update`](super::BandCalculator::update).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandSeries {
    pub main: Vec<f64>,
    pub signal: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub std_dev: Vec<f64>,
    /// Price strictly above the upper band.
    pub highlight: Vec<bool>,
}

impl BandSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            main: Vec::with_capacity(capacity),
            signal: Vec::with_capacity(capacity),
            upper: Vec::with_capacity(capacity),
            lower: Vec::with_capacity(capacity),
            std_dev: Vec::with_capacity(capacity),
            highlight: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    /// Grow every series to `len`, padding with undefined values.
    pub(crate) fn ensure_len(&mut self, len: usize) {
        if self.main.len() >= len {
            return;
        }
        self.main.resize(len, f64::NAN);
        self.signal.resize(len, f64::NAN);
        self.upper.resize(len, f64::NAN);
        self.lower.resize(len, f64::NAN);
        self.std_dev.resize(len, f64::NAN);
        self.highlight.resize(len, false);
    }

    pub fn clear(&mut self) {
        self.main.clear();
        self.signal.clear();
        self.upper.clear();
        self.lower.clear();
        self.std_dev.clear();
        self.highlight.clear();
    }

    pub fn main_at(&self, index: usize) -> Option<f64> {
        self.main.get(index).copied().and_then(defined)
    }

    pub fn signal_at(&self, index: usize) -> Option<f64> {
        self.signal.get(index).copied().and_then(defined)
    }

    pub fn upper_at(&self, index: usize) -> Option<f64> {
        self.upper.get(index).copied().and_then(defined)
    }

    pub fn lower_at(&self, index: usize) -> Option<f64> {
        self.lower.get(index).copied().and_then(defined)
    }

    pub fn std_dev_at(&self, index: usize) -> Option<f64> {
        self.std_dev.get(index).copied().and_then(defined)
    }

    /// The full point at `index`, if the bands are defined there.
    pub fn point(&self, index: usize) -> Option<BandPoint> {
        Some(BandPoint {
            main: self.main_at(index)?,
            signal: self.signal_at(index),
            upper: self.upper_at(index)?,
            lower: self.lower_at(index)?,
            std_dev: self.std_dev_at(index)?,
        })
    }

    /// Number of indices with a defined main line.
    pub fn defined_count(&self) -> usize {
        self.main.iter().filter(|v| !v.is_nan()).count()
    }
}
