//! Price source selection: which bar field (or blend) feeds the study.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Bar;
use crate::error::ConfigError;

/// Effective price derived from a bar.
///
/// The declaration order matches the host's input index (0 = Close ... 7 = OHLC/4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriceSource {
    #[default]
    Close,
    Open,
    High,
    Low,
    /// (H + L) / 2
    Hl2,
    /// (H + L + C) / 3
    Hlc3,
    /// (H + L + 2C) / 4
    Hlcc4,
    /// (O + H + L + C) / 4
    Ohlc4,
}

impl PriceSource {
    pub const ALL: [PriceSource; 8] = [
        PriceSource::Close,
        PriceSource::Open,
        PriceSource::High,
        PriceSource::Low,
        PriceSource::Hl2,
        PriceSource::Hlc3,
        PriceSource::Hlcc4,
        PriceSource::Ohlc4,
    ];

    /// Select by the host's input index.
    pub fn from_index(index: usize) -> Result<Self, ConfigError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ConfigError::PriceSourceIndex(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label, e.g. `HL/2`.
    pub fn label(self) -> &'static str {
        match self {
            PriceSource::Close => "Close",
            PriceSource::Open => "Open",
            PriceSource::High => "High",
            PriceSource::Low => "Low",
            PriceSource::Hl2 => "HL/2",
            PriceSource::Hlc3 => "HLC/3",
            PriceSource::Hlcc4 => "HLCC/4",
            PriceSource::Ohlc4 => "OHLC/4",
        }
    }

    /// Config key, e.g. `hl2`.
    pub fn key(self) -> &'static str {
        match self {
            PriceSource::Close => "close",
            PriceSource::Open => "open",
            PriceSource::High => "high",
            PriceSource::Low => "low",
            PriceSource::Hl2 => "hl2",
            PriceSource::Hlc3 => "hlc3",
            PriceSource::Hlcc4 => "hlcc4",
            PriceSource::Ohlc4 => "ohlc4",
        }
    }

    pub fn price(self, bar: &Bar) -> f64 {
        match self {
            PriceSource::Close => bar.close,
            PriceSource::Open => bar.open,
            PriceSource::High => bar.high,
            PriceSource::Low => bar.low,
            PriceSource::Hl2 => (bar.high + bar.low) / 2.0,
            PriceSource::Hlc3 => (bar.high + bar.low + bar.close) / 3.0,
            PriceSource::Hlcc4 => (bar.high + bar.low + 2.0 * bar.close) / 4.0,
            PriceSource::Ohlc4 => (bar.open + bar.high + bar.low + bar.close) / 4.0,
        }
    }

    /// Effective price series for a run of bars.
    pub fn extract(self, bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|bar| self.price(bar)).collect()
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceSource {
    type Err = ConfigError;

    /// Accepts config keys (`hlc3`) and labels (`HLC/3`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|src| {
                src.key().eq_ignore_ascii_case(wanted) || src.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ConfigError::UnknownPriceSource(s.to_string()))
    }
}

impl TryFrom<String> for PriceSource {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PriceSource> for String {
    fn from(src: PriceSource) -> Self {
        src.key().to_string()
    }
}
