//! Error types for configuration and bar loading.
//!
//! Warm-up is not an error: the calculator reports it through
//! [`BarUpdate::WarmUp`](crate::study::BarUpdate) instead.

use thiserror::Error;

/// Rejected study configuration.
///
/// Every variant is raised before any calculation runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid length {length}: {reason}")]
    InvalidLength { length: usize, reason: &'static str },

    #[error("invalid multiplier {multiplier}: {reason}")]
    InvalidMultiplier {
        multiplier: f64,
        reason: &'static str,
    },

    #[error("unknown average mode '{0}' (expected simple, exponential or weighted)")]
    UnknownAverageMode(String),

    #[error("unknown price source '{0}'")]
    UnknownPriceSource(String),

    #[error("price source index {0} out of range (0..=7)")]
    PriceSourceIndex(usize),

    #[error("parse study config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("read study config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from loading bars.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("read bars: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {reason}")]
    BadRow { line: u64, reason: String },
}
