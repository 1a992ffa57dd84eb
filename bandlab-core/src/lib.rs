//! BandLab Core: a moving-average band study with crossing alerts.
//!
//! - Domain types (bars, price-source selection)
//! - Simple / exponential / weighted moving averages and the `Indicator` trait
//! - The band study: validated config, per-bar calculator with explicit
//!   state, output series, alerts, and a bar-iteration driver
//! - CSV bar loading and CSV/JSON export

pub mod data;
pub mod domain;
pub mod error;
pub mod export;
pub mod indicators;
pub mod study;

pub use error::{ConfigError, DataError};
