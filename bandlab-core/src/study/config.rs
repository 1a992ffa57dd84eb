//! Study configuration: built once, validated, then passed by reference
//! into every per-bar update.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::PriceSource;
use crate::error::ConfigError;
use crate::indicators::AverageMode;

/// Longest window the study accepts.
pub const MAX_LENGTH: usize = 1000;

/// Widest band multiplier the study accepts.
pub const MAX_MULTIPLIER: f64 = 10.0;

/// Band study parameters.
///
/// Missing TOML keys fall back to the defaults: length 14, simple average,
/// multiplier 2.0, close price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudyConfig {
    /// Window size for the main average and the bands.
    pub length: usize,
    pub average_mode: AverageMode,
    /// Band width in standard deviations.
    pub multiplier: f64,
    pub price_source: PriceSource,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            length: 14,
            average_mode: AverageMode::Simple,
            multiplier: 2.0,
            price_source: PriceSource::Close,
        }
    }
}

impl StudyConfig {
    pub fn new(
        length: usize,
        average_mode: AverageMode,
        multiplier: f64,
        price_source: PriceSource,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            length,
            average_mode,
            multiplier,
            price_source,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters the calculator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length == 0 {
            return Err(ConfigError::InvalidLength {
                length: self.length,
                reason: "must be at least 1",
            });
        }
        if self.length > MAX_LENGTH {
            return Err(ConfigError::InvalidLength {
                length: self.length,
                reason: "must be at most 1000",
            });
        }
        if !self.multiplier.is_finite() {
            return Err(ConfigError::InvalidMultiplier {
                multiplier: self.multiplier,
                reason: "must be finite",
            });
        }
        if self.multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier {
                multiplier: self.multiplier,
                reason: "must not be negative",
            });
        }
        if self.multiplier > MAX_MULTIPLIER {
            return Err(ConfigError::InvalidMultiplier {
                multiplier: self.multiplier,
                reason: "must be at most 10",
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Window of the signal line: floor(length / 2). Zero disables the signal.
    pub fn signal_length(&self) -> usize {
        self.length / 2
    }

    /// First index where the main line and bands are defined.
    pub fn first_band_index(&self) -> usize {
        self.length.saturating_sub(1)
    }

    /// First index where the signal line is defined, if it ever is.
    pub fn first_signal_index(&self) -> Option<usize> {
        match self.signal_length() {
            0 => None,
            s => Some(self.first_band_index() + s - 1),
        }
    }

    /// Bars needed before every output is defined.
    pub fn min_bars(&self) -> usize {
        self.first_signal_index()
            .unwrap_or_else(|| self.first_band_index())
            + 1
    }

    /// Short label, e.g. `BANDS(14, SMA, 2, Close)`.
    pub fn label(&self) -> String {
        format!(
            "BANDS({}, {}, {}, {})",
            self.length,
            self.average_mode.abbreviation(),
            self.multiplier,
            self.price_source.label()
        )
    }

    /// Content hash of the configuration (BLAKE3 over canonical JSON).
    ///
    /// Two configs with the same fingerprint produce the same outputs.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::json!({
            "length": self.length,
            "average_mode": self.average_mode.key(),
            "multiplier": self.multiplier,
            "price_source": self.price_source.key(),
        });
        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}
