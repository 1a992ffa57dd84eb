//! Band crossing alerts and the sinks that receive them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which band the price crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    CrossedAboveUpper,
    CrossedBelowLower,
}

impl AlertKind {
    /// Host alert number.
    pub fn id(self) -> u8 {
        match self {
            AlertKind::CrossedAboveUpper => 1,
            AlertKind::CrossedBelowLower => 2,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AlertKind::CrossedAboveUpper => "Price crossed above upper band",
            AlertKind::CrossedBelowLower => "Price crossed below lower band",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One alert raised on one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertEvent {
    pub bar_index: usize,
    pub kind: AlertKind,
}

impl AlertEvent {
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Price and band values of one bar, as seen by the crossing check.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BandSample {
    pub price: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Crossings between the previous bar and the current one.
///
/// NaN on either side never fires.
pub(crate) fn crossings(prev: BandSample, curr: BandSample) -> impl Iterator<Item = AlertKind> {
    let above = curr.price > curr.upper && prev.price <= prev.upper;
    let below = curr.price < curr.lower && prev.price >= prev.lower;
    [
        above.then_some(AlertKind::CrossedAboveUpper),
        below.then_some(AlertKind::CrossedBelowLower),
    ]
    .into_iter()
    .flatten()
}

/// Receiver for alerts raised while driving the study.
pub trait AlertSink {
    fn on_alert(&mut self, alert: AlertEvent);
}

impl AlertSink for Vec<AlertEvent> {
    fn on_alert(&mut self, alert: AlertEvent) {
        self.push(alert);
    }
}

/// Discards alerts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AlertSink for NullSink {
    fn on_alert(&mut self, _alert: AlertEvent) {}
}

/// Emits each alert as a structured `tracing` event.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    pub label: String,
}

impl LogSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl AlertSink for LogSink {
    fn on_alert(&mut self, alert: AlertEvent) {
        tracing::info!(
            study = %self.label,
            bar_index = alert.bar_index,
            alert_id = alert.kind.id(),
            "{}",
            alert.message()
        );
    }
}
