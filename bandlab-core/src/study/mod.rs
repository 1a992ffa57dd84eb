//! The band study: configuration, calculator, explicit state, outputs,
//! alerts and the bar-iteration driver.

pub mod alert;
pub mod bands;
pub mod calculator;
pub mod config;
pub mod driver;
pub mod output;
pub mod state;

pub use alert::{AlertEvent, AlertKind, AlertSink, LogSink, NullSink};
pub use bands::{BandIndicator, BandLine};
pub use calculator::{BandCalculator, BandRun, BarUpdate};
pub use config::{StudyConfig, MAX_LENGTH, MAX_MULTIPLIER};
pub use driver::BandStudy;
pub use output::{BandPoint, BandSeries};
pub use state::{BandState, SmoothingCarry};
