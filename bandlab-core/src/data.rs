//! CSV bar loading.
//!
//! Expected header: `date,open,high,low,close[,volume]`, dates as `YYYY-MM-DD`.
//! Extra columns are ignored. Rows must be in ascending date order.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::Bar;
use crate::error::DataError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

/// Read bars from any CSV source.
///
/// Rows with an inverted range (high below low, or open/close outside it)
/// are rejected. Void rows (a NaN price) are kept and logged; the study
/// treats them as missing data.
pub fn bars_from_reader<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut bars: Vec<Bar> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row: CsvRow = record.deserialize(Some(&headers))?;
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
            DataError::BadRow {
                line,
                reason: format!("date '{}': {e}", row.date),
            }
        })?;
        if let Some(prev) = bars.last() {
            if date <= prev.date {
                return Err(DataError::BadRow {
                    line,
                    reason: format!("date {date} is not after {}", prev.date),
                });
            }
        }
        let volume = row.volume.unwrap_or(0.0).max(0.0) as u64;
        let bar = Bar::new(date, row.open, row.high, row.low, row.close, volume);
        if bar.is_void() {
            tracing::warn!(line, date = %date, "void bar (NaN price)");
        } else if !bar.is_sane() {
            return Err(DataError::BadRow {
                line,
                reason: format!(
                    "inverted range: open {} high {} low {} close {}",
                    bar.open, bar.high, bar.low, bar.close
                ),
            });
        }
        bars.push(bar);
    }
    Ok(bars)
}

/// Read bars from a CSV file.
pub fn load_bars_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path)?;
    let bars = bars_from_reader(file)?;
    tracing::debug!(path = %path.display(), bars = bars.len(), "loaded bars");
    Ok(bars)
}
