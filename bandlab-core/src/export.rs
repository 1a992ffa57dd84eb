//! CSV and JSON rendering of a study run.

use serde::Serialize;

use crate::domain::Bar;
use crate::error::DataError;
use crate::study::{AlertEvent, BandSeries, StudyConfig};

/// Format version of the JSON document.
pub const RUN_FORMAT_VERSION: u32 = 1;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn date_cell(bars: &[Bar], index: usize) -> String {
    bars.get(index)
        .map(|bar| bar.date.to_string())
        .unwrap_or_default()
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, DataError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One row per bar; undefined values are empty cells.
pub fn series_csv(bars: &[Bar], prices: &[f64], series: &BandSeries) -> Result<String, DataError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "index",
        "date",
        "price",
        "main",
        "signal",
        "upper",
        "lower",
        "std_dev",
        "highlight",
    ])?;
    for (i, price) in prices.iter().enumerate() {
        wtr.write_record([
            i.to_string(),
            date_cell(bars, i),
            price.to_string(),
            cell(series.main_at(i)),
            cell(series.signal_at(i)),
            cell(series.upper_at(i)),
            cell(series.lower_at(i)),
            cell(series.std_dev_at(i)),
            series
                .highlight
                .get(i)
                .copied()
                .unwrap_or(false)
                .to_string(),
        ])?;
    }
    into_string(wtr)
}

/// One row per alert.
pub fn alerts_csv(bars: &[Bar], alerts: &[AlertEvent]) -> Result<String, DataError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["index", "date", "alert_id", "message"])?;
    for alert in alerts {
        wtr.write_record([
            alert.bar_index.to_string(),
            date_cell(bars, alert.bar_index),
            alert.kind.id().to_string(),
            alert.message().to_string(),
        ])?;
    }
    into_string(wtr)
}

#[derive(Serialize)]
struct RunPoint {
    index: usize,
    date: Option<String>,
    price: f64,
    main: Option<f64>,
    signal: Option<f64>,
    upper: Option<f64>,
    lower: Option<f64>,
    std_dev: Option<f64>,
    highlight: bool,
}

#[derive(Serialize)]
struct RunAlert<'a> {
    index: usize,
    alert_id: u8,
    message: &'a str,
}

#[derive(Serialize)]
struct RunDocument<'a> {
    version: u32,
    label: String,
    fingerprint: String,
    config: &'a StudyConfig,
    points: Vec<RunPoint>,
    alerts: Vec<RunAlert<'a>>,
}

/// Pretty JSON document with the config, every bar's values and the alerts.
pub fn run_json(
    config: &StudyConfig,
    bars: &[Bar],
    prices: &[f64],
    series: &BandSeries,
    alerts: &[AlertEvent],
) -> serde_json::Result<String> {
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| RunPoint {
            index: i,
            date: bars.get(i).map(|bar| bar.date.to_string()),
            price,
            main: series.main_at(i),
            signal: series.signal_at(i),
            upper: series.upper_at(i),
            lower: series.lower_at(i),
            std_dev: series.std_dev_at(i),
            highlight: series.highlight.get(i).copied().unwrap_or(false),
        })
        .collect();
    let alerts = alerts
        .iter()
        .map(|alert| RunAlert {
            index: alert.bar_index,
            alert_id: alert.kind.id(),
            message: alert.message(),
        })
        .collect();
    serde_json::to_string_pretty(&RunDocument {
        version: RUN_FORMAT_VERSION,
        label: config.label(),
        fingerprint: config.fingerprint(),
        config,
        points,
        alerts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSource;
    use crate::indicators::{make_bars, AverageMode};
    use crate::study::BandCalculator;

    fn run() -> (StudyConfig, Vec<Bar>, Vec<f64>, crate::study::BandRun) {
        let config = StudyConfig::new(2, AverageMode::Simple, 0.5, PriceSource::Close).unwrap();
        let bars = make_bars(&[1.0, 1.0, 5.0]);
        let prices = config.price_source.extract(&bars);
        let run = BandCalculator::new(config.clone()).unwrap().compute(&prices);
        (config, bars, prices, run)
    }

    #[test]
    fn series_csv_leaves_warm_up_cells_empty() {
        let (_, bars, prices, run) = run();
        let csv = series_csv(&bars, &prices, &run.series).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "index,date,price,main,signal,upper,lower,std_dev,highlight");
        assert_eq!(lines[1], "0,2024-01-02,1,,,,,,false");
        assert!(lines[2].starts_with("1,2024-01-03,1,1,1,1,1,0,"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn alerts_csv_rows() {
        let (_, bars, _, run) = run();
        assert_eq!(run.alerts.len(), 1);
        let csv = alerts_csv(&bars, &run.alerts).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "2,2024-01-04,1,Price crossed above upper band");
    }

    #[test]
    fn run_json_document() {
        let (config, bars, prices, run) = run();
        let json = run_json(&config, &bars, &prices, &run.series, &run.alerts).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["config"]["average_mode"], "simple");
        assert!(value["points"][0]["main"].is_null());
        assert_eq!(value["points"][2]["highlight"], true);
        assert_eq!(value["alerts"][0]["alert_id"], 1);
    }
}
