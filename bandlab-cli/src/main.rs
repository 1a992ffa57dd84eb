//! BandLab CLI: run the band study over a CSV bar file.
//!
//! Commands:
//! - `compute`: load bars, evaluate the study, print or save the outputs
//! - `default-config`: print the default TOML configuration
//! - `sources`: list price sources and averaging modes

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bandlab_core::data::load_bars_csv;
use bandlab_core::domain::PriceSource;
use bandlab_core::export::{alerts_csv, run_json, series_csv};
use bandlab_core::indicators::AverageMode;
use bandlab_core::study::{AlertEvent, AlertSink, BandStudy, LogSink, StudyConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "bandlab",
    about = "BandLab CLI: moving-average bands with crossing alerts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the study over a CSV file of daily bars.
    Compute {
        /// CSV with header date,open,high,low,close[,volume].
        #[arg(long)]
        bars: PathBuf,

        /// TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Window length (1..=1000).
        #[arg(long)]
        length: Option<usize>,

        /// Averaging mode: simple, exponential, weighted (or sma/ema/wma).
        #[arg(long)]
        mode: Option<AverageMode>,

        /// Band width in standard deviations (0..=10).
        #[arg(long)]
        multiplier: Option<f64>,

        /// Price source: close, open, high, low, hl2, hlc3, hlcc4, ohlc4.
        #[arg(long)]
        source: Option<PriceSource>,

        /// Write series.csv and alerts.csv here instead of printing to stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write run.json (requires --out).
        #[arg(long, default_value_t = false, requires = "out")]
        json: bool,
    },
    /// Print the default configuration as TOML.
    DefaultConfig,
    /// List price sources and averaging modes.
    Sources,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone, Copy)]
struct Overrides {
    length: Option<usize>,
    mode: Option<AverageMode>,
    multiplier: Option<f64>,
    source: Option<PriceSource>,
}

impl Overrides {
    fn apply(self, mut config: StudyConfig) -> StudyConfig {
        if let Some(length) = self.length {
            config.length = length;
        }
        if let Some(mode) = self.mode {
            config.average_mode = mode;
        }
        if let Some(multiplier) = self.multiplier {
            config.multiplier = multiplier;
        }
        if let Some(source) = self.source {
            config.price_source = source;
        }
        config
    }
}

/// Forwards each alert to the log and keeps it for export.
struct CollectingSink {
    log: LogSink,
    alerts: Vec<AlertEvent>,
}

impl AlertSink for CollectingSink {
    fn on_alert(&mut self, alert: AlertEvent) {
        self.log.on_alert(alert);
        self.alerts.push(alert);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bandlab=info,bandlab_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            bars,
            config,
            length,
            mode,
            multiplier,
            source,
            out,
            json,
        } => {
            let overrides = Overrides {
                length,
                mode,
                multiplier,
                source,
            };
            run_compute(&bars, config.as_deref(), overrides, out.as_deref(), json)
        }
        Commands::DefaultConfig => {
            print!("{}", StudyConfig::default().to_toml()?);
            Ok(())
        }
        Commands::Sources => {
            print_sources();
            Ok(())
        }
    }
}

fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<StudyConfig> {
    let base = match path {
        Some(path) => StudyConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => StudyConfig::default(),
    };
    let config = overrides.apply(base);
    config.validate().context("invalid study configuration")?;
    Ok(config)
}

fn run_compute(
    bars_path: &Path,
    config_path: Option<&Path>,
    overrides: Overrides,
    out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = resolve_config(config_path, overrides)?;
    let bars = load_bars_csv(bars_path)
        .with_context(|| format!("loading bars from {}", bars_path.display()))?;

    let label = config.label();
    if bars.len() < config.min_bars() {
        tracing::warn!(
            study = %label,
            bars = bars.len(),
            needed = config.min_bars(),
            "not enough bars for every output to be defined"
        );
    }

    let mut study = BandStudy::new(config)?;
    let mut sink = CollectingSink {
        log: LogSink::new(label.clone()),
        alerts: Vec::new(),
    };
    study.recompute(&bars, &mut sink);
    tracing::info!(
        study = %label,
        bars = study.len(),
        defined = study.series().defined_count(),
        alerts = sink.alerts.len(),
        "study computed"
    );

    let series = series_csv(study.bars(), study.prices(), study.series())?;
    let Some(dir) = out else {
        print!("{series}");
        return Ok(());
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    write_file(&dir.join("series.csv"), &series)?;
    write_file(
        &dir.join("alerts.csv"),
        &alerts_csv(study.bars(), &sink.alerts)?,
    )?;
    if json {
        let doc = run_json(
            study.config(),
            study.bars(),
            study.prices(),
            study.series(),
            &sink.alerts,
        )?;
        write_file(&dir.join("run.json"), &doc)?;
    }

    println!("{label}");
    println!("  Bars:    {}", study.len());
    println!("  Defined: {}", study.series().defined_count());
    println!("  Alerts:  {}", sink.alerts.len());
    println!("Outputs saved to: {}", dir.display());
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

fn print_sources() {
    println!("Price sources:");
    for source in PriceSource::ALL {
        println!("  {:>2}  {:<6} {}", source.index(), source.key(), source.label());
    }
    println!("Averaging modes:");
    for mode in AverageMode::ALL {
        println!("      {:<12} {}", mode.key(), mode.abbreviation());
    }
}
