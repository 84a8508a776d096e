//! vitalchart CLI
//!
//! Command-line interface for aggregating vital-sign readings:
//! - Aggregate a CSV/JSON export into chart records
//! - Inspect which granularity a dataset would get
//! - Generate a default config file

use anyhow::{bail, Context};
use chrono::TimeZone;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitalchart::aggregation::{DatasetShape, SmartAggregator};
use vitalchart::chart::{raw_records, to_chart_records, ChartRecord};
use vitalchart::config::{generate_default_config, parse_timezone, Config, LoggingConfig};
use vitalchart::{ingest, Granularity};

#[derive(Parser)]
#[command(name = "vitalchart")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Adaptive aggregation of vital-sign readings for charting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// IANA time zone for calendar boundaries (default: config, then system)
    #[arg(long, global = true)]
    pub timezone: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate readings into chart records
    Aggregate {
        /// CSV or JSON file with readings
        path: PathBuf,
        /// Force a granularity (none, daily, weekly, biweekly, monthly)
        #[arg(short, long)]
        period: Option<String>,
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show which granularity a dataset would get
    Period {
        /// CSV or JSON file with readings
        path: PathBuf,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let zone = match &cli.timezone {
        Some(name) => Some(parse_timezone(name)?),
        None => config.display.tz()?,
    };
    let thresholds = config.aggregation.thresholds();

    match zone {
        Some(tz) => {
            tracing::debug!(timezone = tz.name(), "Using configured time zone");
            run(cli.command, SmartAggregator::new(tz).with_thresholds(thresholds))
        }
        None => run(cli.command, SmartAggregator::local().with_thresholds(thresholds)),
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vitalchart={}", logging.level)),
    );

    // Logs go to stderr so stdout stays clean for records
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run<Tz: TimeZone>(command: Commands, aggregator: SmartAggregator<Tz>) -> anyhow::Result<()> {
    match command {
        Commands::Aggregate {
            path,
            period,
            format,
        } => {
            let points = load(&path, aggregator.timezone())?;

            let result = match period.as_deref() {
                Some(p) => match Granularity::from_str(p) {
                    Some(granularity) => aggregator.aggregate_with(&points, granularity),
                    None => bail!(
                        "Invalid period: {}. Use: none, daily, weekly, biweekly, monthly",
                        p
                    ),
                },
                None => aggregator.aggregate(&points),
            };

            // Nothing was bucketed: chart the readings themselves
            let records = if result.is_aggregated() {
                to_chart_records(&result.aggregated_points)
            } else {
                raw_records(&points, aggregator.timezone())
            };

            match format.as_str() {
                "json" => {
                    let body = serde_json::json!({
                        "period": result.period,
                        "description": result.description(),
                        "totalRawPoints": result.total_raw_points,
                        "records": records,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                _ => {
                    println!("{}", result.description());
                    println!();
                    print_table(&records);
                }
            }
        }

        Commands::Period { path } => {
            let points = load(&path, aggregator.timezone())?;

            match DatasetShape::measure(&points, aggregator.timezone()) {
                Some(shape) => {
                    println!("Readings:       {}", points.len());
                    println!("Span:           {:.1} days", shape.span_days);
                    println!(
                        "Busiest day:    {} ({} readings)",
                        shape.busiest_date, shape.peak_daily_count
                    );
                    println!(
                        "Granularity:    {}",
                        shape.granularity(aggregator.thresholds())
                    );
                }
                None => {
                    println!("No readings in {:?}", path);
                    println!("Granularity:    {}", Granularity::None);
                }
            }
        }

        Commands::Config { output } => write_default_config(output.as_deref())?,
    }

    Ok(())
}

fn load<Tz: TimeZone>(path: &Path, tz: &Tz) -> anyhow::Result<Vec<vitalchart::RawPoint>> {
    if !path.exists() {
        bail!("File not found: {:?}", path);
    }
    let points =
        ingest::load_readings(path, tz).with_context(|| format!("reading {:?}", path))?;
    tracing::info!(path = ?path, points = points.len(), "Loaded readings");
    Ok(points)
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let template = generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &template)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", template);
        }
    }

    Ok(())
}

fn print_table(records: &[ChartRecord]) {
    if records.is_empty() {
        println!("No data");
        return;
    }

    // Header
    println!(
        "{:<12} | {:<24} | {:>8} | {:>8} | {:>8} | {:>9} | {:>6}",
        "Date", "Period", "Value", "Min", "Max", "Secondary", "Count"
    );

    // Separator
    println!("{}", "-".repeat(96));

    // Data rows
    for record in records {
        let secondary = record
            .secondary_value
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<12} | {:<24} | {:>8.1} | {:>8.1} | {:>8.1} | {:>9} | {:>6}",
            record.date,
            record.period_label,
            record.value,
            record.min,
            record.max,
            secondary,
            record.count
        );
    }
}
