use anyhow::{Context, Result};
use clap::Parser;
use configuration::MAX_HORIZON;
use data_store::SalesStore;
use forecaster::{ForecastPipeline, format_cli_message};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Regenerates the offline sales forecast artifact.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write the artifact instead of `forecast.artifact_path`.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Canonical column to forecast (e.g. "Sales").
    #[arg(long)]
    metric: Option<String>,
    /// Months to project past the last training month.
    #[arg(long)]
    horizon: Option<u32>,
    /// Confidence level of the band; 0.95 uses z = 1.96.
    #[arg(long)]
    confidence_level: Option<f64>,
    /// Moving-average window in months.
    #[arg(long)]
    window: Option<usize>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut settings = config.forecast.clone();
    if let Some(metric) = cli.metric {
        settings.metric = metric;
    }
    if let Some(horizon) = cli.horizon {
        anyhow::ensure!(
            horizon <= MAX_HORIZON,
            "--horizon must be at most {MAX_HORIZON} months, got {horizon}"
        );
        settings.horizon = horizon;
    }
    if let Some(level) = cli.confidence_level {
        anyhow::ensure!(
            level > 0.0 && level < 1.0,
            "--confidence-level must lie strictly between 0 and 1, got {level}"
        );
        settings.confidence_level = level;
    }
    if let Some(window) = cli.window {
        settings.window = window;
    }

    let pipeline = ForecastPipeline::new(SalesStore::new(config.data.clone()), settings);
    let path = pipeline
        .generate(cli.output.as_deref())
        .context("Forecast generation failed")?;

    println!("{}", format_cli_message(&path));
    Ok(())
}
