use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::LoggingSettings;
use core_types::{Granularity, MetricLabel};
use dashboard::panel::{format_count, format_currency, format_number};
use dashboard::{
    Dashboard, DatePreset, ForecastPanel, GeographyPanel, Interaction, KpiPanel, Notice, NoticeLevel, Panel,
    Session, TrendPanel,
};
use forecaster::PointKind;
use serde::Serialize;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// The main entry point for the sales analytics dashboard.
fn main() -> Result<()> {
    // Load SALES__* overrides from a .env file when one exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _guard = init_logging(&config.logging)?;

    let mut dashboard = Dashboard::open(&config).context("Failed to open the sales dataset")?;
    let mut session = dashboard.start_session(Local::now().date_naive())?;
    tracing::info!(
        command = cli.command.name(),
        rows = dashboard.table().len(),
        json = cli.json,
        "Dispatching command."
    );

    match cli.command {
        Commands::Filters => print_filters(&dashboard, &session, cli.json),
        Commands::Kpis(selection) => {
            selection.apply(&mut session)?;
            let panel = dashboard.kpi_cards(&session);
            emit("kpis", &panel, cli.json, print_kpis)
        }
        Commands::Trend(args) => {
            args.selection.apply(&mut session)?;
            session.apply(Interaction::SetGranularity(args.interval.unwrap_or_default()));
            let panel = dashboard.trend(&session);
            emit("trend", &panel, cli.json, print_trend)
        }
        Commands::Geo(selection) => {
            selection.apply(&mut session)?;
            let panel = dashboard.geography(&session);
            emit("geography", &panel, cli.json, print_geography)
        }
        Commands::Forecast(args) => {
            args.selection.apply(&mut session)?;
            if let Some(horizon) = args.horizon {
                session.apply(Interaction::SetHorizon(horizon));
            }
            if args.refresh {
                let path = dashboard.pipeline().artifact_path(None);
                tracing::info!(path = %path.display(), "Regenerating forecast artifact.");
                dashboard
                    .refresh_forecast()
                    .context("Failed to regenerate the forecast artifact")?;
                tracing::info!(path = %path.display(), "Forecast artifact regenerated.");
            }
            let panel = dashboard.forecast(&session);
            emit("forecast", &panel, cli.json, print_forecast)
        }
        Commands::Overview(args) => {
            args.selection.apply(&mut session)?;
            session.apply(Interaction::SetGranularity(args.interval.unwrap_or_default()));
            if let Some(horizon) = args.horizon {
                session.apply(Interaction::SetHorizon(horizon));
            }
            let frame = dashboard.render(&session);
            log_notice("kpis", &frame.kpis);
            log_notice("trend", &frame.trend);
            log_notice("geography", &frame.geography);
            log_notice("forecast", &frame.forecast);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                println!("{}\n{}\n", frame.summary, frame.metric_caption);
                print_panel("KPI Summary Cards", &frame.kpis, print_kpis);
                print_panel("Time-Series Trends", &frame.trend, print_trend);
                print_panel("Geographic Performance", &frame.geography, print_geography);
                print_panel("Forecast Outlook", &frame.forecast, print_forecast);
            }
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Interactive sales analytics: KPIs, trends, geography and forecasts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print panels as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available countries, statuses and date presets.
    Filters,
    /// KPI summary cards with period-over-period changes.
    Kpis(SelectionArgs),
    /// Period totals with changes between periods.
    Trend(TrendArgs),
    /// Per-country totals and top/bottom rankings.
    Geo(SelectionArgs),
    /// Actuals and projections from the offline forecast artifact.
    Forecast(ForecastArgs),
    /// Every panel at once.
    Overview(OverviewArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Filters => "filters",
            Commands::Kpis(_) => "kpis",
            Commands::Trend(_) => "trend",
            Commands::Geo(_) => "geo",
            Commands::Forecast(_) => "forecast",
            Commands::Overview(_) => "overview",
        }
    }
}

/// The sidebar filters, shared by every panel command.
#[derive(Args)]
struct SelectionArgs {
    /// Quick range, e.g. "Last 90 Days", "90d" or "custom".
    #[arg(long)]
    preset: Option<String>,

    /// Start of a custom range (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of a custom range (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Restrict to a country; repeat for several. Omit for all.
    #[arg(long = "country")]
    countries: Vec<String>,

    /// Restrict to an order status; repeat for several.
    #[arg(long = "status")]
    statuses: Vec<String>,

    /// The primary metric.
    #[arg(long, value_enum)]
    metric: Option<MetricLabel>,
}

#[derive(Args)]
struct TrendArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Aggregation interval (default: month).
    #[arg(long, value_enum)]
    interval: Option<Granularity>,
}

#[derive(Args)]
struct ForecastArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Months of projection to show; must be one of the configured options.
    #[arg(long)]
    horizon: Option<u32>,

    /// Regenerate the artifact before reading it.
    #[arg(long)]
    refresh: bool,
}

#[derive(Args)]
struct OverviewArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Aggregation interval of the trend panel (default: month).
    #[arg(long, value_enum)]
    interval: Option<Granularity>,

    /// Months of projection in the forecast panel.
    #[arg(long)]
    horizon: Option<u32>,
}

impl SelectionArgs {
    /// Replays the flags as interactions, preset first so explicit dates win.
    fn apply(&self, session: &mut Session) -> Result<()> {
        if let Some(preset) = &self.preset {
            let preset: DatePreset = preset.parse()?;
            session.apply(Interaction::SelectPreset(preset));
        }
        if self.from.is_some() || self.to.is_some() {
            let current = session.filters();
            let from = self.from.unwrap_or(current.start_date);
            let to = self.to.unwrap_or(current.end_date);
            session.apply(Interaction::SetDateRange(from, to));
        }
        if !self.countries.is_empty() {
            session.apply(Interaction::SetCountries(self.countries.clone()));
        }
        if !self.statuses.is_empty() {
            session.apply(Interaction::SetStatuses(self.statuses.clone()));
        }
        if let Some(metric) = self.metric {
            session.apply(Interaction::SetMetric(metric));
        }

        let filters = session.filters();
        tracing::debug!(
            start = %filters.start_date,
            end = %filters.end_date,
            countries = filters.countries.len(),
            statuses = filters.statuses.len(),
            metric = %filters.metric,
            "Applied selection."
        );
        Ok(())
    }
}

// ==============================================================================
// Logging
// ==============================================================================

/// Console logs go to stderr so `--json` output stays clean. With a
/// configured directory a second, non-rolling file layer is added.
fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
    };
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter());

    match &settings.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory).with_context(|| {
                format!("Failed to create log directory {}", directory.display())
            })?;
            let appender = tracing_appender::rolling::never(directory, "sales-dashboard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(console)
                .with(file)
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(console).try_init()?;
            Ok(None)
        }
    }
}

// ==============================================================================
// Rendering
// ==============================================================================

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn emit<T: Serialize>(name: &str, panel: &Panel<T>, json: bool, print: fn(&T)) -> Result<()> {
    log_notice(name, panel);
    if json {
        println!("{}", serde_json::to_string_pretty(panel)?);
    } else {
        match panel {
            Panel::Ready(content) => print(content),
            Panel::Notice(notice) => print_notice(notice),
        }
    }
    Ok(())
}

/// Mirrors a panel notice into the log at a matching level.
fn log_notice<T>(panel_name: &str, panel: &Panel<T>) {
    let Panel::Notice(notice) = panel else {
        return;
    };
    let detail = notice.detail.as_deref().unwrap_or_default();
    match notice.level {
        NoticeLevel::Info => {
            tracing::info!(panel = panel_name, message = %notice.message, "Panel is empty.")
        }
        NoticeLevel::Warning => {
            tracing::warn!(panel = panel_name, message = %notice.message, detail, "Panel degraded.")
        }
        NoticeLevel::Error => {
            tracing::error!(panel = panel_name, message = %notice.message, detail, "Panel failed.")
        }
    }
}

fn print_panel<T>(title: &str, panel: &Panel<T>, print: fn(&T)) {
    println!("== {title} ==");
    match panel {
        Panel::Ready(content) => print(content),
        Panel::Notice(notice) => print_notice(notice),
    }
    println!();
}

fn print_notice(notice: &Notice) {
    let level = match notice.level {
        NoticeLevel::Info => "INFO",
        NoticeLevel::Warning => "WARNING",
        NoticeLevel::Error => "ERROR",
    };
    println!("[{level}] {}", notice.message);
    if let Some(detail) = &notice.detail {
        println!("  {detail}");
    }
}

fn print_filters(dashboard: &Dashboard, session: &Session, json: bool) -> Result<()> {
    let bounds = dashboard.table().date_bounds();
    let presets: Vec<&str> = DatePreset::ALL.iter().map(DatePreset::label).collect();
    if json {
        let value = serde_json::json!({
            "countries": session.country_options(),
            "statuses": session.status_options(),
            "first_order": bounds.map(|(first, _)| first),
            "last_order": bounds.map(|(_, last)| last),
            "presets": presets,
            "horizons": session.horizon_options(),
            "defaults": session.filters(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let mut table = new_table(vec!["Filter", "Options"]);
    table.add_row(vec!["Countries".to_string(), session.country_options().join(", ")]);
    table.add_row(vec!["Statuses".to_string(), session.status_options().join(", ")]);
    table.add_row(vec![
        "Order dates".to_string(),
        bounds
            .map(|(first, last)| format!("{first} to {last}"))
            .unwrap_or_else(|| "none".to_string()),
    ]);
    table.add_row(vec!["Presets".to_string(), presets.join(", ")]);
    let horizons: Vec<String> = session.horizon_options().iter().map(u32::to_string).collect();
    table.add_row(vec!["Forecast horizons".to_string(), horizons.join(", ")]);
    println!("{table}");

    let filters = session.filters();
    println!(
        "Default selection: {} to {} ({}), statuses: {}",
        filters.start_date,
        filters.end_date,
        session.preset(),
        filters.statuses.join(", ")
    );
    Ok(())
}

fn print_kpis(panel: &KpiPanel) {
    println!("{}", panel.caption);
    println!("{}", panel.comparison_caption);
    let mut table = new_table(vec!["Metric", "Value", "Change"]);
    for card in &panel.cards {
        let label = if card.focus {
            format!("{} (focus)", card.label)
        } else {
            card.label.clone()
        };
        table.add_row(vec![label, card.value.clone(), card.delta.clone().unwrap_or_default()]);
    }
    println!("{table}");
    if let Some(note) = panel.history_note {
        println!("{note}");
    }
}

fn print_trend(panel: &TrendPanel) {
    println!("{}", panel.title);
    let mut table = new_table(vec!["Period", "Sales", "Profit", "Quantity", "Margin %", "Change"]);
    for entry in &panel.rows {
        let row = &entry.row;
        table.add_row(vec![
            row.period_start.to_string(),
            format_currency(row.sales),
            format_currency(row.profit),
            format_number(row.quantity as f64),
            format!("{:.1}%", row.profit_margin),
            format!("{:+.0}", entry.delta),
        ]);
    }
    println!("{table}");
    if let (Some(peak), Some(trough)) = (panel.peak, panel.trough) {
        println!("Peak: {peak}  Trough: {trough}");
    }
}

fn print_geography(panel: &GeographyPanel) {
    println!("{}", panel.title);
    let mut table = new_table(vec!["Country", "Sales", "Profit", "Margin %", "Quantity", "Customers"]);
    for row in &panel.rows {
        table.add_row(vec![
            row.country.clone(),
            format_currency(row.sales),
            format_currency(row.profit),
            format!("{:.1}%", row.profit_margin),
            format_number(row.quantity as f64),
            row.unique_customers.map(format_count).unwrap_or_default(),
        ]);
    }
    println!("{table}");

    for (caption, rows) in [(&panel.top_caption, &panel.top), (&panel.bottom_caption, &panel.bottom)] {
        println!("{caption}");
        let mut ranking = new_table(vec!["Country", "Sales", "Profit", "Margin %"]);
        for row in rows {
            ranking.add_row(vec![
                row.country.clone(),
                format_currency(row.sales),
                format_currency(row.profit),
                format!("{:.1}%", row.profit_margin),
            ]);
        }
        println!("{ranking}");
    }
}

fn print_forecast(panel: &ForecastPanel) {
    println!("Forecast horizon: {} months", panel.horizon);
    let mut table = new_table(vec!["Period", "Type", "Value", "Lower", "Upper"]);
    let points = panel.segments.actual.iter().chain(&panel.segments.forecast);
    for point in points {
        let kind = match point.kind {
            PointKind::Actual => "actual",
            PointKind::Forecast => "forecast",
        };
        table.add_row(vec![
            point.period_start.format("%Y-%m").to_string(),
            kind.to_string(),
            format_number(point.value),
            format_number(point.lower_bound),
            format_number(point.upper_bound),
        ]);
    }
    println!("{table}");
    println!("{}", panel.insights);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommands_report_their_names() {
        let cli = Cli::try_parse_from(["sales-dashboard", "forecast", "--refresh", "--horizon", "6"])
            .unwrap();
        assert_eq!(cli.command.name(), "forecast");
        let Commands::Forecast(args) = cli.command else {
            panic!("expected the forecast command");
        };
        assert!(args.refresh);
        assert_eq!(args.horizon, Some(6));

        let cli = Cli::try_parse_from(["sales-dashboard", "--json", "geo", "--country", "USA"]).unwrap();
        assert_eq!(cli.command.name(), "geo");
        assert!(cli.json);
    }

    #[test]
    fn notices_are_logged_at_every_level() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            log_notice("forecast", &Panel::<()>::Notice(Notice::warning("No forecast yet.")));
            log_notice("forecast", &Panel::<()>::Notice(Notice::error("Load failed.", "bad header")));
            log_notice("kpis", &Panel::Ready(()));
        });
    }
}
