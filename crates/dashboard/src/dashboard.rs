use crate::cache::{Memo, content_key};
use crate::error::DashboardError;
use crate::forecast_view::{ForecastPanel, build_forecast_panel};
use crate::geography::{GeographyPanel, build_geography_panel};
use crate::kpi_cards::{KpiPanel, build_kpi_panel};
use crate::panel::{Panel, format_count};
use crate::session::Session;
use crate::trend::{TrendPanel, build_trend_panel};
use chrono::NaiveDate;
use configuration::{Config, DashboardSettings};
use data_store::{SalesStore, SalesTable};
use forecaster::{ForecastError, ForecastPipeline, ForecastPoint};
use serde::Serialize;

/// Everything one interaction renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub summary: String,
    pub metric_caption: String,
    pub kpis: Panel<KpiPanel>,
    pub trend: Panel<TrendPanel>,
    pub geography: Panel<GeographyPanel>,
    pub forecast: Panel<ForecastPanel>,
}

/// The loaded dataset plus memoized panel builders.
///
/// Every panel is a pure function of the dataset and the session, so the
/// caches may be dropped at any time without changing what is rendered.
pub struct Dashboard {
    table: SalesTable,
    fingerprint: String,
    pipeline: ForecastPipeline,
    settings: DashboardSettings,
    kpis: Memo<Panel<KpiPanel>>,
    trends: Memo<Panel<TrendPanel>>,
    geography: Memo<Panel<GeographyPanel>>,
    forecasts: Memo<Vec<ForecastPoint>>,
}

impl Dashboard {
    pub fn new(table: SalesTable, pipeline: ForecastPipeline, settings: DashboardSettings) -> Self {
        let fingerprint = content_key(&table).unwrap_or_default();
        let capacity = settings.cache_capacity;
        tracing::info!(rows = table.len(), capacity, "Dashboard ready.");
        Self {
            table,
            fingerprint,
            pipeline,
            settings,
            kpis: Memo::new(capacity),
            trends: Memo::new(capacity),
            geography: Memo::new(capacity),
            forecasts: Memo::new(capacity),
        }
    }

    /// Loads the dataset described by `config`.
    pub fn open(config: &Config) -> Result<Self, DashboardError> {
        let store = SalesStore::new(config.data.clone());
        let table = store.load()?;
        let pipeline = ForecastPipeline::new(store, config.forecast.clone());
        Ok(Self::new(table, pipeline, config.dashboard.clone()))
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    pub fn pipeline(&self) -> &ForecastPipeline {
        &self.pipeline
    }

    /// A session initialised from the dataset and the dashboard settings.
    pub fn start_session(&self, today: NaiveDate) -> Result<Session, DashboardError> {
        Ok(Session::new(&self.table, &self.settings, today)?)
    }

    pub fn filtered(&self, session: &Session) -> SalesTable {
        session.filters().apply_to(&self.table)
    }

    pub fn kpi_cards(&mut self, session: &Session) -> Panel<KpiPanel> {
        let Self {
            table,
            fingerprint,
            kpis,
            ..
        } = self;
        let filters = session.filters();
        kpis.get_or_compute(&(fingerprint.as_str(), filters), || {
            build_kpi_panel(&filters.apply_to(table), table, filters.metric)
        })
    }

    pub fn trend(&mut self, session: &Session) -> Panel<TrendPanel> {
        let Self {
            table,
            fingerprint,
            trends,
            ..
        } = self;
        let filters = session.filters();
        let granularity = session.granularity();
        trends.get_or_compute(&(fingerprint.as_str(), filters, granularity), || {
            build_trend_panel(&filters.apply_to(table), filters.metric, granularity)
        })
    }

    pub fn geography(&mut self, session: &Session) -> Panel<GeographyPanel> {
        let Self {
            table,
            fingerprint,
            geography,
            ..
        } = self;
        let filters = session.filters();
        geography.get_or_compute(&(fingerprint.as_str(), filters), || {
            build_geography_panel(&filters.apply_to(table), filters.metric)
        })
    }

    /// The forecast panel, generating the artifact on first use when it is missing.
    pub fn forecast(&mut self, session: &Session) -> Panel<ForecastPanel> {
        let loaded = self.load_forecast(false);
        build_forecast_panel(loaded.as_deref(), session.filters(), session.horizon())
    }

    /// Regenerates the artifact and drops every cached forecast.
    pub fn refresh_forecast(&mut self) -> Result<(), ForecastError> {
        self.forecasts.clear();
        self.load_forecast(true).map(|_| ())
    }

    fn load_forecast(&mut self, force_refresh: bool) -> Result<Vec<ForecastPoint>, ForecastError> {
        let Self {
            pipeline,
            forecasts,
            ..
        } = self;
        let path = pipeline.artifact_path(None);
        let loaded = forecasts.get_or_try_compute(&path, || {
            pipeline.load_forecast_results(Some(&path), force_refresh)
        });
        if let Err(err) = &loaded {
            tracing::warn!(path = %path.display(), error = %err, "Forecast unavailable.");
        }
        loaded
    }

    /// Renders every panel for the current session.
    pub fn render(&mut self, session: &Session) -> Frame {
        let filters = session.filters();
        let shown = self.filtered(session).len();
        let summary = format!(
            "Showing {} rows from {} total orders between {} and {}.",
            format_count(shown),
            format_count(self.table.len()),
            filters.start_date,
            filters.end_date
        );
        let metric_caption = format!(
            "Primary metric: {} (column `{}`)",
            filters.metric,
            filters.metric_column()
        );

        Frame {
            summary,
            metric_caption,
            kpis: self.kpi_cards(session),
            trend: self.trend(session),
            geography: self.geography(session),
            forecast: self.forecast(session),
        }
    }
}
