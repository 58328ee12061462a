use crate::panel::{Notice, Panel};
use analytics::{AnalyticsEngine, PeriodDelta};
use chrono::NaiveDate;
use core_types::{Granularity, MetricLabel};
use data_store::SalesTable;
use serde::Serialize;

pub const NO_TREND_MESSAGE: &str = "No data available for the selected filters.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPanel {
    /// e.g. "Revenue Trend (Monthly)".
    pub title: String,
    pub metric: MetricLabel,
    pub granularity: Granularity,
    pub rows: Vec<PeriodDelta>,
    pub peak: Option<NaiveDate>,
    pub trough: Option<NaiveDate>,
}

/// Period totals of `filtered` with per-period changes of the selected metric.
pub fn build_trend_panel(
    filtered: &SalesTable,
    metric: MetricLabel,
    granularity: Granularity,
) -> Panel<TrendPanel> {
    let rows = AnalyticsEngine::new().trend_with_deltas(filtered, granularity, metric.column());
    if rows.is_empty() {
        return Panel::Notice(Notice::warning(NO_TREND_MESSAGE));
    }

    let value = |d: &&PeriodDelta| d.row.metric(metric.column());
    // First occurrence wins on ties.
    let peak = rows
        .iter()
        .reduce(|best, d| if value(&d) > value(&best) { d } else { best })
        .map(|d| d.row.period_start);
    let trough = rows
        .iter()
        .reduce(|best, d| if value(&d) < value(&best) { d } else { best })
        .map(|d| d.row.period_start);

    Panel::Ready(TrendPanel {
        title: format!("{metric} Trend ({granularity})"),
        metric,
        granularity,
        rows,
        peak,
        trough,
    })
}
