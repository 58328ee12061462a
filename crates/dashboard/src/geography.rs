use crate::panel::{Notice, Panel};
use analytics::{AnalyticsEngine, CountryRow, rank_countries};
use core_types::MetricLabel;
use data_store::SalesTable;
use serde::Serialize;

/// Countries shown in each ranking table.
pub const RANKING_SIZE: usize = 5;

pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";
pub const NO_GEO_MESSAGE: &str = "No geographic data available for the selected filters.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographyPanel {
    /// e.g. "Revenue by Country".
    pub title: String,
    pub metric: MetricLabel,
    pub rows: Vec<CountryRow>,
    pub top: Vec<CountryRow>,
    pub bottom: Vec<CountryRow>,
    pub top_caption: String,
    pub bottom_caption: String,
}

pub fn build_geography_panel(filtered: &SalesTable, metric: MetricLabel) -> Panel<GeographyPanel> {
    if filtered.is_empty() {
        return Panel::Notice(Notice::warning(NO_DATA_MESSAGE));
    }
    let rows = AnalyticsEngine::new().geography(filtered);
    if rows.is_empty() {
        return Panel::Notice(Notice::warning(NO_GEO_MESSAGE));
    }

    let (top, bottom) = rank_countries(&rows, metric.column(), RANKING_SIZE);
    Panel::Ready(GeographyPanel {
        title: format!("{metric} by Country"),
        metric,
        rows,
        top,
        bottom,
        top_caption: format!("Top {RANKING_SIZE} {metric} Regions"),
        bottom_caption: format!("Bottom {RANKING_SIZE} {metric} Regions"),
    })
}
