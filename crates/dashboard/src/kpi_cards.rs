use crate::panel::{Notice, Panel, format_count, format_currency, format_delta};
use analytics::{AnalyticsEngine, KpiSnapshot, build_comparison_window};
use core_types::MetricLabel;
use data_store::SalesTable;
use serde::Serialize;

pub const NO_DATA_MESSAGE: &str =
    "No data available for the selected filters. Adjust the filters to view KPIs.";

pub const INSUFFICIENT_HISTORY_NOTE: &str = "Period-over-period deltas require enough historical data to establish a prior window matching the current selection.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
    /// Set on the card of the selected metric.
    pub focus: bool,
    pub help: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiPanel {
    pub caption: String,
    pub comparison_caption: String,
    pub cards: Vec<KpiCard>,
    /// Present when no comparison window could be built.
    pub history_note: Option<&'static str>,
    pub snapshot: KpiSnapshot,
}

/// KPI summary cards for `current`, compared with the preceding window of `full`.
pub fn build_kpi_panel(
    current: &SalesTable,
    full: &SalesTable,
    metric: MetricLabel,
) -> Panel<KpiPanel> {
    if current.is_empty() {
        return Panel::Notice(Notice::warning(NO_DATA_MESSAGE));
    }

    let window = build_comparison_window(current, full);
    let comparison = window.date_bounds();
    let snapshot = AnalyticsEngine::new().kpis(current, comparison.map(|_| &window));

    let comparison_caption = match comparison {
        Some((start, end)) => format!("Comparison window: {start} to {end}"),
        None => {
            "Comparison window: insufficient history for period-over-period metrics".to_string()
        }
    };

    let cards = vec![
        KpiCard {
            label: "Total Revenue".to_string(),
            value: format_currency(snapshot.total_revenue),
            delta: format_delta(snapshot.revenue_change),
            focus: metric == MetricLabel::Revenue,
            help: "Sum of Sales for the active selection.",
        },
        KpiCard {
            label: "Total Profit".to_string(),
            value: format_currency(snapshot.total_profit),
            delta: format_delta(snapshot.profit_change),
            focus: metric == MetricLabel::Profit,
            help: "Sum of Total Profit/Loss for the active selection.",
        },
        KpiCard {
            label: "Profit Margin".to_string(),
            value: format!("{:.1}%", snapshot.profit_margin),
            delta: None,
            focus: false,
            help: "Profit margin expressed as Total Profit divided by Total Revenue.",
        },
        KpiCard {
            label: "Total Orders".to_string(),
            value: format_count(snapshot.total_orders),
            delta: None,
            focus: false,
            help: "Number of orders in the filtered dataset.",
        },
    ];

    Panel::Ready(KpiPanel {
        caption: format!(
            "Highlighted metric: {metric} | Rows analysed: {}",
            format_count(current.len())
        ),
        comparison_caption,
        cards,
        history_note: comparison.is_none().then_some(INSUFFICIENT_HISTORY_NOTE),
        snapshot,
    })
}
