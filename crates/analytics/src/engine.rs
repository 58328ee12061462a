use crate::aggregation::{self, CountryRow, PeriodDelta, PeriodRow};
use crate::comparison;
use crate::kpi::{self, KpiSnapshot};
use core_types::{Granularity, NumericColumn};
use data_store::SalesTable;

/// A stateless calculator bundling the aggregation and KPI operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// KPIs for `current`, compared with the window that precedes it in `full`.
    ///
    /// An empty comparison window is treated as absent, which leaves the
    /// changes undefined.
    pub fn kpis_with_comparison(&self, current: &SalesTable, full: &SalesTable) -> KpiSnapshot {
        let window = comparison::build_comparison_window(current, full);
        let comparison = (!window.is_empty()).then_some(&window);
        kpi::calculate_kpis(current, comparison)
    }

    pub fn kpis(&self, current: &SalesTable, comparison: Option<&SalesTable>) -> KpiSnapshot {
        kpi::calculate_kpis(current, comparison)
    }

    pub fn trend(&self, table: &SalesTable, granularity: Granularity) -> Vec<PeriodRow> {
        aggregation::aggregate_by_period(table, granularity)
    }

    /// The trend with per-period changes of `metric`.
    pub fn trend_with_deltas(
        &self,
        table: &SalesTable,
        granularity: Granularity,
        metric: NumericColumn,
    ) -> Vec<PeriodDelta> {
        aggregation::with_period_deltas(&self.trend(table, granularity), metric)
    }

    pub fn geography(&self, table: &SalesTable) -> Vec<CountryRow> {
        aggregation::aggregate_by_country(table)
    }
}
