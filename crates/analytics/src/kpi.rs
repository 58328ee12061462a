use crate::aggregation::profit_margin;
use core_types::NumericColumn;
use data_store::SalesTable;
use serde::{Deserialize, Serialize};

/// Scalar KPIs for one selection, with optional period-over-period changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub profit_margin: f64,
    pub total_orders: usize,
    pub avg_order_value: f64,
    /// `None` when there is no comparison or its baseline is zero.
    pub revenue_change: Option<f64>,
    pub profit_change: Option<f64>,
}

impl KpiSnapshot {
    /// The snapshot of an empty selection.
    pub fn empty() -> Self {
        Self {
            total_revenue: 0.0,
            total_profit: 0.0,
            profit_margin: 0.0,
            total_orders: 0,
            avg_order_value: 0.0,
            revenue_change: None,
            profit_change: None,
        }
    }
}

impl Default for KpiSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Sums a numeric column, treating an absent column as 0.
pub fn column_total(table: &SalesTable, column: NumericColumn) -> f64 {
    if !table.has_column(column.name()) {
        return 0.0;
    }
    table.records().iter().filter_map(|r| r.value(column)).sum()
}

/// ((current - previous) / previous) * 100, undefined for a zero baseline.
pub fn percentage_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Reduces a selection (and an optional comparison selection) to KPIs.
///
/// Pure: identical inputs always give identical output.
pub fn calculate_kpis(current: &SalesTable, comparison: Option<&SalesTable>) -> KpiSnapshot {
    if current.is_empty() {
        return KpiSnapshot::empty();
    }

    let total_revenue = column_total(current, NumericColumn::Sales);
    let total_profit = column_total(current, NumericColumn::TotalProfit);
    let total_orders = current.len();
    let avg_order_value = total_revenue / total_orders as f64;

    let (revenue_change, profit_change) = match comparison.filter(|c| !c.is_empty()) {
        Some(previous) => (
            percentage_change(total_revenue, column_total(previous, NumericColumn::Sales)),
            percentage_change(total_profit, column_total(previous, NumericColumn::TotalProfit)),
        ),
        None => (None, None),
    };

    KpiSnapshot {
        total_revenue,
        total_profit,
        profit_margin: profit_margin(total_profit, total_revenue),
        total_orders,
        avg_order_value,
        revenue_change,
        profit_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::SalesRecord;

    fn order(day: u32, sales: f64, profit: f64) -> SalesRecord {
        SalesRecord {
            order_date: NaiveDate::from_ymd_opt(2023, 1, day),
            sales: Some(sales),
            total_profit: Some(profit),
            quantity_ordered: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn basic_metrics() {
        let current = SalesTable::from_records(vec![order(1, 1000.0, 250.0), order(2, 500.0, 125.0)]);
        let kpis = calculate_kpis(&current, None);

        assert_eq!(kpis.total_revenue, 1500.0);
        assert_eq!(kpis.total_profit, 375.0);
        assert_eq!(kpis.profit_margin, 25.0);
        assert_eq!(kpis.total_orders, 2);
        assert_eq!(kpis.avg_order_value, 750.0);
        assert_eq!(kpis.revenue_change, None);
        assert_eq!(kpis.profit_change, None);
    }

    #[test]
    fn percentage_change_against_comparison() {
        let current = SalesTable::from_records(vec![order(2, 200.0, 40.0)]);
        let previous = SalesTable::from_records(vec![order(1, 100.0, 20.0)]);
        let kpis = calculate_kpis(&current, Some(&previous));
        assert_eq!(kpis.revenue_change, Some(100.0));
        assert_eq!(kpis.profit_change, Some(100.0));
    }

    #[test]
    fn zero_baseline_is_undefined_not_zero() {
        let current = SalesTable::from_records(vec![order(2, 50.0, 5.0)]);
        let previous = SalesTable::from_records(vec![order(1, 0.0, 0.0)]);
        let kpis = calculate_kpis(&current, Some(&previous));
        assert_eq!(kpis.revenue_change, None);
        assert_eq!(kpis.profit_change, None);

        let empty = SalesTable::default();
        assert_eq!(calculate_kpis(&current, Some(&empty)).revenue_change, None);
    }

    #[test]
    fn empty_input_returns_zeroes() {
        assert_eq!(calculate_kpis(&SalesTable::default(), None), KpiSnapshot::empty());
    }

    #[test]
    fn absent_columns_sum_to_zero() {
        let table = SalesTable::new(vec!["Order Date".to_string()], vec![order(1, 10.0, 2.0)]);
        let kpis = calculate_kpis(&table, None);
        assert_eq!(kpis.total_revenue, 0.0);
        assert_eq!(kpis.total_orders, 1);
        assert_eq!(kpis.avg_order_value, 0.0);
        assert_eq!(kpis.profit_margin, 0.0);
    }

    #[test]
    fn missing_values_do_not_count_towards_sums() {
        let mut blank = order(3, 0.0, 0.0);
        blank.sales = None;
        let table = SalesTable::from_records(vec![order(1, 10.0, 2.0), blank]);
        let kpis = calculate_kpis(&table, None);
        assert_eq!(kpis.total_revenue, 10.0);
        assert_eq!(kpis.total_orders, 2);
        assert_eq!(kpis.avg_order_value, 5.0);
    }
}
