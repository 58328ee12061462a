use chrono::NaiveDate;
use core_types::columns::{COUNTRY, CUSTOMER_ID, ORDER_DATE, QUANTITY_ORDERED, SALES, TOTAL_PROFIT};
use core_types::{Granularity, NumericColumn, SalesRecord};
use data_store::SalesTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Sums for one calendar period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub period_start: NaiveDate,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    /// 100 * profit / sales, or 0 when sales is 0.
    pub profit_margin: f64,
}

impl PeriodRow {
    pub fn metric(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::TotalProfit => self.profit,
            NumericColumn::QuantityOrdered => self.quantity as f64,
            _ => self.sales,
        }
    }
}

/// A period row together with its change versus the previous period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDelta {
    pub row: PeriodRow,
    pub delta: f64,
}

/// Sums for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRow {
    pub country: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    /// Distinct `Customer ID`s, when the source carries that column.
    pub unique_customers: Option<usize>,
    pub profit_margin: f64,
}

impl CountryRow {
    pub fn metric(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::TotalProfit => self.profit,
            NumericColumn::QuantityOrdered => self.quantity as f64,
            _ => self.sales,
        }
    }
}

/// Profit as a percentage of sales, guarded against a zero denominator.
pub fn profit_margin(profit: f64, sales: f64) -> f64 {
    if sales == 0.0 { 0.0 } else { profit / sales * 100.0 }
}

#[derive(Default)]
struct Sums {
    sales: f64,
    profit: f64,
    quantity: i64,
}

impl Sums {
    fn add(&mut self, record: &SalesRecord) {
        self.sales += record.sales.unwrap_or(0.0);
        self.profit += record.total_profit.unwrap_or(0.0);
        self.quantity += record.quantity_ordered.unwrap_or(0);
    }
}

/// Groups the table by calendar period of the order date.
///
/// Periods without rows are omitted and records without a valid date are
/// ignored, so a table with no usable dates yields an empty result.
pub fn aggregate_by_period(table: &SalesTable, granularity: Granularity) -> Vec<PeriodRow> {
    if table.is_empty() || !table.has_column(ORDER_DATE) {
        return Vec::new();
    }

    let mut groups: BTreeMap<NaiveDate, Sums> = BTreeMap::new();
    for record in table.records() {
        if let Some(date) = record.order_date {
            groups.entry(granularity.period_start(date)).or_default().add(record);
        }
    }

    groups
        .into_iter()
        .map(|(period_start, sums)| PeriodRow {
            period_start,
            sales: sums.sales,
            profit: sums.profit,
            quantity: sums.quantity,
            profit_margin: profit_margin(sums.profit, sums.sales),
        })
        .collect()
}

/// Groups the table by country, ascending by name.
///
/// The margin is only derived when both sales and profit columns exist; it is
/// 0 otherwise. A table without a country column, or with nothing to
/// aggregate, yields an empty result.
pub fn aggregate_by_country(table: &SalesTable) -> Vec<CountryRow> {
    if table.is_empty() || !table.has_column(COUNTRY) {
        return Vec::new();
    }
    let has_sales = table.has_column(SALES);
    let has_profit = table.has_column(TOTAL_PROFIT);
    let has_customers = table.has_column(CUSTOMER_ID);
    let has_quantity = table.has_column(QUANTITY_ORDERED);
    if !(has_sales || has_profit || has_customers || has_quantity) {
        return Vec::new();
    }

    let mut groups: BTreeMap<&str, (Sums, BTreeSet<&str>)> = BTreeMap::new();
    for record in table.records() {
        let Some(country) = record.country.as_deref() else {
            continue;
        };
        let (sums, customers) = groups.entry(country).or_default();
        sums.add(record);
        if let Some(customer) = record.customer_id.as_deref() {
            customers.insert(customer);
        }
    }

    groups
        .into_iter()
        .map(|(country, (sums, customers))| CountryRow {
            country: country.to_string(),
            sales: sums.sales,
            profit: sums.profit,
            quantity: sums.quantity,
            unique_customers: has_customers.then_some(customers.len()),
            profit_margin: if has_sales && has_profit {
                profit_margin(sums.profit, sums.sales)
            } else {
                0.0
            },
        })
        .collect()
}

/// Pairs every period row with the change of `metric` since the previous row.
pub fn with_period_deltas(rows: &[PeriodRow], metric: NumericColumn) -> Vec<PeriodDelta> {
    let mut previous: Option<f64> = None;
    rows.iter()
        .map(|row| {
            let value = row.metric(metric);
            let delta = previous.map_or(0.0, |p| value - p);
            previous = Some(value);
            PeriodDelta { row: row.clone(), delta }
        })
        .collect()
}

/// The `n` best and `n` worst countries by `metric`.
pub fn rank_countries(
    rows: &[CountryRow],
    metric: NumericColumn,
    n: usize,
) -> (Vec<CountryRow>, Vec<CountryRow>) {
    let mut ordered = rows.to_vec();
    ordered.sort_by(|a, b| b.metric(metric).total_cmp(&a.metric(metric)));
    let top = ordered.iter().take(n).cloned().collect();
    let bottom = ordered.iter().rev().take(n).cloned().collect();
    (top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(day: NaiveDate, country: &str, sales: f64, profit: f64, qty: i64) -> SalesRecord {
        SalesRecord {
            order_date: Some(day),
            country: Some(country.to_string()),
            customer_id: Some(format!("{country}-{qty}")),
            sales: Some(sales),
            total_profit: Some(profit),
            quantity_ordered: Some(qty),
            ..Default::default()
        }
    }

    #[test]
    fn monthly_aggregation_sums_each_month() {
        let table = SalesTable::from_records(vec![
            row(date(2023, 1, 1), "USA", 100.0, 30.0, 2),
            row(date(2023, 1, 15), "USA", 50.0, 10.0, 1),
            row(date(2023, 2, 1), "USA", 200.0, 60.0, 3),
        ]);

        let rows = aggregate_by_period(&table, Granularity::Month);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period_start, date(2023, 1, 1));
        assert_eq!(rows[0].sales, 150.0);
        assert_eq!(rows[0].quantity, 3);
        assert!((rows[0].profit_margin - 40.0 / 150.0 * 100.0).abs() < 1e-9);
        assert_eq!(rows[1].sales, 200.0);
    }

    #[test]
    fn empty_periods_are_not_zero_filled() {
        let table = SalesTable::from_records(vec![
            row(date(2023, 1, 5), "USA", 10.0, 1.0, 1),
            row(date(2023, 4, 5), "USA", 10.0, 1.0, 1),
        ]);
        assert_eq!(aggregate_by_period(&table, Granularity::Month).len(), 2);
        let quarters = aggregate_by_period(&table, Granularity::Quarter);
        assert_eq!(quarters.len(), 2);
        assert_eq!(quarters[1].period_start, date(2023, 4, 1));
        assert_eq!(aggregate_by_period(&table, Granularity::Year).len(), 1);
    }

    #[test]
    fn undated_tables_aggregate_to_nothing() {
        let table = SalesTable::from_records(vec![SalesRecord {
            sales: Some(5.0),
            ..Default::default()
        }]);
        assert!(aggregate_by_period(&table, Granularity::Month).is_empty());
    }

    #[test]
    fn country_rows_carry_margin_and_customers() {
        let table = SalesTable::from_records(vec![
            row(date(2023, 1, 1), "USA", 100.0, 25.0, 1),
            row(date(2023, 1, 2), "USA", 100.0, 25.0, 2),
            row(date(2023, 1, 3), "France", 0.0, 5.0, 1),
        ]);
        let rows = aggregate_by_country(&table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "France");
        assert_eq!(rows[0].profit_margin, 0.0);
        assert_eq!(rows[1].sales, 200.0);
        assert_eq!(rows[1].profit_margin, 25.0);
        assert_eq!(rows[1].unique_customers, Some(2));
    }

    #[test]
    fn country_margin_needs_both_sales_and_profit_columns() {
        let columns = vec!["Country".to_string(), "Sales".to_string()];
        let table = SalesTable::new(columns, vec![row(date(2023, 1, 1), "USA", 100.0, 25.0, 1)]);
        let rows = aggregate_by_country(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].profit_margin, 0.0);
        assert_eq!(rows[0].unique_customers, None);

        let bare = SalesTable::new(vec!["Country".to_string()], table.records().to_vec());
        assert!(aggregate_by_country(&bare).is_empty());
    }

    #[test]
    fn deltas_start_at_zero() {
        let table = SalesTable::from_records(vec![
            row(date(2023, 1, 1), "USA", 100.0, 10.0, 1),
            row(date(2023, 2, 1), "USA", 250.0, 20.0, 1),
            row(date(2023, 3, 1), "USA", 200.0, 30.0, 1),
        ]);
        let rows = aggregate_by_period(&table, Granularity::Month);
        let deltas = with_period_deltas(&rows, NumericColumn::Sales);
        let values: Vec<f64> = deltas.iter().map(|d| d.delta).collect();
        assert_eq!(values, vec![0.0, 150.0, -50.0]);
    }

    #[test]
    fn rankings_split_top_and_bottom() {
        let table = SalesTable::from_records(vec![
            row(date(2023, 1, 1), "A", 10.0, 1.0, 1),
            row(date(2023, 1, 1), "B", 30.0, 1.0, 1),
            row(date(2023, 1, 1), "C", 20.0, 1.0, 1),
        ]);
        let rows = aggregate_by_country(&table);
        let (top, bottom) = rank_countries(&rows, NumericColumn::Sales, 2);
        let names = |rows: &[CountryRow]| rows.iter().map(|r| r.country.clone()).collect::<Vec<_>>();
        assert_eq!(names(&top), vec!["B", "C"]);
        assert_eq!(names(&bottom), vec!["A", "C"]);
    }
}
