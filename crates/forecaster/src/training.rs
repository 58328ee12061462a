use crate::error::ForecastError;
use chrono::{Months, NaiveDate};
use core_types::columns::ORDER_DATE;
use core_types::{Granularity, NumericColumn};
use data_store::SalesTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One month of the training series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub period_start: NaiveDate,
    pub value: f64,
}

/// Resamples `metric` into calendar-month sums, ascending.
///
/// Records missing a date or a metric value are skipped. Months between the
/// first and last observation that have no records are filled with 0 so the
/// series is contiguous.
pub fn prepare_training_frame(
    table: &SalesTable,
    metric: &str,
) -> Result<Vec<MonthlyPoint>, ForecastError> {
    if table.is_empty() {
        return Err(ForecastError::Validation(
            "Sales dataset is empty; cannot build forecast model.".to_string(),
        ));
    }
    if !table.has_column(ORDER_DATE) {
        return Err(ForecastError::Validation(format!(
            "Dataset missing '{ORDER_DATE}' column required for forecasting."
        )));
    }
    let column = NumericColumn::from_name(metric)
        .filter(|c| table.has_column(c.name()))
        .ok_or_else(|| {
            ForecastError::Validation(format!("Dataset missing metric column '{metric}'."))
        })?;

    let mut months: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in table.records() {
        if let (Some(date), Some(value)) = (record.order_date, record.value(column)) {
            *months.entry(Granularity::Month.period_start(date)).or_default() += value;
        }
    }

    let (Some(&first), Some(&last)) = (months.keys().next(), months.keys().next_back()) else {
        return Err(ForecastError::Validation(
            "Monthly aggregation produced no rows; check data integrity.".to_string(),
        ));
    };

    let mut series = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        series.push(MonthlyPoint {
            period_start: cursor,
            value: months.get(&cursor).copied().unwrap_or(0.0),
        });
        cursor = cursor.checked_add_months(Months::new(1)).ok_or_else(|| {
            ForecastError::Validation(format!("Month after {cursor} is out of range."))
        })?;
    }

    tracing::debug!(metric, months = series.len(), %first, %last, "Prepared training frame.");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SalesRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(day: Option<NaiveDate>, sales: Option<f64>) -> SalesRecord {
        SalesRecord {
            order_date: day,
            sales,
            ..Default::default()
        }
    }

    #[test]
    fn months_are_summed_and_gaps_zero_filled() {
        let table = SalesTable::from_records(vec![
            sale(Some(date(2023, 3, 20)), Some(5.0)),
            sale(Some(date(2023, 1, 1)), Some(100.0)),
            sale(Some(date(2023, 1, 15)), Some(50.0)),
            sale(Some(date(2023, 1, 16)), None),
            sale(None, Some(1000.0)),
        ]);
        let series = prepare_training_frame(&table, "Sales").unwrap();
        let values: Vec<(NaiveDate, f64)> =
            series.iter().map(|p| (p.period_start, p.value)).collect();
        assert_eq!(
            values,
            vec![(date(2023, 1, 1), 150.0), (date(2023, 2, 1), 0.0), (date(2023, 3, 1), 5.0)]
        );
    }

    #[test]
    fn empty_tables_and_missing_columns_are_rejected() {
        let err = prepare_training_frame(&SalesTable::default(), "Sales").unwrap_err();
        assert!(matches!(err, ForecastError::Validation(_)));

        let no_dates = SalesTable::new(vec!["Sales".to_string()], vec![sale(None, Some(1.0))]);
        assert!(prepare_training_frame(&no_dates, "Sales").is_err());

        let table = SalesTable::from_records(vec![sale(Some(date(2023, 1, 1)), Some(1.0))]);
        let err = prepare_training_frame(&table, "Discount").unwrap_err();
        assert!(err.to_string().contains("Discount"));
    }

    #[test]
    fn all_invalid_dates_yield_validation_error() {
        let table = SalesTable::from_records(vec![sale(None, Some(10.0)), sale(None, Some(5.0))]);
        let err = prepare_training_frame(&table, "Sales").unwrap_err();
        assert!(err.to_string().contains("no rows"));
    }
}
