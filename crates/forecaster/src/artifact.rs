use crate::error::ForecastError;
use crate::model::{ErrorBand, EVALUATION_METRIC, METHOD_IDENTIFIER, MovingAverageModel};
use crate::training::MonthlyPoint;
use chrono::{DateTime, Months, NaiveDate, Utc};
use configuration::{ForecastSettings, MAX_HORIZON};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Columns every artifact must carry, in the order they are written.
pub const EXPECTED_COLUMNS: [&str; 14] = [
    "period_start",
    "metric",
    "value",
    "type",
    "lower_bound",
    "upper_bound",
    "method",
    "horizon",
    "generated_at",
    "confidence_level",
    "evaluation_metric",
    "evaluation_value",
    "training_start",
    "training_end",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Actual,
    Forecast,
}

/// One row of the forecast artifact.
///
/// Field order matches `EXPECTED_COLUMNS`, which the CSV writer relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period_start: NaiveDate,
    pub metric: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: PointKind,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub method: String,
    /// 0 for actuals, 1..=H for projected months.
    pub horizon: u32,
    pub generated_at: DateTime<Utc>,
    pub confidence_level: f64,
    pub evaluation_metric: String,
    pub evaluation_value: f64,
    pub training_start: NaiveDate,
    pub training_end: NaiveDate,
}

/// Fits the model on `history` and assembles actual plus forecast rows.
pub fn build_forecast_rows(
    history: &[MonthlyPoint],
    settings: &ForecastSettings,
    generated_at: DateTime<Utc>,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return Err(ForecastError::Validation(
            "Cannot build a forecast from an empty training series.".to_string(),
        ));
    };
    if settings.horizon > MAX_HORIZON {
        return Err(ForecastError::Validation(format!(
            "Forecast horizon {} exceeds the maximum of {MAX_HORIZON} months.",
            settings.horizon
        )));
    }
    let (training_start, training_end) = (first.period_start, last.period_start);

    let model = MovingAverageModel::new(settings.window);
    let values: Vec<f64> = history.iter().map(|p| p.value).collect();
    let fitted = model.fit(&values);
    let band = ErrorBand::from_fit(&values, &fitted, settings.confidence_level);
    let forecasts = model.extrapolate(&values, settings.horizon as usize);

    let point = |period_start, value, kind, lower_bound, upper_bound, horizon| ForecastPoint {
        period_start,
        metric: settings.metric.clone(),
        value,
        kind,
        lower_bound,
        upper_bound,
        method: METHOD_IDENTIFIER.to_string(),
        horizon,
        generated_at,
        confidence_level: settings.confidence_level,
        evaluation_metric: EVALUATION_METRIC.to_string(),
        evaluation_value: band.mae,
        training_start,
        training_end,
    };

    let mut rows: Vec<ForecastPoint> = history
        .iter()
        .map(|p| point(p.period_start, p.value, PointKind::Actual, p.value, p.value, 0))
        .collect();

    for (step, value) in (1u32..).zip(forecasts) {
        let period_start = training_end
            .checked_add_months(Months::new(step))
            .ok_or_else(|| {
                ForecastError::Validation(format!(
                    "Forecast period {step} months after {training_end} is out of range."
                ))
            })?;
        rows.push(point(
            period_start,
            value,
            PointKind::Forecast,
            (value - band.half_width).max(0.0),
            value + band.half_width,
            step,
        ));
    }

    tracing::info!(
        metric = %settings.metric,
        actuals = history.len(),
        horizon = settings.horizon,
        mae = band.mae,
        half_width = band.half_width,
        "Built forecast rows."
    );
    Ok(rows)
}

/// Persists the rows as a flat CSV table, replacing any previous artifact.
pub fn write_artifact(path: &Path, rows: &[ForecastPoint]) -> Result<(), ForecastError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ForecastError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_err = |source| ForecastError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ForecastError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Reads an artifact back, checking its header against `EXPECTED_COLUMNS` first.
pub fn read_artifact(path: &Path) -> Result<Vec<ForecastPoint>, ForecastError> {
    let csv_err = |source| ForecastError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?;
    let mut missing: Vec<String> = EXPECTED_COLUMNS
        .iter()
        .filter(|expected| !headers.iter().any(|h| h == **expected))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(ForecastError::Schema { missing });
    }

    reader
        .deserialize()
        .collect::<Result<Vec<ForecastPoint>, _>>()
        .map_err(csv_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn history(values: &[f64]) -> Vec<MonthlyPoint> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| MonthlyPoint {
                period_start: start.checked_add_months(Months::new(i as u32)).unwrap(),
                value: *v,
            })
            .collect()
    }

    fn settings(horizon: u32, window: usize) -> ForecastSettings {
        ForecastSettings {
            horizon,
            window,
            ..ForecastSettings::default()
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn rows_cover_actuals_then_forecasts() {
        let rows = build_forecast_rows(
            &history(&[100.0, 120.0, 90.0, 150.0, 130.0]),
            &settings(6, 3),
            stamp(),
        )
        .unwrap();

        assert_eq!(rows.len(), 11);
        assert!(rows.iter().any(|r| r.kind == PointKind::Actual));
        assert!(rows.iter().any(|r| r.kind == PointKind::Forecast));
        assert_eq!(rows.iter().map(|r| r.horizon).max(), Some(6));
        assert!(rows.iter().all(|r| r.method == "moving_average"));
        assert!(rows.iter().all(|r| r.evaluation_metric == "MAE"));

        let first_forecast = &rows[5];
        assert_eq!(first_forecast.horizon, 1);
        assert_eq!(first_forecast.period_start, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        assert_eq!(rows[10].period_start, NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
        assert_eq!(first_forecast.training_start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(first_forecast.training_end, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
    }

    #[test]
    fn actual_rows_have_zero_width_bands() {
        let rows = build_forecast_rows(&history(&[10.0, 40.0]), &settings(2, 3), stamp()).unwrap();
        for row in rows.iter().filter(|r| r.kind == PointKind::Actual) {
            assert_eq!(row.horizon, 0);
            assert_eq!(row.lower_bound, row.value);
            assert_eq!(row.upper_bound, row.value);
        }
    }

    #[test]
    fn forecast_bounds_are_ordered_and_floored() {
        // A volatile series makes the band wider than the forecast itself.
        let rows = build_forecast_rows(
            &history(&[5.0, 500.0, 0.0, 400.0, 1.0, 2.0, 3.0]),
            &settings(12, 3),
            stamp(),
        )
        .unwrap();
        for row in rows.iter().filter(|r| r.kind == PointKind::Forecast) {
            assert!(row.lower_bound >= 0.0);
            assert!(row.upper_bound >= row.value);
            assert!(row.value >= row.lower_bound);
        }
        assert!(rows.iter().any(|r| r.kind == PointKind::Forecast && r.lower_bound == 0.0));
    }

    #[test]
    fn artifact_survives_a_write_read_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("forecast.csv");
        let rows = build_forecast_rows(&history(&[1.0, 2.0, 3.0]), &settings(2, 2), stamp()).unwrap();

        write_artifact(&path, &rows).unwrap();
        let header = fs::read_to_string(&path).unwrap();
        assert!(header.starts_with(&EXPECTED_COLUMNS.join(",")));
        assert_eq!(read_artifact(&path).unwrap(), rows);
    }

    #[test]
    fn padded_headers_still_deserialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("padded.csv");
        let rows = build_forecast_rows(&history(&[1.0, 2.0, 3.0]), &settings(2, 2), stamp()).unwrap();
        write_artifact(&path, &rows).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let (header, body) = text.split_once('\n').unwrap();
        let padded = header.replace(",type,", ", type ,").replacen("period_start", " period_start", 1);
        fs::write(&path, format!("{padded}\n{body}")).unwrap();

        assert_eq!(read_artifact(&path).unwrap(), rows);
    }

    #[test]
    fn excessive_horizon_is_rejected() {
        let err = build_forecast_rows(&history(&[1.0, 2.0]), &settings(u32::MAX, 2), stamp())
            .unwrap_err();
        assert!(matches!(err, ForecastError::Validation(_)));
    }

    #[test]
    fn schema_errors_list_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "period_start,metric,value\n2023-01-01,Sales,1.0\n").unwrap();

        match read_artifact(&path).unwrap_err() {
            ForecastError::Schema { missing } => {
                assert_eq!(missing.len(), 11);
                assert!(missing.contains(&"lower_bound".to_string()));
                assert!(missing.windows(2).all(|w| w[0] <= w[1]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
