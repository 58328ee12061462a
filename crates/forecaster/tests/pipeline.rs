use configuration::{DataSettings, ForecastSettings};
use data_store::SalesStore;
use forecaster::{ForecastError, ForecastPipeline, PointKind, format_cli_message};
use std::fs;
use std::path::Path;

const CANONICAL: &str = "\
Order Date,Sales,Total Profit/Loss,Country
2023-01-05,1200.0,300.0,USA
2023-01-20,800.0,150.0,France
2023-02-11,1500.0,420.0,USA
2023-04-02,900.0,-50.0,France
2023-05-17,2100.0,610.0,USA
2023-06-30,1750.0,500.0,USA
2023-07-08,1300.0,260.0,France
";

fn pipeline_in(dir: &Path, horizon: u32, window: usize) -> ForecastPipeline {
    let data = DataSettings {
        raw_path: dir.join("raw.csv"),
        canonical_path: dir.join("sales_data.csv"),
        processed_path: dir.join("processed.csv"),
    };
    fs::write(&data.canonical_path, CANONICAL).unwrap();
    let settings = ForecastSettings {
        horizon,
        window,
        artifact_path: dir.join("processed").join("forecast_sales.csv"),
        ..ForecastSettings::default()
    };
    ForecastPipeline::new(SalesStore::new(data), settings)
}

#[test]
fn artifact_holds_actuals_and_forecasts() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_in(dir.path(), 6, 3);

    let rows = pipeline.load_forecast_results(None, false).unwrap();
    // January..July is seven months, March zero-filled.
    let actuals: Vec<_> = rows.iter().filter(|r| r.kind == PointKind::Actual).collect();
    assert_eq!(actuals.len(), 7);
    assert_eq!(actuals[2].value, 0.0);
    assert!(rows.iter().any(|r| r.kind == PointKind::Forecast));
    assert_eq!(rows.iter().map(|r| r.horizon).max(), Some(6));
    assert!(rows.iter().all(|r| r.method == "moving_average"));
    assert!(rows.iter().all(|r| r.metric == "Sales"));
}

#[test]
fn forecast_bounds_bracket_the_value() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_in(dir.path(), 12, 3);

    let rows = pipeline.load_forecast_results(None, false).unwrap();
    let forecasts: Vec<_> = rows.iter().filter(|r| r.kind == PointKind::Forecast).collect();
    assert_eq!(forecasts.len(), 12);
    for row in forecasts {
        assert!(row.lower_bound >= 0.0);
        assert!(row.upper_bound >= row.value);
        assert!(row.value >= row.lower_bound);
    }
}

#[test]
fn loader_generates_once_then_reads() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_in(dir.path(), 6, 3);
    let path = pipeline.artifact_path(None);
    assert!(!path.exists());

    let first = pipeline.load_forecast_results(None, false).unwrap();
    assert!(path.exists());

    let second = pipeline.load_forecast_results(None, false).unwrap();
    assert_eq!(first[0].generated_at, second[0].generated_at);
    assert_eq!(first, second);
}

#[test]
fn forced_refresh_replaces_a_broken_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_in(dir.path(), 6, 3);
    let path = pipeline.artifact_path(None);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "period_start,value\n2023-01-01,1.0\n").unwrap();

    match pipeline.load_forecast_results(None, false).unwrap_err() {
        ForecastError::Schema { missing } => {
            assert!(missing.contains(&"horizon".to_string()));
            assert!(missing.contains(&"type".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }

    let rows = pipeline.load_forecast_results(None, true).unwrap();
    assert!(!rows.is_empty());
}

#[test]
fn unknown_metric_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = pipeline_in(dir.path(), 6, 3).settings().clone();
    settings.metric = "Discount".to_string();
    let data = DataSettings {
        raw_path: dir.path().join("raw.csv"),
        canonical_path: dir.path().join("sales_data.csv"),
        processed_path: dir.path().join("processed.csv"),
    };
    let pipeline = ForecastPipeline::new(SalesStore::new(data), settings);

    let err = pipeline.generate(None).unwrap_err();
    assert!(matches!(err, ForecastError::Validation(_)));
    assert!(err.to_string().contains("Discount"));
}

#[test]
fn cli_message_reports_size() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_in(dir.path(), 2, 2);
    let path = pipeline.generate(None).unwrap();

    let size = fs::metadata(&path).unwrap().len();
    let message = format_cli_message(&path);
    assert!(message.starts_with("Forecast artifact generated at "));
    assert!(message.ends_with(&format!("({size} bytes).")));
}
