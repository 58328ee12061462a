use crate::panel::{Notice, Panel, format_currency, format_number};
use crate::session::FilterState;
use forecaster::{ForecastError, ForecastPoint, PointKind};
use serde::Serialize;

pub const NO_FORECAST_MESSAGE: &str =
    "No forecast data is available for the selected filters and metric.";
pub const LOAD_FAILED_MESSAGE: &str =
    "Unable to load forecast artifact. Run the `forecaster` binary and retry.";

/// Actual and projected rows ready for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastSegments {
    pub actual: Vec<ForecastPoint>,
    pub forecast: Vec<ForecastPoint>,
}

impl ForecastSegments {
    pub fn is_empty(&self) -> bool {
        self.actual.is_empty() && self.forecast.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPanel {
    pub horizon: u32,
    pub segments: ForecastSegments,
    pub insights: String,
}

/// Splits the artifact for the selected metric.
///
/// Forecast rows are limited to `horizon` months ahead; actual rows to the
/// selected date range. Both come back ordered by period.
pub fn prepare_forecast_segments(
    points: &[ForecastPoint],
    filters: &FilterState,
    horizon: u32,
) -> ForecastSegments {
    let mut segments = ForecastSegments::default();
    for point in points.iter().filter(|p| p.metric == filters.metric_column()) {
        match point.kind {
            PointKind::Actual
                if point.period_start >= filters.start_date
                    && point.period_start <= filters.end_date =>
            {
                segments.actual.push(point.clone())
            }
            PointKind::Forecast if point.horizon <= horizon => segments.forecast.push(point.clone()),
            _ => {}
        }
    }
    segments.actual.sort_by_key(|p| p.period_start);
    segments.forecast.sort_by_key(|p| p.period_start);
    segments
}

fn format_metric_value(value: f64, metric_label: &str) -> String {
    let label = metric_label.to_ascii_lowercase();
    if ["revenue", "sales", "profit"].iter().any(|k| label.contains(k)) {
        format_currency(value)
    } else {
        format_number(value)
    }
}

/// A short narrative of the projection shown beside the chart.
pub fn summarize_forecast_insights(
    segments: &ForecastSegments,
    metric_label: &str,
    horizon: u32,
    method: Option<&str>,
) -> String {
    let (Some(first), Some(last)) = (segments.forecast.first(), segments.forecast.last()) else {
        return "Forecast data is unavailable for the selected filters. \
                Verify the offline artifact and try a different metric."
            .to_string();
    };

    let projected = format_metric_value(last.value, metric_label);
    let period = last.period_start.format("%B %Y");
    let mut lines = Vec::with_capacity(4);

    match segments.actual.last() {
        Some(latest) => {
            let shift = if latest.value == 0.0 {
                "steady".to_string()
            } else {
                format!("{:+.1}%", (last.value - latest.value) / latest.value * 100.0)
            };
            lines.push(format!(
                "{metric_label} is projected to reach {projected} by {period}, \
                 a {shift} shift versus the latest actuals."
            ));
        }
        None => {
            let horizon_label = if horizon > 0 {
                format!("{horizon}-month")
            } else {
                "forecast".to_string()
            };
            lines.push(format!(
                "The {horizon_label} projection estimates {metric_label} at {projected} by {period}."
            ));
        }
    }

    let mean_width = segments
        .forecast
        .iter()
        .map(|p| p.upper_bound - p.lower_bound)
        .sum::<f64>()
        / segments.forecast.len() as f64;
    lines.push(format!(
        "Confidence band width averages {} around the forecast centre, signaling expected variability.",
        format_metric_value(mean_width / 2.0, metric_label)
    ));

    let trend = last.value - first.value;
    let advice = if trend > 0.0 {
        "Focus on capacity planning and capturing the forecasted uplift, as values trend upwards across the horizon."
    } else if trend < 0.0 {
        "Prepare mitigation or retention strategies; the forecast shows a downward trend over the horizon."
    } else {
        "Momentum remains flat; maintain efficiency and monitor for new signals before adjusting strategy."
    };
    lines.push(advice.to_string());

    lines.push(format!(
        "Method: {} using cached artifact (no runtime training).",
        method.unwrap_or("precomputed forecast")
    ));
    lines.join("\n")
}

/// Turns a load result into the forecast panel.
///
/// Validation failures become a warning and any other failure an error
/// notice; neither aborts the rest of the dashboard.
pub fn build_forecast_panel(
    loaded: Result<&[ForecastPoint], &ForecastError>,
    filters: &FilterState,
    horizon: u32,
) -> Panel<ForecastPanel> {
    let points = match loaded {
        Ok(points) => points,
        Err(ForecastError::Validation(message)) => {
            return Panel::Notice(Notice::warning(message.clone()));
        }
        Err(err) => return Panel::Notice(Notice::error(LOAD_FAILED_MESSAGE, err.to_string())),
    };

    let segments = prepare_forecast_segments(points, filters, horizon);
    if segments.is_empty() {
        return Panel::Notice(Notice::warning(NO_FORECAST_MESSAGE));
    }
    let method = segments.forecast.first().map(|p| p.method.as_str());
    let insights = summarize_forecast_insights(&segments, filters.metric.label(), horizon, method);
    Panel::Ready(ForecastPanel {
        horizon,
        segments,
        insights,
    })
}
