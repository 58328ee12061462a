//! The trailing moving-average model and its residual error band.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Identifier written to every artifact row.
pub const METHOD_IDENTIFIER: &str = "moving_average";
/// Name of the training-fit error written to the artifact.
pub const EVALUATION_METRIC: &str = "MAE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverageModel {
    window: usize,
}

impl MovingAverageModel {
    /// A window below 1 is raised to 1.
    pub fn new(window: usize) -> Self {
        Self { window: window.max(1) }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// In-sample fit: at each position, the mean of up to `window` values ending there.
    ///
    /// Early positions average the shorter prefix, so every position has a fit.
    pub fn fit(&self, values: &[f64]) -> Vec<f64> {
        (0..values.len())
            .map(|i| mean(&values[(i + 1).saturating_sub(self.window)..=i]))
            .collect()
    }

    /// Extends the average `horizon` steps, feeding each forecast back into the buffer.
    pub fn extrapolate(&self, values: &[f64], horizon: usize) -> Vec<f64> {
        let seed = &values[values.len().saturating_sub(self.window)..];
        let mut buffer: VecDeque<f64> = seed.iter().copied().collect();
        let mut forecasts = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let next = if buffer.is_empty() {
                0.0
            } else {
                buffer.iter().sum::<f64>() / buffer.len() as f64
            };
            forecasts.push(next);
            buffer.push_back(next);
            while buffer.len() > self.window {
                buffer.pop_front();
            }
        }
        forecasts
    }
}

/// Fit quality and the resulting confidence half-width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBand {
    /// Mean absolute error between actuals and the in-sample fit.
    pub mae: f64,
    /// Sample standard deviation (N - 1) of the residuals.
    pub std_error: f64,
    pub z: f64,
    pub half_width: f64,
}

impl ErrorBand {
    pub fn from_fit(actual: &[f64], fitted: &[f64], confidence_level: f64) -> Self {
        let residuals: Vec<f64> = actual.iter().zip(fitted).map(|(a, f)| a - f).collect();

        let mae = if residuals.is_empty() {
            0.0
        } else {
            residuals.iter().map(|r| r.abs()).sum::<f64>() / residuals.len() as f64
        };

        let std_error = if residuals.len() > 1 {
            let mean = mean(&residuals);
            let sum_sq: f64 = residuals.iter().map(|r| (r - mean) * (r - mean)).sum();
            (sum_sq / (residuals.len() - 1) as f64).sqrt()
        } else {
            0.0
        };

        let z = z_value(confidence_level);
        Self {
            mae,
            std_error,
            z,
            half_width: z * std_error,
        }
    }
}

/// 1.96 for a confidence level of 0.95 (within 0.001), otherwise 1.0.
pub fn z_value(confidence_level: f64) -> f64 {
    if (confidence_level - 0.95).abs() < 1e-3 { 1.96 } else { 1.0 }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
