use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// Longest forecast horizon, in months, any component accepts.
pub const MAX_HORIZON: u32 = 1200;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an absent `config.toml` yields a usable config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub forecast: ForecastSettings,
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

/// Locations of the sales dataset on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// The raw workbook (or delimited export) with source-specific headers.
    pub raw_path: PathBuf,
    /// The canonical cache; read in preference to the raw source.
    pub canonical_path: PathBuf,
    /// A second copy of the canonical table for downstream tooling.
    pub processed_path: PathBuf,
}

/// Parameters of the offline moving-average forecast.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Canonical name of the column to forecast (e.g. "Sales").
    pub metric: String,
    /// Number of months projected past the last training month.
    pub horizon: u32,
    /// 0.95 selects a z of 1.96; anything else uses 1.0.
    pub confidence_level: f64,
    /// Moving-average window. Values below 1 are treated as 1.
    pub window: usize,
    pub artifact_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Entries kept by each memoization cache.
    pub cache_capacity: usize,
    /// Date preset applied when a session starts.
    pub default_preset: String,
    /// Forecast horizons offered to the user, in months.
    pub horizon_options: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Fallback filter when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("data/raw/Sales_dataset.xlsx"),
            canonical_path: PathBuf::from("data/sales_data.csv"),
            processed_path: PathBuf::from("data/processed/sales_dataset.csv"),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            metric: "Sales".to_string(),
            horizon: 12,
            confidence_level: 0.95,
            window: 3,
            artifact_path: PathBuf::from("data/processed/forecast_sales.csv"),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            cache_capacity: 32,
            default_preset: "Last 365 Days".to_string(),
            horizon_options: vec![6, 12],
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Rejects settings no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.forecast.confidence_level;
        if !(level > 0.0 && level < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "forecast.confidence_level must lie strictly between 0 and 1, got {level}"
            )));
        }
        if self.forecast.metric.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "forecast.metric must not be empty".to_string(),
            ));
        }
        if self.forecast.horizon > MAX_HORIZON {
            return Err(ConfigError::ValidationError(format!(
                "forecast.horizon must be at most {MAX_HORIZON} months, got {}",
                self.forecast.horizon
            )));
        }
        if let Some(too_long) = self.dashboard.horizon_options.iter().find(|h| **h > MAX_HORIZON) {
            return Err(ConfigError::ValidationError(format!(
                "dashboard.horizon_options must be at most {MAX_HORIZON} months, got {too_long}"
            )));
        }
        if self.dashboard.cache_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "dashboard.cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.dashboard.horizon_options.is_empty() {
            return Err(ConfigError::ValidationError(
                "dashboard.horizon_options must list at least one horizon".to_string(),
            ));
        }
        Ok(())
    }
}
