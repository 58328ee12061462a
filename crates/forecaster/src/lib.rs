//! # Forecaster
//!
//! Offline monthly forecasts for the sales dashboard. The pipeline resamples
//! the canonical table into a contiguous monthly series, fits a trailing
//! moving average and writes actuals plus projected months, with a confidence
//! band, to a flat CSV artifact.
//!
//! ## Architectural Principles
//!
//! - **Train Offline, Read Online:** The dashboard only reads the artifact;
//!   `ForecastPipeline::load_forecast_results` regenerates it when missing or
//!   when a refresh is forced.
//! - **Validated Boundaries:** Unusable training data surfaces as
//!   `ForecastError::Validation` and a malformed artifact as
//!   `ForecastError::Schema` listing every missing column.
//!
//! ## Public API
//!
//! - `ForecastPipeline`: `generate`, `generate_from_table`, `load_forecast_results`.
//! - `prepare_training_frame`, `MovingAverageModel`, `ErrorBand`: the pieces of a fit.
//! - `ForecastPoint`, `PointKind`, `read_artifact`, `write_artifact`: the artifact codec.

pub mod artifact;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod training;

pub use artifact::{
    EXPECTED_COLUMNS, ForecastPoint, PointKind, build_forecast_rows, read_artifact, write_artifact,
};
pub use error::ForecastError;
pub use model::{ErrorBand, EVALUATION_METRIC, METHOD_IDENTIFIER, MovingAverageModel, z_value};
pub use pipeline::{ArtifactState, ForecastPipeline, format_cli_message};
pub use training::{MonthlyPoint, prepare_training_frame};
