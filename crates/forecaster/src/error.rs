use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    /// The training data cannot support a forecast.
    #[error("Forecast validation error: {0}")]
    Validation(String),

    #[error("Forecast artifact missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Failed to load the sales dataset: {0}")]
    Store(#[from] data_store::StoreError),

    #[error("I/O error while accessing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed forecast artifact {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
