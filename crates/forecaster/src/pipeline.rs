use crate::artifact::{self, ForecastPoint};
use crate::error::ForecastError;
use crate::training::prepare_training_frame;
use chrono::Utc;
use configuration::ForecastSettings;
use data_store::{SalesStore, SalesTable};
use std::fs;
use std::path::{Path, PathBuf};

/// Lifecycle of the artifact during one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    NoArtifact,
    ArtifactExists,
    Generating,
    Persisted,
    Loaded,
    ValidationFailed,
}

impl ArtifactState {
    fn enter(self, path: &Path) -> Self {
        tracing::debug!(state = ?self, path = %path.display(), "Forecast artifact state.");
        self
    }
}

/// Offline moving-average forecast: trains on the canonical table and
/// persists a flat artifact the dashboard reads without retraining.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    store: SalesStore,
    settings: ForecastSettings,
}

impl ForecastPipeline {
    pub fn new(store: SalesStore, settings: ForecastSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// `path`, or the configured artifact location.
    pub fn artifact_path(&self, path: Option<&Path>) -> PathBuf {
        path.map(Path::to_path_buf)
            .unwrap_or_else(|| self.settings.artifact_path.clone())
    }

    /// Loads the sales table, fits the model and writes the artifact.
    pub fn generate(&self, output: Option<&Path>) -> Result<PathBuf, ForecastError> {
        let table = self.store.load()?;
        self.generate_from_table(&table, output)
    }

    /// Same as [`generate`](Self::generate) with an already loaded table.
    pub fn generate_from_table(
        &self,
        table: &SalesTable,
        output: Option<&Path>,
    ) -> Result<PathBuf, ForecastError> {
        let path = self.artifact_path(output);
        ArtifactState::Generating.enter(&path);

        let history = prepare_training_frame(table, &self.settings.metric)?;
        let rows = artifact::build_forecast_rows(&history, &self.settings, Utc::now())?;
        artifact::write_artifact(&path, &rows)?;

        ArtifactState::Persisted.enter(&path);
        tracing::info!(
            path = %path.display(),
            rows = rows.len(),
            metric = %self.settings.metric,
            "Forecast artifact written."
        );
        Ok(path)
    }

    /// Reads the artifact, generating it first when it is absent or when
    /// `force_refresh` is set.
    pub fn load_forecast_results(
        &self,
        path: Option<&Path>,
        force_refresh: bool,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let path = self.artifact_path(path);
        let state = if path.exists() {
            ArtifactState::ArtifactExists
        } else {
            ArtifactState::NoArtifact
        };
        state.enter(&path);

        if force_refresh || state == ArtifactState::NoArtifact {
            self.generate(Some(&path))?;
        }

        match artifact::read_artifact(&path) {
            Ok(rows) => {
                ArtifactState::Loaded.enter(&path);
                Ok(rows)
            }
            Err(err) => {
                if matches!(err, ForecastError::Schema { .. }) {
                    ArtifactState::ValidationFailed.enter(&path);
                }
                Err(err)
            }
        }
    }
}

/// The confirmation line printed by the standalone binary.
pub fn format_cli_message(path: &Path) -> String {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    format!("Forecast artifact generated at {} ({size} bytes).", path.display())
}
