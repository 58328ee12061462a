use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to load the sales dataset: {0}")]
    Store(#[from] data_store::StoreError),

    #[error("Invalid dashboard input: {0}")]
    InvalidInput(#[from] core_types::CoreError),
}
