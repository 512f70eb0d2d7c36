//! Pipeline error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Turn not found: {0}")]
    TurnNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] turn_store::StoreError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] plant_catalog::CatalogError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
