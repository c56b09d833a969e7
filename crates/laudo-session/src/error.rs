use laudo_render::RenderError;
use laudo_types::{CatalogError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Event index {index} is out of range ({len} events)")]
    EventOutOfRange { index: usize, len: usize },

    #[error("Version must be at least 1")]
    InvalidVersion,

    #[error("Unsupported image '{0}': only png, jpg and jpeg are accepted")]
    UnsupportedImage(String),

    #[error("Saved report not found: {0}")]
    SavedNotFound(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Report generation failed: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Memory store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Memory store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report not found in memory store: {0}")]
    NotFound(String),
}
