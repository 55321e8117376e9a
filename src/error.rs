use crate::api::UpstreamError;
use thiserror::Error;

/// Errors surfaced by the ranking engine, one variant per outcome the service
/// surface distinguishes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("operation requires an acting user")]
    Forbidden,

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("a recompute is already in progress")]
    RecomputeInProgress,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error)
}

pub type Result<T> = std::result::Result<T, EngineError>;
