use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::views;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database unreachable: {0}")]
    Connectivity(#[source] sqlx::Error),
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::UniqueViolation,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connectivity(e),
            other => StoreError::Query(other),
        }
    }
}

/// Handler-level failure. The client only ever sees a generic page.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(StoreError::Connectivity(e)) => {
                tracing::error!(error = %e, "store unreachable");
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
            }
        }
        (StatusCode::INTERNAL_SERVER_ERROR, views::error_page()).into_response()
    }
}
