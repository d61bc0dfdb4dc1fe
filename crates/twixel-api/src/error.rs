use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::views;

/// Failures a loader or action can throw. The 4xx variants carry the text
/// the handler wants to show; route catch boundaries may replace it with
/// their own copy.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Typed HTTP errors a catch boundary may render, as opposed to
    /// unexpected failures.
    pub fn is_caught(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e))
    }
}

/// Root boundary, used when a route has no layout of its own to render into.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(e) => {
                error!("Unhandled error: {:#}", e);
                "Qualcosa è andato storto, ci scusiamo.".to_string()
            }
            other => other.to_string(),
        };
        (status, views::error_page(status, &message)).into_response()
    }
}
