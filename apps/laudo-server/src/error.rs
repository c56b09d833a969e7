//! Error types for the laudo server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use laudo_session::{MemoryError, SessionError};
use laudo_types::{RequiredField, ValidationError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Server error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<RequiredField>>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::SessionNotFound(_) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", self.to_string())
            }
            ApiError::Session(err) => match err {
                SessionError::EventOutOfRange { .. } => {
                    (StatusCode::NOT_FOUND, "EVENT_NOT_FOUND", err.to_string())
                }
                SessionError::SavedNotFound(_) => {
                    (StatusCode::NOT_FOUND, "SAVED_NOT_FOUND", err.to_string())
                }
                SessionError::InvalidVersion
                | SessionError::UnsupportedImage(_)
                | SessionError::Catalog(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.to_string())
                }
                SessionError::Validation(ValidationError::MissingFields(_)) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "MISSING_FIELDS",
                    err.to_string(),
                ),
                SessionError::Validation(ValidationError::NoEvents) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "NO_EVENTS",
                    err.to_string(),
                ),
                SessionError::Render(render) => {
                    tracing::error!(error = %render, "Report generation failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "GENERATION_FAILED",
                        "Erro ao gerar o laudo".to_string(),
                    )
                }
            },
            ApiError::Memory(MemoryError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "SAVED_NOT_FOUND", self.to_string())
            }
            ApiError::Memory(err) => {
                tracing::error!(error = %err, "Memory store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MEMORY_ERROR",
                    "Memory store error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let fields = match self {
            ApiError::Session(SessionError::Validation(ValidationError::MissingFields(fields))) => {
                Some(fields)
            }
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code,
            fields,
        };

        (status, Json(body)).into_response()
    }
}
