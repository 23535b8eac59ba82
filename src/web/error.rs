use crate::core::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Input(String),
    Unauthorized,
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<StoreError> for WebError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => Self::Input(msg),
            StoreError::SchemaViolation(table, msg) => {
                Self::Input(format!("table '{}': {}", table, msg))
            }
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::InvalidCredentials => Self::Unauthorized,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Input(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg,
                "input_error".to_string(),
            ),
            WebError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid password".to_string(),
                "unauthorized".to_string(),
            ),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found".to_string()),
            WebError::Conflict(msg) => (StatusCode::CONFLICT, msg, "conflict".to_string()),
            WebError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "internal_error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
