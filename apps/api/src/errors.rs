use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::session::SessionError;
use crate::ssg_client::ApiError;

/// A field received a value of the wrong semantic type, or a code outside its table.
///
/// Raised by setters and `RequestInfo::set_field`; the model is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid value for field '{field}': expected {expected}, {reason}")]
pub struct InvalidFieldError {
    pub field: String,
    pub expected: &'static str,
    pub reason: String,
}

impl InvalidFieldError {
    pub fn new(field: impl Into<String>, expected: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        "InvalidFieldError"
    }
}

/// Every required field that is missing, in field-declaration order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Some required fields are missing: {}", errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        "ValidationError"
    }
}

/// Error type of the HTTP surface.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    InvalidField(#[from] InvalidFieldError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No session loaded")]
    SessionRequired,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InvalidField(e) => (StatusCode::BAD_REQUEST, e.kind(), e.to_string()),
            AppError::Validation(e) => {
                let body = Json(json!({
                    "error": {
                        "code": e.kind(),
                        "message": "Some errors are detected with your inputs",
                        "errors": e.errors,
                    }
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::SessionRequired => (
                StatusCode::UNAUTHORIZED,
                "SESSION_REQUIRED",
                "Load your UEN, encryption key, certificate and private key first".to_string(),
            ),
            AppError::Session(e) => (StatusCode::BAD_REQUEST, "SESSION_ERROR", e.to_string()),
            AppError::Api(ApiError::Validation(e)) => {
                return AppError::Validation(e.clone()).into_response();
            }
            AppError::Api(e) => {
                tracing::warn!("SSG API call failed: {e}");
                let status = match e {
                    ApiError::RemoteApi { .. } => StatusCode::BAD_GATEWAY,
                    ApiError::Transport(_) => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let body = Json(json!({
                    "error": {
                        "code": e.kind(),
                        "message": e.to_string(),
                        "status": e.remote_status(),
                    }
                }));
                return (status, body).into_response();
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
