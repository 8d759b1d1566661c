//! Error types for the Bharat server

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::TokenError;
use crate::ocr::OcrError;
use crate::translit::TranslitError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("File must be an image, got {0}")]
    NotAnImage(String),

    #[error("Unsupported script specified: {0}")]
    UnsupportedScript(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("OCR failed: {0}")]
    OcrFailed(#[from] OcrError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AppError::Unauthorized,
            TokenError::Issue(e) => AppError::Internal(format!("Failed to issue token: {}", e)),
        }
    }
}

impl From<TranslitError> for AppError {
    fn from(err: TranslitError) -> Self {
        match err {
            TranslitError::UnsupportedScheme(name) => AppError::UnsupportedScript(name),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::EmailTaken => (StatusCode::BAD_REQUEST, "email_taken", self.to_string()),
            AppError::NotAnImage(_) => (StatusCode::BAD_REQUEST, "not_an_image", self.to_string()),
            AppError::UnsupportedScript(_) => (
                StatusCode::BAD_REQUEST,
                "unsupported_script",
                "Unsupported script specified".to_string(),
            ),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", self.to_string())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::OcrFailed(e) => {
                tracing::error!("OCR error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ocr_failed",
                    "Text recognition failed".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Server-side failures never carry their cause to the caller
        let details = if cfg!(debug_assertions) && status.is_client_error() {
            Some(self.to_string())
        } else {
            None
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        });

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}
