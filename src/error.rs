//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a request can run into ends up as one of its variants, and every variant
//! is terminal for the request: nothing is retried and nothing is compensated.
//!
//! `AppError` implements `actix_web::error::ResponseError`. Client-facing failures use the
//! `{"ok": false, "message": ...}` envelope, authentication failures carry no body beyond
//! the status, and the only genuine 404 is produced for unmatched routes.
//! `From` implementations for `sqlx::Error` and `bcrypt::BcryptError` allow the `?`
//! operator to be used across the crate. Validation failures are reduced to a single
//! message by `validation::validate_input`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed, invalid or expired credential (HTTP 401).
    /// The message is only logged, never sent to the client.
    Unauthorized(String),
    /// Client-side error, including references to domain entities that do not exist (HTTP 400).
    BadRequest(String),
    /// Unmatched route (HTTP 404). Never used for missing domain entities.
    NotFound(String),
    /// Unexpected server-side error such as a hashing or signing failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the document store, passed through verbatim (HTTP 400).
    StoreError(String),
    /// First message of a failed input validation (HTTP 400).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::StoreError(msg) => write!(f, "Store Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl AppError {
    fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg)
            | AppError::StoreError(msg)
            | AppError::ValidationError(msg) => msg,
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::StoreError(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(reason) => {
                log::debug!("rejecting request: {}", reason);
                HttpResponse::Unauthorized().finish()
            }
            AppError::NotFound(_) => crate::routes::home::not_found_page(),
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "ok": false,
                    "message": msg
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(json!({
                "ok": false,
                "message": self.message()
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError::StoreError`, keeping the store's own message.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::StoreError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
