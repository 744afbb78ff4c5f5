//! HTTP error mapping
//!
//! Handlers return `Result<HttpResponse, ApiError>`; the `ResponseError`
//! impl turns each variant into a status code and a
//! `{"error": code, "message": text}` body.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, warn};
use serde::Serialize;
use taskdeck_auth::AuthError;
use taskdeck_core::{CoreError, FieldError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Too many requests, please try again later")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("Authentication required")]
    Unauthenticated,

    /// Same response as `Unauthenticated`; kept apart for logging.
    #[error("Invalid token: {0}")]
    InvalidToken(AuthError),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Task not found or unauthorized")]
    NotFoundOrForbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a [FieldError]>,
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    /// Stable machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::RateLimitExceeded { .. } => "rate_limited",
            ApiError::Unauthenticated | ApiError::InvalidToken(_) | ApiError::InvalidCredentials => {
                "unauthorized"
            }
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFoundOrForbidden => "not_found",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::InvalidToken(_) => ApiError::Unauthenticated.to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Unauthenticated | ApiError::InvalidToken(_) | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFoundOrForbidden => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Internal(detail) => error!("Request failed: {}", detail),
            ApiError::InvalidToken(reason) => warn!("Token rejected: {}", reason),
            _ => {}
        }

        let message = self.public_message();
        let body = ErrorBody {
            error: self.code(),
            message: &message,
            errors: match self {
                ApiError::Validation(fields) => Some(fields.as_slice()),
                _ => None,
            },
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let ApiError::RateLimitExceeded { retry_after_seconds } = self {
            builder.insert_header(("Retry-After", retry_after_seconds.to_string()));
        }
        builder.json(body)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            e if e.is_token_rejection() => ApiError::InvalidToken(e),
            AuthError::InvalidCredentials | AuthError::UserNotFound(_) => ApiError::InvalidCredentials,
            AuthError::EmailTaken => ApiError::validation("email", "User already exists"),
            AuthError::WeakPassword(message) => ApiError::validation("password", message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(fields) => ApiError::Validation(fields),
            CoreError::Storage(detail) => ApiError::Internal(detail),
        }
    }
}
