//! Actix-web extractor for authenticated handlers.
//!
//! Handlers take [`AuthenticatedUser`] as a parameter and only run when the
//! request carries a valid access token. The token is looked up in order:
//!
//! 1. claims already verified by the edge gate (request extensions)
//! 2. the `accessToken` cookie
//! 3. an `Authorization: Bearer <token>` header
//!
//! # Setup
//!
//! ```rust,ignore
//! App::new()
//!     .app_data(web::Data::from(token_service.clone()))
//!     .service(my_handler)
//! ```

use actix_web::{dev::Payload, http::StatusCode, web, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use log::{debug, error};
use std::fmt;
use std::future::{ready, Ready};
use taskdeck_commons::UserId;

use crate::error::AuthError;
use crate::helpers::cookie::{extract_cookie_token, ACCESS_COOKIE_NAME};
use crate::token::{AccessClaims, TokenService};

/// Identity of the caller, taken from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    /// Access token expiry (Unix seconds)
    pub expires_at: u64,
}

impl From<AccessClaims> for AuthenticatedUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.owner_id,
            email: claims.email,
            expires_at: claims.exp,
        }
    }
}

/// Error type for authentication extraction.
///
/// Every token problem produces the same 401 body so callers cannot tell
/// an expired token from a forged one.
#[derive(Debug)]
pub struct AuthExtractError {
    inner: AuthError,
}

impl AuthExtractError {
    pub fn new(error: AuthError) -> Self {
        Self { inner: error }
    }

    /// Get the underlying auth error.
    pub fn inner(&self) -> &AuthError {
        &self.inner
    }
}

impl fmt::Display for AuthExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl ResponseError for AuthExtractError {
    fn status_code(&self) -> StatusCode {
        if self.inner.is_internal() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::UNAUTHORIZED
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = if self.inner.is_internal() {
            serde_json::json!({
                "error": "internal_error",
                "message": "Internal server error"
            })
        } else {
            serde_json::json!({
                "error": "unauthorized",
                "message": "Authentication required"
            })
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<AuthError> for AuthExtractError {
    fn from(error: AuthError) -> Self {
        Self::new(error)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthExtractError> {
    if let Some(claims) = req.extensions().get::<AccessClaims>() {
        return Ok(claims.clone().into());
    }

    let tokens = req.app_data::<web::Data<TokenService>>().ok_or_else(|| {
        error!("TokenService is not registered as app data");
        AuthError::DatabaseError("token service not configured".to_string())
    })?;

    let token = extract_cookie_token(req, ACCESS_COOKIE_NAME)
        .or_else(|| bearer_token(req))
        .ok_or(AuthError::MissingToken)?;

    tokens.verify_access(&token).map(Into::into).map_err(|e| {
        debug!("Rejected access token on {}: {}", req.path(), e);
        e.into()
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthExtractError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
