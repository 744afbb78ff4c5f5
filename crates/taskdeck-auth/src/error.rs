use thiserror::Error;

/// Authentication failures.
///
/// Token-related variants carry the precise reason for logging; everything
/// user-facing collapses them into one uniform response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication token is missing")]
    MissingToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("A user with this email already exists")]
    EmailTaken,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Token encoding failed: {0}")]
    TokenEncoding(String),

    #[error("Storage error: {0}")]
    DatabaseError(String),
}

impl AuthError {
    /// True for every variant that means "this token cannot be trusted".
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::TokenExpired
                | AuthError::InvalidSignature
                | AuthError::MalformedToken(_)
                | AuthError::MissingClaim(_)
        )
    }

    /// True when the failure is ours, not the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::HashingError(_) | AuthError::TokenEncoding(_) | AuthError::DatabaseError(_)
        )
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
