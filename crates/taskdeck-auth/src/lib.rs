// Taskdeck Authentication Library
// Dual-token issuance and verification, auth cookies, password hashing,
// user storage and the request extractor used by protected handlers.

pub mod error;
pub mod extractor;
pub mod helpers;
pub mod password;
pub mod token;
pub mod user_repo;

// Re-export commonly used types
pub use error::{AuthError, AuthResult};
pub use extractor::{AuthExtractError, AuthenticatedUser};
pub use helpers::cookie::{
    create_access_cookie, create_logout_cookies, create_refresh_cookie, extract_cookie_token,
    CookieConfig, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME,
};
pub use helpers::ip_extractor::{extract_client_id, is_localhost_address, UNKNOWN_CLIENT};
pub use token::{AccessClaims, Claims, RefreshClaims, TokenKind, TokenService};
pub use user_repo::{normalize_email, InMemoryUserRepository, UserRepository};
