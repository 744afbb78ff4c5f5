// Cookie handling for HttpOnly authentication cookies
//
// Both tokens travel as HttpOnly, SameSite=Strict cookies scoped to "/".
// Max-age mirrors the token lifetime so the browser drops them together.

use actix_web::cookie::time::{Duration as CookieDuration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use chrono::Duration;

/// Cookie name for the access token
pub const ACCESS_COOKIE_NAME: &str = "accessToken";

/// Cookie name for the refresh token
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Configuration for authentication cookies
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Whether to set the Secure flag (should be true in production/HTTPS)
    pub secure: bool,
    /// Cookie path (default: "/")
    pub path: String,
    /// SameSite policy
    pub same_site: SameSite,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            // Only disable for local development without TLS.
            secure: true,
            path: "/".to_string(),
            same_site: SameSite::Strict,
        }
    }
}

impl CookieConfig {
    pub fn with_secure(secure: bool) -> Self {
        Self {
            secure,
            ..Default::default()
        }
    }
}

fn build_cookie<'a>(name: &'a str, value: String, max_age: CookieDuration, config: &CookieConfig) -> Cookie<'a> {
    Cookie::build(name, value)
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .max_age(max_age)
        .finish()
}

/// Create the HttpOnly access-token cookie.
pub fn create_access_cookie<'a>(token: &str, expires_in: Duration, config: &CookieConfig) -> Cookie<'a> {
    build_cookie(
        ACCESS_COOKIE_NAME,
        token.to_string(),
        CookieDuration::seconds(expires_in.num_seconds()),
        config,
    )
}

/// Create the HttpOnly refresh-token cookie.
pub fn create_refresh_cookie<'a>(token: &str, expires_in: Duration, config: &CookieConfig) -> Cookie<'a> {
    build_cookie(
        REFRESH_COOKIE_NAME,
        token.to_string(),
        CookieDuration::seconds(expires_in.num_seconds()),
        config,
    )
}

/// Cookies that make the browser discard both tokens.
///
/// Only the client copy is cleared; an already issued token stays valid until
/// it expires.
pub fn create_logout_cookies<'a>(config: &CookieConfig) -> [Cookie<'a>; 2] {
    [ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME].map(|name| {
        let mut cookie = build_cookie(name, String::new(), CookieDuration::ZERO, config);
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
        cookie
    })
}

/// Read a named cookie value from the request, ignoring empty values.
pub fn extract_cookie_token(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
