//! Server-wide middleware configuration helpers.
//!
//! Middleware stack, outermost first:
//!
//! 1. **EdgeGate** (from `taskdeck-api`): rate limiting, protected-path
//!    redirects and security headers. Every request, preflights included,
//!    is counted here first.
//! 2. **Logger**: request/response logging
//! 3. **CORS** (actix-cors), which answers preflights admitted by the gate
//!
//! actix applies the last `.wrap()` outermost, so the app registers them in
//! reverse order.

use actix_cors::Cors;
use actix_web::http::{header::HeaderName, Method};
use actix_web::middleware;
use log::debug;
use taskdeck_configs::CorsSettings;

/// Build CORS middleware from the `[security.cors]` settings.
pub fn build_cors_from_config(cors_config: &CorsSettings) -> Cors {
    let mut cors = Cors::default();

    if cors_config.allowed_origins.is_empty() || cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
        debug!("CORS: Allowing any origin");
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        debug!("CORS: Allowed origins: {:?}", cors_config.allowed_origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    if !methods.is_empty() {
        cors = cors.allowed_methods(methods);
    }

    if cors_config.allowed_headers.iter().any(|h| h == "*") {
        cors = cors.allow_any_header();
    } else {
        let headers: Vec<HeaderName> = cors_config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        if !headers.is_empty() {
            cors = cors.allowed_headers(headers);
        }
    }

    // The limiter headers are useful to browser clients.
    cors = cors.expose_headers([
        HeaderName::from_static("retry-after"),
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderName::from_static("x-ratelimit-reset"),
    ]);

    if cors_config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors.max_age(usize::try_from(cors_config.max_age).ok())
}

/// Build the request logger middleware.
pub fn request_logger() -> middleware::Logger {
    middleware::Logger::new("%{r}a \"%r\" %s %b %Dms")
}
