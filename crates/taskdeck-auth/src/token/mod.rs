//! Access/refresh token lifecycle
//!
//! Two HS256 JWT flavors signed with separate secrets:
//!
//! - access: `{ownerId, email, iat, exp}`, short-lived, authorizes requests
//! - refresh: `{ownerId, iat, exp}`, long-lived, only mints new access tokens
//!
//! Expiry is judged against the injected [`taskdeck_commons::Clock`], never
//! the wall clock, so issuance and verification are reproducible in tests.

mod claims;
mod service;

pub use claims::{AccessClaims, Claims, RefreshClaims, TokenKind};
pub use service::TokenService;
