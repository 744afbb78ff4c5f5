use crate::limiter::{RateLimitStatus, RateLimiter};
use std::sync::Arc;
use taskdeck_auth::{AccessClaims, AuthError, TokenService};
use taskdeck_configs::EdgeSettings;

/// What the edge does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Pass to the handler. `claims` is set when a protected path was
    /// unlocked by a valid access token.
    Admit {
        status: RateLimitStatus,
        claims: Option<AccessClaims>,
    },
    /// Reject with 429.
    RateLimited(RateLimitStatus),
    /// Protected path without a usable access token.
    RedirectToLogin { status: RateLimitStatus, reason: AuthError },
}

/// Framework-independent admission decision.
///
/// The rate check runs first for every request, authenticated or not. Only
/// then is the protected-prefix check applied. Expired access tokens are not
/// refreshed here; the client is sent to the login page.
pub struct EdgeGate {
    limiter: Arc<RateLimiter>,
    tokens: Arc<TokenService>,
    protected_prefix: String,
    login_path: String,
}

impl EdgeGate {
    pub fn new(
        limiter: Arc<RateLimiter>,
        tokens: Arc<TokenService>,
        protected_prefix: impl Into<String>,
        login_path: impl Into<String>,
    ) -> Self {
        let prefix: String = protected_prefix.into();
        Self {
            limiter,
            tokens,
            protected_prefix: prefix.trim_end_matches('/').to_string(),
            login_path: login_path.into(),
        }
    }

    pub fn from_settings(settings: &EdgeSettings, limiter: Arc<RateLimiter>, tokens: Arc<TokenService>) -> Self {
        Self::new(limiter, tokens, settings.protected_prefix.as_str(), settings.login_path.as_str())
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// `/dashboard` and `/dashboard/...` are protected; `/dashboards` is not.
    pub fn is_protected(&self, path: &str) -> bool {
        if self.protected_prefix.is_empty() {
            return true;
        }
        match path.strip_prefix(self.protected_prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    pub fn evaluate(&self, client_id: &str, path: &str, access_token: Option<&str>) -> GateDecision {
        let status = self.limiter.check(client_id);
        if !status.allowed {
            return GateDecision::RateLimited(status);
        }

        if !self.is_protected(path) {
            return GateDecision::Admit { status, claims: None };
        }

        let token = match access_token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                return GateDecision::RedirectToLogin {
                    status,
                    reason: AuthError::MissingToken,
                }
            }
        };

        match self.tokens.verify_access(token) {
            Ok(claims) => GateDecision::Admit {
                status,
                claims: Some(claims),
            },
            Err(reason) => GateDecision::RedirectToLogin { status, reason },
        }
    }
}
