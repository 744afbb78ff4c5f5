//! Shared resources for request handlers
//!
//! Built once at startup and handed to actix as `web::Data<AppContext>`.
//! Everything inside is behind an `Arc`, so workers share one limiter, one
//! token service and one set of stores.

use crate::limiter::{RateLimitStore, RateLimiter};
use crate::middleware::{EdgeGate, EdgeGateMiddleware};
use actix_web::web;
use chrono::{FixedOffset, Offset, Utc};
use std::sync::Arc;
use taskdeck_auth::{CookieConfig, TokenService, UserRepository};
use taskdeck_commons::Clock;
use taskdeck_configs::ServerConfig;
use taskdeck_core::TaskRepository;

pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppContext {
    config: Arc<ServerConfig>,
    clock: Arc<dyn Clock>,
    tokens: Arc<TokenService>,
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
    limiter: Arc<RateLimiter>,
    edge_gate: Arc<EdgeGate>,
}

impl AppContext {
    pub fn new(
        config: Arc<ServerConfig>,
        clock: Arc<dyn Clock>,
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        rate_store: Arc<dyn RateLimitStore>,
    ) -> Self {
        let tokens = Arc::new(TokenService::from_settings(&config.auth, clock.clone()));
        let limiter = Arc::new(RateLimiter::from_settings(&config.rate_limit, rate_store, clock.clone()));
        let edge_gate = Arc::new(EdgeGate::from_settings(&config.edge, limiter.clone(), tokens.clone()));

        Self {
            config,
            clock,
            tokens,
            users,
            tasks,
            limiter,
            edge_gate,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    pub fn tasks(&self) -> &Arc<dyn TaskRepository> {
        &self.tasks
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Token service as app data for the `AuthenticatedUser` extractor.
    pub fn token_data(&self) -> web::Data<TokenService> {
        web::Data::from(self.tokens.clone())
    }

    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig::with_secure(self.config.auth.cookie_secure)
    }

    /// Fixed offset used to bucket analytics dates.
    pub fn reporting_offset(&self) -> FixedOffset {
        let seconds = self.config.analytics.reporting_utc_offset_minutes * 60;
        FixedOffset::east_opt(seconds).unwrap_or_else(|| {
            log::warn!("Invalid reporting offset {}s, using UTC", seconds);
            Utc.fix()
        })
    }

    /// The edge middleware, ready for `App::wrap`.
    pub fn edge_middleware(&self) -> EdgeGateMiddleware {
        EdgeGateMiddleware::new(self.edge_gate.clone(), self.config.edge.hsts_max_age_seconds)
    }
}
