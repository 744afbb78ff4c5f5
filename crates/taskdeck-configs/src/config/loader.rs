use super::defaults::{default_access_token_secret, default_refresh_token_secret};
use super::types::ServerConfig;
use crate::file_helpers::normalize_dir_path;
use std::fs;
use std::path::Path;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_LOG_FORMATS: [&str; 2] = ["compact", "json"];

impl ServerConfig {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate the result.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text. Missing sections take defaults.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let mut config: ServerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.apply_env_overrides()?;
        config.finalize()?;

        Ok(config)
    }

    /// Apply environment variable overrides for deployment-specific settings.
    ///
    /// Supported variables:
    /// - TASKDECK_SERVER_HOST / TASKDECK_SERVER_PORT
    /// - TASKDECK_LOG_LEVEL
    /// - TASKDECK_COOKIE_SECURE
    /// - JWT_ACCESS_SECRET / JWT_REFRESH_SECRET
    ///
    /// Environment values take precedence over the TOML file.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::apply_env_overrides`] with an injectable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TASKDECK_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port_str) = lookup("TASKDECK_SERVER_PORT") {
            self.server.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid TASKDECK_SERVER_PORT value: {}", port_str))?;
        }

        if let Some(level) = lookup("TASKDECK_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        if let Some(val) = lookup("TASKDECK_COOKIE_SECURE") {
            let val = val.to_lowercase();
            self.auth.cookie_secure = val == "true" || val == "1" || val == "yes";
        }

        if let Some(secret) = lookup("JWT_ACCESS_SECRET") {
            self.auth.access_token_secret = secret;
        }

        if let Some(secret) = lookup("JWT_REFRESH_SECRET") {
            self.auth.refresh_token_secret = secret;
        }

        Ok(())
    }

    fn normalize_paths(&mut self) {
        self.logging.logs_path = normalize_dir_path(&self.logging.logs_path);
    }

    /// Normalize local filesystem paths and validate configuration.
    ///
    /// Call this after applying environment overrides.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.normalize_paths();
        self.validate()?;

        if self.auth.access_token_secret == default_access_token_secret()
            || self.auth.refresh_token_secret == default_refresh_token_secret()
        {
            log::warn!(
                "Using built-in token secrets; set JWT_ACCESS_SECRET and JWT_REFRESH_SECRET before deploying"
            );
        }

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_LOG_FORMATS.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    VALID_LOG_LEVELS.join(", ")
                ));
            }
        }

        self.validate_auth()?;

        if self.rate_limit.max_requests == 0 {
            return Err(anyhow::anyhow!("rate_limit.max_requests cannot be 0"));
        }
        if self.rate_limit.window_seconds == 0 {
            return Err(anyhow::anyhow!("rate_limit.window_seconds cannot be 0"));
        }

        if !self.edge.protected_prefix.starts_with('/') || !self.edge.login_path.starts_with('/') {
            return Err(anyhow::anyhow!("edge.protected_prefix and edge.login_path must start with '/'"));
        }
        let prefix = self.edge.protected_prefix.trim_end_matches('/');
        if !prefix.is_empty()
            && (self.edge.login_path == prefix
                || self.edge.login_path.starts_with(&format!("{}/", prefix)))
        {
            return Err(anyhow::anyhow!(
                "edge.login_path '{}' lies under the protected prefix '{}'",
                self.edge.login_path,
                self.edge.protected_prefix
            ));
        }

        let analytics = &self.analytics;
        if analytics.max_lookback_days == 0 {
            return Err(anyhow::anyhow!("analytics.max_lookback_days cannot be 0"));
        }
        if analytics.default_lookback_days == 0
            || analytics.default_lookback_days > analytics.max_lookback_days
        {
            return Err(anyhow::anyhow!(
                "analytics.default_lookback_days ({}) must be between 1 and max_lookback_days ({})",
                analytics.default_lookback_days,
                analytics.max_lookback_days
            ));
        }
        if analytics.reporting_utc_offset_minutes.abs() >= 24 * 60 {
            return Err(anyhow::anyhow!(
                "analytics.reporting_utc_offset_minutes must be within (-1440, 1440)"
            ));
        }

        Ok(())
    }

    fn validate_auth(&self) -> anyhow::Result<()> {
        let auth = &self.auth;

        if auth.access_token_secret.is_empty() || auth.refresh_token_secret.is_empty() {
            return Err(anyhow::anyhow!("Token secrets cannot be empty"));
        }
        if auth.access_token_secret == auth.refresh_token_secret {
            return Err(anyhow::anyhow!(
                "access_token_secret and refresh_token_secret must be different"
            ));
        }
        if auth.access_token_ttl_minutes <= 0 || auth.refresh_token_ttl_days <= 0 {
            return Err(anyhow::anyhow!("Token lifetimes must be positive"));
        }
        if !(4..=31).contains(&auth.bcrypt_cost) {
            return Err(anyhow::anyhow!("bcrypt_cost must be between 4 and 31"));
        }
        if auth.max_password_length > 72 {
            return Err(anyhow::anyhow!("max_password_length cannot exceed 72 (bcrypt limit)"));
        }
        if auth.min_password_length == 0 || auth.min_password_length > auth.max_password_length {
            return Err(anyhow::anyhow!(
                "min_password_length ({}) must be between 1 and max_password_length ({})",
                auth.min_password_length,
                auth.max_password_length
            ));
        }

        Ok(())
    }
}
