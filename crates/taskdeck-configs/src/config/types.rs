use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default, alias = "authentication")]
    pub auth: AuthSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub edge: EdgeSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub security: SecuritySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of HTTP workers (0 = number of CPUs)
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_keepalive_seconds")]
    pub keepalive_seconds: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            keepalive_seconds: default_keepalive_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files (default: "./logs")
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides:
    /// [logging.targets]
    /// taskdeck_api = "debug"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

/// Token, cookie and password settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret for access tokens
    #[serde(default = "default_access_token_secret")]
    pub access_token_secret: String,

    /// HMAC secret for refresh tokens; must differ from the access secret
    #[serde(default = "default_refresh_token_secret")]
    pub refresh_token_secret: String,

    /// Access token lifetime in minutes (default: 15)
    #[serde(default = "default_access_token_ttl_minutes")]
    pub access_token_ttl_minutes: i64,

    /// Refresh token lifetime in days (default: 7)
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,

    /// Whether auth cookies require HTTPS (default: true)
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,

    /// Bcrypt cost factor (default: 10, range: 4-31)
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    #[serde(default = "default_max_password_length")]
    pub max_password_length: usize,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            access_token_secret: default_access_token_secret(),
            refresh_token_secret: default_refresh_token_secret(),
            access_token_ttl_minutes: default_access_token_ttl_minutes(),
            refresh_token_ttl_days: default_refresh_token_ttl_days(),
            cookie_secure: default_cookie_secure(),
            bcrypt_cost: default_bcrypt_cost(),
            min_password_length: default_min_password_length(),
            max_password_length: default_max_password_length(),
        }
    }
}

/// Per-client fixed-window request limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Requests admitted per client per window (default: 100)
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 60)
    #[serde(default = "default_rate_limit_window_seconds")]
    pub window_seconds: u64,

    /// Disable to admit every request (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: default_rate_limit_max_requests(),
            window_seconds: default_rate_limit_window_seconds(),
            enabled: true,
        }
    }
}

/// Request admission at the edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSettings {
    /// Paths equal to or below this prefix require a valid access token
    #[serde(default = "default_protected_prefix")]
    pub protected_prefix: String,

    /// Where unauthenticated visitors of protected paths are sent
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// `Strict-Transport-Security` max-age
    #[serde(default = "default_hsts_max_age_seconds")]
    pub hsts_max_age_seconds: u64,
}

impl Default for EdgeSettings {
    fn default() -> Self {
        Self {
            protected_prefix: default_protected_prefix(),
            login_path: default_login_path(),
            hsts_max_age_seconds: default_hsts_max_age_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Series length when the request does not specify one (default: 7)
    #[serde(default = "default_lookback_days")]
    pub default_lookback_days: u32,

    /// Upper bound accepted from requests (default: 90)
    #[serde(default = "default_max_lookback_days")]
    pub max_lookback_days: u32,

    /// Reporting timezone as a fixed offset from UTC in minutes (default: 0)
    #[serde(default = "default_reporting_utc_offset_minutes")]
    pub reporting_utc_offset_minutes: i32,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            default_lookback_days: default_lookback_days(),
            max_lookback_days: default_max_lookback_days(),
            reporting_utc_offset_minutes: default_reporting_utc_offset_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecuritySettings {
    #[serde(default)]
    pub cors: CorsSettings,
}

/// CORS configuration that maps directly to actix-cors options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. Empty list or ["*"] allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,

    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,

    /// Cookies are the credential store, so this defaults to true
    #[serde(default = "default_true")]
    pub allow_credentials: bool,

    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            allow_credentials: true,
            max_age: default_cors_max_age(),
        }
    }
}
