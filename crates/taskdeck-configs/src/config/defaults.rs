//! Serde default functions for [`super::ServerConfig`].

pub fn default_true() -> bool {
    true
}

// Server
pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    3000
}

pub fn default_workers() -> usize {
    0 // 0 = one worker per CPU
}

pub fn default_keepalive_seconds() -> u64 {
    75
}

// Logging
pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

// Auth

/// Default access-token secret - MUST be overridden in production.
pub fn default_access_token_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

/// Default refresh-token secret - MUST be overridden in production.
pub fn default_refresh_token_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

pub fn default_access_token_ttl_minutes() -> i64 {
    15
}

pub fn default_refresh_token_ttl_days() -> i64 {
    7
}

pub fn default_cookie_secure() -> bool {
    true
}

pub fn default_bcrypt_cost() -> u32 {
    10
}

pub fn default_min_password_length() -> usize {
    6
}

pub fn default_max_password_length() -> usize {
    72 // bcrypt input limit
}

// Rate limiting
pub fn default_rate_limit_max_requests() -> u32 {
    100 // per client per window
}

pub fn default_rate_limit_window_seconds() -> u64 {
    60
}

// Edge gate
pub fn default_protected_prefix() -> String {
    "/dashboard".to_string()
}

pub fn default_login_path() -> String {
    "/login".to_string()
}

pub fn default_hsts_max_age_seconds() -> u64 {
    63_072_000 // two years
}

// Analytics
pub fn default_lookback_days() -> u32 {
    7
}

pub fn default_max_lookback_days() -> u32 {
    90
}

pub fn default_reporting_utc_offset_minutes() -> i32 {
    0
}

// CORS
pub fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

pub fn default_cors_headers() -> Vec<String> {
    ["Authorization", "Content-Type", "Accept", "Origin"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

pub fn default_cors_max_age() -> u64 {
    3600
}
