//! Client identifier extraction for rate limiting
//!
//! The identifier is the originating IP as seen through common reverse-proxy
//! headers, falling back to the socket peer.

use actix_web::HttpRequest;
use log::warn;

/// Identifier used when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the client identifier for a request.
///
/// Order:
/// 1. first entry of `X-Forwarded-For`
/// 2. `X-Real-IP`
/// 3. socket peer address
/// 4. [`UNKNOWN_CLIENT`]
///
/// Loopback values in proxy headers are ignored so a spoofed
/// `X-Forwarded-For: 127.0.0.1` cannot masquerade as a local caller.
pub fn extract_client_id(req: &HttpRequest) -> String {
    if let Some(forwarded) = header_str(req, "X-Forwarded-For") {
        let first_ip = forwarded.split(',').next().unwrap_or("").trim();
        if is_localhost_address(first_ip) {
            warn!("Ignoring loopback value in X-Forwarded-For: '{}'", first_ip);
        } else if !first_ip.is_empty() {
            return first_ip.to_string();
        }
    }

    if let Some(real_ip) = header_str(req, "X-Real-IP") {
        let trimmed = real_ip.trim();
        if !trimmed.is_empty() && !is_localhost_address(trimmed) {
            return trimmed.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|h| h.to_str().ok())
}

/// Check if an address string represents localhost
#[inline]
pub fn is_localhost_address(ip: &str) -> bool {
    ip == "::1" || ip.starts_with("127.") || ip.eq_ignore_ascii_case("localhost")
}
