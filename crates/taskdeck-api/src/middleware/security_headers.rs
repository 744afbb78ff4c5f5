use actix_web::http::header::{
    HeaderMap, HeaderName, HeaderValue, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
    X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};

/// Headers stamped on every response leaving the edge.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeaders {
    pub fn new(hsts_max_age_seconds: u64) -> Self {
        let hsts = format!("max-age={}; includeSubDomains; preload", hsts_max_age_seconds);
        let headers = vec![
            (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
            (X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
            (
                STRICT_TRANSPORT_SECURITY,
                HeaderValue::from_str(&hsts).unwrap_or_else(|_| HeaderValue::from_static("max-age=63072000")),
            ),
            (REFERRER_POLICY, HeaderValue::from_static("origin-when-cross-origin")),
            (HeaderName::from_static("x-dns-prefetch-control"), HeaderValue::from_static("on")),
            (X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
        ];
        Self { headers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(HeaderName, HeaderValue)> {
        self.headers.iter()
    }
}

/// Insert (overwriting) every security header into `map`.
pub fn apply_security_headers(map: &mut HeaderMap, headers: &SecurityHeaders) {
    for (name, value) in headers.iter() {
        map.insert(name.clone(), value.clone());
    }
}
