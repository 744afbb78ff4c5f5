//! Actix-web wrapper around [`EdgeGate`].

use super::edge_gate::{EdgeGate, GateDecision};
use super::security_headers::{apply_security_headers, SecurityHeaders};
use crate::limiter::RateLimitStatus;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use log::{debug, warn};
use std::future::{ready, Ready};
use std::sync::Arc;
use taskdeck_auth::{extract_client_id, extract_cookie_token, ACCESS_COOKIE_NAME};

/// Middleware factory. Register with `App::wrap`.
#[derive(Clone)]
pub struct EdgeGateMiddleware {
    gate: Arc<EdgeGate>,
    headers: Arc<SecurityHeaders>,
}

impl EdgeGateMiddleware {
    pub fn new(gate: Arc<EdgeGate>, hsts_max_age_seconds: u64) -> Self {
        Self {
            gate,
            headers: Arc::new(SecurityHeaders::new(hsts_max_age_seconds)),
        }
    }

    pub fn gate(&self) -> &Arc<EdgeGate> {
        &self.gate
    }
}

impl<S, B> Transform<S, ServiceRequest> for EdgeGateMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = EdgeGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(EdgeGateService {
            service,
            gate: self.gate.clone(),
            headers: self.headers.clone(),
        }))
    }
}

pub struct EdgeGateService<S> {
    service: S,
    gate: Arc<EdgeGate>,
    headers: Arc<SecurityHeaders>,
}

fn rate_limit_headers(map: &mut HeaderMap, status: &RateLimitStatus) {
    let pairs = [
        ("x-ratelimit-limit", status.limit.to_string()),
        ("x-ratelimit-remaining", status.remaining().to_string()),
        ("x-ratelimit-reset", status.resets_at.timestamp().to_string()),
    ];
    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value) {
            map.insert(HeaderName::from_static(name), value);
        }
    }
}

impl<S, B> Service<ServiceRequest> for EdgeGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client_id = extract_client_id(req.request());
        let token = extract_cookie_token(req.request(), ACCESS_COOKIE_NAME);
        let decision = self.gate.evaluate(&client_id, req.path(), token.as_deref());
        let headers = self.headers.clone();

        match decision {
            GateDecision::Admit { status, claims } => {
                if let Some(claims) = claims {
                    req.extensions_mut().insert(claims);
                }
                let fut = self.service.call(req);
                Box::pin(async move {
                    let mut res = fut.await?;
                    rate_limit_headers(res.headers_mut(), &status);
                    apply_security_headers(res.headers_mut(), &headers);
                    Ok(res.map_into_left_body())
                })
            }

            GateDecision::RateLimited(status) => {
                let now = self.gate.limiter().clock().now();
                let retry_after = status.retry_after_seconds(now);
                warn!(
                    "Rate limit exceeded: client={} count={} limit={} path={}",
                    client_id,
                    status.count,
                    status.limit,
                    req.path()
                );

                let mut response = HttpResponse::TooManyRequests()
                    .insert_header(("Retry-After", retry_after.to_string()))
                    .json(serde_json::json!({
                        "error": "rate_limited",
                        "message": "Too many requests, please try again later."
                    }));
                rate_limit_headers(response.headers_mut(), &status);
                apply_security_headers(response.headers_mut(), &headers);

                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }

            GateDecision::RedirectToLogin { status, reason } => {
                debug!(
                    "Redirecting unauthenticated request: client={} path={} reason={}",
                    client_id,
                    req.path(),
                    reason
                );

                let mut response = HttpResponse::SeeOther()
                    .insert_header((LOCATION, self.gate.login_path().to_string()))
                    .finish();
                rate_limit_headers(response.headers_mut(), &status);
                apply_security_headers(response.headers_mut(), &headers);

                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}
