//! API routes configuration
//!
//! All JSON endpoints live under `/api`; `/dashboard` sits outside it and is
//! guarded by the edge gate instead of per-handler checks.

use crate::error::ApiError;
use crate::handlers::{analytics, auth, dashboard, health, tasks};
use actix_web::{web, HttpRequest};

/// Request bodies are small JSON documents.
pub const MAX_JSON_BODY_BYTES: usize = 64 * 1024;

/// Configure all routes
///
/// - POST /api/auth/register, /api/auth/login, /api/auth/refresh, /api/auth/logout
/// - GET /api/auth/me
/// - GET, POST /api/tasks
/// - PUT, DELETE /api/tasks/{id}
/// - GET /api/analytics?days=N
/// - GET /api/healthcheck
/// - GET /dashboard
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register_handler))
                        .route("/login", web::post().to(auth::login_handler))
                        .route("/refresh", web::post().to(auth::refresh_handler))
                        .route("/logout", web::post().to(auth::logout_handler))
                        .route("/me", web::get().to(auth::me_handler)),
                )
                .service(
                    web::resource("/tasks")
                        .route(web::get().to(tasks::list_tasks))
                        .route(web::post().to(tasks::create_task_handler)),
                )
                .service(
                    web::resource("/tasks/{id}")
                        .route(web::put().to(tasks::update_task_handler))
                        .route(web::delete().to(tasks::delete_task_handler)),
                )
                .route("/analytics", web::get().to(analytics::analytics_handler))
                .route("/healthcheck", web::get().to(health::healthcheck_handler)),
        )
        .route("/dashboard", web::get().to(dashboard::dashboard_handler));
}

/// Malformed bodies answer with the validation error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY_BYTES)
        .error_handler(|err, _req: &HttpRequest| {
            log::debug!("Rejected JSON body: {}", err);
            ApiError::validation("body", err.to_string()).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        log::debug!("Rejected query string: {}", err);
        ApiError::validation("query", err.to_string()).into()
    })
}
