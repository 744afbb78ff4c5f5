//! Health check handler

use actix_web::HttpResponse;

use crate::app_context::SERVER_VERSION;

/// GET /api/healthcheck
pub async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": SERVER_VERSION,
    }))
}
