//! Logout handler
//!
//! POST /api/auth/logout - Clears both token cookies

use actix_web::{web, HttpResponse};
use taskdeck_auth::create_logout_cookies;

use crate::AppContext;

/// POST /api/auth/logout
///
/// Tokens already issued stay valid until they expire.
pub async fn logout_handler(ctx: web::Data<AppContext>) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    for cookie in create_logout_cookies(&ctx.cookie_config()) {
        response.cookie(cookie);
    }

    response.json(serde_json::json!({
        "message": "Logged out successfully"
    }))
}
