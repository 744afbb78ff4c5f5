//! Token refresh handler
//!
//! POST /api/auth/refresh - Issues a new access token from the refresh cookie

use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, warn};
use taskdeck_auth::{create_access_cookie, extract_cookie_token, AuthError, REFRESH_COOKIE_NAME};

use crate::error::ApiError;
use crate::AppContext;

fn rejected(reason: AuthError) -> ApiError {
    debug!("Refresh token rejected: {}", reason);
    ApiError::Forbidden("Invalid refresh token".to_string())
}

/// POST /api/auth/refresh
///
/// Missing cookie is 401, an unverifiable token is 403, and a token whose
/// owner no longer exists is 401. Only the access cookie is replaced; the
/// refresh token keeps its original expiry.
pub async fn refresh_handler(req: HttpRequest, ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let refresh_token = extract_cookie_token(&req, REFRESH_COOKIE_NAME).ok_or(ApiError::Unauthenticated)?;

    let tokens = ctx.tokens();
    let claims = tokens.verify_refresh(&refresh_token).map_err(rejected)?;

    let user = match ctx.users().get_by_id(&claims.owner_id).await {
        Ok(user) => user,
        Err(AuthError::UserNotFound(_)) => {
            warn!("Refresh for unknown user {}", claims.owner_id);
            return Err(ApiError::Unauthenticated);
        }
        Err(e) => return Err(e.into()),
    };

    let access_token = tokens.rotate_access(&refresh_token, &user.email).map_err(rejected)?;
    let cookie = create_access_cookie(&access_token, tokens.access_ttl(), &ctx.cookie_config());

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "message": "Token refreshed" })))
}
