//! Current user handler
//!
//! GET /api/auth/me

use actix_web::{web, HttpResponse};
use taskdeck_auth::{AuthError, AuthenticatedUser};

use super::models::CurrentUserResponse;
use crate::error::ApiError;
use crate::models::UserInfo;
use crate::AppContext;

/// GET /api/auth/me
///
/// Always 200: anonymous callers and deleted users get `{"user": null}`.
pub async fn me_handler(
    ctx: web::Data<AppContext>,
    auth: Option<AuthenticatedUser>,
) -> Result<HttpResponse, ApiError> {
    let user = match auth {
        Some(auth) => match ctx.users().get_by_id(&auth.user_id).await {
            Ok(user) => Some(UserInfo::from(&user)),
            Err(AuthError::UserNotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    Ok(HttpResponse::Ok().json(CurrentUserResponse { user }))
}
