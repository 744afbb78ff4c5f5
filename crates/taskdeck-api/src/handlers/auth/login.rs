//! Login handler
//!
//! POST /api/auth/login - Verifies credentials and sets both token cookies

use actix_web::{web, HttpResponse};
use log::{info, warn};
use taskdeck_auth::password::{verify_against_dummy, verify_password};
use taskdeck_auth::{create_access_cookie, create_refresh_cookie, AuthError};

use super::models::{AuthResponse, LoginRequest};
use crate::error::ApiError;
use crate::models::UserInfo;
use crate::AppContext;

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same 401, and both pay for
/// one bcrypt verification.
pub async fn login_handler(
    ctx: web::Data<AppContext>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let user = match ctx.users().get_by_email(&request.email).await {
        Ok(user) => user,
        Err(AuthError::UserNotFound(_)) => {
            verify_against_dummy(&request.password, ctx.config().auth.bcrypt_cost).await?;
            warn!("Login failed: unknown email");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password(&request.password, &user.password_hash).await? {
        warn!("Login failed: wrong password for user {}", user.id);
        return Err(ApiError::InvalidCredentials);
    }

    let tokens = ctx.tokens();
    let access_token = tokens.issue_access_token(&user.id, &user.email)?;
    let refresh_token = tokens.issue_refresh_token(&user.id)?;

    let cookie_config = ctx.cookie_config();
    let access_cookie = create_access_cookie(&access_token, tokens.access_ttl(), &cookie_config);
    let refresh_cookie = create_refresh_cookie(&refresh_token, tokens.refresh_ttl(), &cookie_config);

    info!("User {} logged in", user.id);

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(AuthResponse {
            message: "Login successful",
            user: UserInfo::from(&user),
        }))
}
