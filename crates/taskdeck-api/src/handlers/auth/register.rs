//! Registration handler
//!
//! POST /api/auth/register

use actix_web::{web, HttpResponse};
use log::info;
use taskdeck_auth::password::hash_password;
use taskdeck_auth::{normalize_email, AuthError};
use taskdeck_commons::{User, UserId};

use super::models::{AuthResponse, RegisterRequest};
use crate::error::ApiError;
use crate::models::UserInfo;
use crate::AppContext;

/// POST /api/auth/register
///
/// Validates the body, hashes the password on the blocking pool and stores
/// the user. Duplicate emails are a 400 on the `email` field.
pub async fn register_handler(
    ctx: web::Data<AppContext>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let settings = &ctx.config().auth;
    request.validate(settings.min_password_length, settings.max_password_length)?;

    let email = normalize_email(&request.email);

    // Skip the bcrypt work for an address that is already taken.
    match ctx.users().get_by_email(&email).await {
        Ok(_) => return Err(AuthError::EmailTaken.into()),
        Err(AuthError::UserNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let password_hash = hash_password(&request.password, settings.bcrypt_cost).await?;
    let user = ctx
        .users()
        .create_user(User {
            id: UserId::generate(),
            email,
            name: request.name.trim().to_string(),
            password_hash,
            created_at: ctx.clock().now(),
        })
        .await?;

    info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully",
        user: UserInfo::from(&user),
    }))
}
