//! GET /dashboard
//!
//! Protected page. The edge gate has already verified the access token and
//! attached its claims, so the extractor reads them from the request.

use actix_web::{web, HttpResponse};
use taskdeck_auth::AuthenticatedUser;

use crate::error::ApiError;
use crate::models::Board;
use crate::AppContext;

pub async fn dashboard_handler(
    ctx: web::Data<AppContext>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let tasks = ctx.tasks().list_by_owner(&user.user_id).await?;
    let board = Board::from_tasks(tasks);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user": { "id": user.user_id, "email": user.email },
        "board": board,
    })))
}
