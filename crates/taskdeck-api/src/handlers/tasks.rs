//! Task handlers
//!
//! Every operation is scoped to the authenticated owner. A task that does
//! not exist and a task owned by someone else produce the same 404.

use actix_web::{web, HttpResponse};
use log::{debug, info};
use taskdeck_auth::AuthenticatedUser;
use taskdeck_commons::TaskId;
use taskdeck_core::{apply_update, create_task, TaskDraft, TaskPatch};

use crate::error::ApiError;
use crate::models::{TaskEnvelope, TaskListResponse};
use crate::AppContext;

/// GET /api/tasks - newest first
pub async fn list_tasks(ctx: web::Data<AppContext>, user: AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    let tasks = ctx.tasks().list_by_owner(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(TaskListResponse { tasks }))
}

/// POST /api/tasks
pub async fn create_task_handler(
    ctx: web::Data<AppContext>,
    user: AuthenticatedUser,
    body: web::Json<TaskDraft>,
) -> Result<HttpResponse, ApiError> {
    let draft = body.into_inner();
    draft.validate()?;

    let task = create_task(&user.user_id, draft, TaskId::generate(), ctx.clock().now());
    let task = ctx.tasks().insert(task).await?;
    info!("User {} created task {}", user.user_id, task.id);

    Ok(HttpResponse::Created().json(TaskEnvelope {
        message: "Task created",
        task,
    }))
}

/// PUT /api/tasks/{id}
///
/// Partial update; absent fields keep their values. `completedAt` follows
/// the status transition.
pub async fn update_task_handler(
    ctx: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<TaskPatch>,
) -> Result<HttpResponse, ApiError> {
    let task_id = TaskId::new(path.into_inner());
    let patch = body.into_inner();
    patch.validate()?;

    let current = ctx
        .tasks()
        .find_owned(&user.user_id, &task_id)
        .await?
        .ok_or(ApiError::NotFoundOrForbidden)?;

    let updated = apply_update(&current, &patch, ctx.clock().now());
    let task = ctx
        .tasks()
        .update_owned(&user.user_id, updated)
        .await?
        // Deleted between the read and the write.
        .ok_or(ApiError::NotFoundOrForbidden)?;

    debug!("User {} updated task {} ({} -> {})", user.user_id, task.id, current.status, task.status);

    Ok(HttpResponse::Ok().json(TaskEnvelope {
        message: "Task updated",
        task,
    }))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task_handler(
    ctx: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let task_id = TaskId::new(path.into_inner());

    if !ctx.tasks().delete_owned(&user.user_id, &task_id).await? {
        return Err(ApiError::NotFoundOrForbidden);
    }
    info!("User {} deleted task {}", user.user_id, task_id);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Task deleted" })))
}
