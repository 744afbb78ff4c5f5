//! GET /api/analytics
//!
//! Daily created/completed counts for the caller's tasks, one entry per
//! day of the window in the reporting timezone, oldest first.

use actix_web::{web, HttpResponse};
use taskdeck_auth::AuthenticatedUser;
use taskdeck_core::{build_series, window_start};

use crate::error::ApiError;
use crate::models::{AnalyticsQuery, AnalyticsResponse};
use crate::AppContext;

pub async fn analytics_handler(
    ctx: web::Data<AppContext>,
    user: AuthenticatedUser,
    query: web::Query<AnalyticsQuery>,
) -> Result<HttpResponse, ApiError> {
    let settings = &ctx.config().analytics;
    let days = query.days.unwrap_or(settings.default_lookback_days);
    if days == 0 || days > settings.max_lookback_days {
        return Err(ApiError::validation(
            "days",
            format!("days must be between 1 and {}", settings.max_lookback_days),
        ));
    }

    let now = ctx.clock().now();
    let offset = ctx.reporting_offset();
    let since = window_start(now, days, offset);

    let tasks = ctx.tasks().find_active_since(&user.user_id, since).await?;
    let data = build_series(&tasks, days, now, offset);

    Ok(HttpResponse::Ok().json(AnalyticsResponse { data }))
}
