// src/handlers/notifications.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::notification::RecentParams,
    services::{NotificationService, notifications::DEFAULT_RECENT_TAKE},
    utils::jwt::Claims,
};

const MAX_RECENT_TAKE: i64 = 100;

/// The current user's latest notifications, newest first.
pub async fn list_notifications(
    State(notifications): State<NotificationService>,
    claims: Claims,
    Query(params): Query<RecentParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let take = params
        .take
        .unwrap_or(DEFAULT_RECENT_TAKE)
        .clamp(1, MAX_RECENT_TAKE);

    Ok(Json(notifications.recent(user_id, take).await?))
}

pub async fn unread_count(
    State(notifications): State<NotificationService>,
    claims: Claims,
) -> Result<impl IntoResponse, AppError> {
    let count = notifications.unread_count(claims.user_id()?).await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn mark_all_read(
    State(notifications): State<NotificationService>,
    claims: Claims,
) -> Result<impl IntoResponse, AppError> {
    let marked = notifications.mark_all_read(claims.user_id()?).await?;
    Ok(Json(json!({ "marked": marked })))
}
