// src/models/notification.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'notifications' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    /// Recipient.
    pub user_id: i64,
    pub post_id: i64,
    pub comment_id: Option<i64>,
    pub message: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub post_id: i64,
    pub comment_id: Option<i64>,
    pub message: String,
}

/// Query parameters for listing recent notifications.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub take: Option<i64>,
}
