// src/services/notifications.rs

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::notification::{NewNotification, Notification},
};

/// How many notifications `recent` returns when the caller doesn't say.
pub const DEFAULT_RECENT_TAKE: i64 = 10;

#[derive(Clone)]
pub struct NotificationService {
    pool: SqlitePool,
}

impl NotificationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, notification: &NewNotification) -> Result<Notification, AppError> {
        let stored = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, post_id, comment_id, message, is_read, created_at)
            VALUES (?, ?, ?, ?, FALSE, ?)
            RETURNING id, user_id, post_id, comment_id, message, is_read, created_at
            "#,
        )
        .bind(notification.user_id)
        .bind(notification.post_id)
        .bind(notification.comment_id)
        .bind(&notification.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(notification_id = stored.id, user_id = stored.user_id, "Notification created");
        Ok(stored)
    }

    pub async fn unread_count(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// The user's latest `take` notifications, newest first.
    pub async fn recent(&self, user_id: i64, take: i64) -> Result<Vec<Notification>, AppError> {
        // A negative LIMIT means "no limit" to SQLite.
        let take = take.max(0);

        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, post_id, comment_id, message, is_read, created_at
            FROM notifications
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(take)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Marks every unread notification of the user as read and returns how
    /// many flipped; 0 means there was nothing to do.
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, AppError> {
        let flipped = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = ? AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(flipped)
    }
}
