// src/services/comments.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::comment::{Comment, CommentDetail, CommentThread, CommentView, NewComment},
};

/// Comment columns joined with the author's display name.
macro_rules! view_select {
    () => {
        r#"
        SELECT
            c.id, c.content, c.created_at, c.updated_at, c.post_id, c.author_id,
            c.parent_comment_id,
            TRIM(u.first_name || ' ' || u.last_name) AS author_name
        FROM comments c
        JOIN users u ON u.id = c.author_id
        "#
    };
}

const COMMENT_COLUMNS: &str =
    "id, content, created_at, updated_at, post_id, author_id, parent_comment_id";

/// Every comment on a post, replies included, oldest first.
pub(crate) async fn fetch_post_comments(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<CommentView>, AppError> {
    let comments = sqlx::query_as::<_, CommentView>(concat!(
        view_select!(),
        "WHERE c.post_id = ? ORDER BY c.created_at ASC, c.id ASC"
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Arranges a flat, oldest-first list into top-level threads.
///
/// Each comment is visited once, so a malformed parent chain can only drop
/// comments, never loop.
pub fn build_threads(comments: Vec<CommentView>) -> Vec<CommentThread> {
    let mut children: HashMap<Option<i64>, Vec<CommentView>> = HashMap::new();
    for comment in comments {
        children
            .entry(comment.parent_comment_id)
            .or_default()
            .push(comment);
    }

    fn attach(
        parent: Option<i64>,
        children: &mut HashMap<Option<i64>, Vec<CommentView>>,
    ) -> Vec<CommentThread> {
        children
            .remove(&parent)
            .unwrap_or_default()
            .into_iter()
            .map(|comment| {
                let replies = attach(Some(comment.id), children);
                CommentThread { comment, replies }
            })
            .collect()
    }

    attach(None, &mut children)
}

#[derive(Clone)]
pub struct CommentService {
    pool: SqlitePool,
}

impl CommentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Top-level comments of a post with their reply trees, oldest first.
    pub async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentThread>, AppError> {
        let comments = fetch_post_comments(&self.pool, post_id).await?;
        Ok(build_threads(comments))
    }

    /// A comment with its author, parent post title and direct replies.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<CommentDetail>, AppError> {
        let Some(mut detail) = sqlx::query_as::<_, CommentDetail>(
            r#"
            SELECT
                c.id, c.content, c.created_at, c.updated_at, c.post_id, c.author_id,
                c.parent_comment_id,
                TRIM(u.first_name || ' ' || u.last_name) AS author_name,
                p.title AS post_title
            FROM comments c
            JOIN users u ON u.id = c.author_id
            JOIN posts p ON p.id = c.post_id
            WHERE c.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        detail.replies = sqlx::query_as::<_, CommentView>(concat!(
            view_select!(),
            "WHERE c.parent_comment_id = ? ORDER BY c.created_at ASC, c.id ASC"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(detail))
    }

    /// Stores a new top-level comment.
    pub async fn create(&self, comment: &NewComment) -> Result<Comment, AppError> {
        let stored = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (content, created_at, post_id, author_id) \
             VALUES (?, ?, ?, ?) RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(&comment.content)
        .bind(Utc::now())
        .bind(comment.post_id)
        .bind(comment.author_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(comment_id = stored.id, post_id = stored.post_id, "Comment created");
        Ok(stored)
    }

    /// Stores `comment` as a reply to `parent_comment_id`.
    ///
    /// The parent must exist on the same post. A fresh row can never be its
    /// own ancestor, so no cycle check is needed.
    pub async fn reply(
        &self,
        parent_comment_id: i64,
        comment: &NewComment,
    ) -> Result<Comment, AppError> {
        let mut tx = self.pool.begin().await?;

        let parent_post_id =
            sqlx::query_scalar::<_, i64>("SELECT post_id FROM comments WHERE id = ?")
                .bind(parent_comment_id)
                .fetch_optional(&mut *tx)
                .await?;

        if parent_post_id != Some(comment.post_id) {
            return Err(AppError::NotFound("Parent comment not found".to_string()));
        }

        let stored = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (content, created_at, post_id, author_id, parent_comment_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(&comment.content)
        .bind(Utc::now())
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(parent_comment_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            comment_id = stored.id,
            parent_comment_id,
            post_id = stored.post_id,
            "Reply created"
        );
        Ok(stored)
    }

    /// Replaces the content of comment `id` and stamps `updated_at`.
    /// Returns `false` when the comment doesn't exist.
    pub async fn update(&self, id: i64, content: &str) -> Result<bool, AppError> {
        let updated = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(updated > 0)
    }

    /// Deletes comment `id`; its replies go with it. Returns `false` when it
    /// doesn't exist.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted > 0 {
            tracing::info!(comment_id = id, "Comment deleted");
        }
        Ok(deleted > 0)
    }
}
