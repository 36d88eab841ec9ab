// src/models/comment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::html::clean_html;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub post_id: i64,
    pub author_id: i64,
    /// Set on replies; top-level comments have none.
    pub parent_comment_id: Option<i64>,
}

/// A comment with its author's display name.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub post_id: i64,
    pub author_id: i64,
    pub parent_comment_id: Option<i64>,
    pub author_name: String,
}

/// A comment and its replies, recursively.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentView,
    pub replies: Vec<CommentThread>,
}

/// Single comment lookup: the comment, the post it belongs to and its direct replies.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: CommentView,
    pub post_title: String,
    #[sqlx(skip)]
    pub replies: Vec<CommentView>,
}

/// Values for a new comment or reply. The parent is set by the service.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: i64,
    pub author_id: i64,
}

/// DTO for creating or editing a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Comment must be between 1 and 5000 characters"
    ))]
    pub content: String,
}

impl CreateCommentRequest {
    /// Strips unsafe HTML and surrounding whitespace from the content.
    pub fn sanitized(self) -> Self {
        Self {
            content: clean_html(&self.content).trim().to_string(),
        }
    }
}
