// src/handlers/comments.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        comment::{CommentDetail, CreateCommentRequest, NewComment},
        notification::NewNotification,
    },
    services::{CommentService, NotificationService, PostService, UserService},
    utils::jwt::Claims,
};

/// Top-level comments of a post with their replies, oldest first.
pub async fn list_comments(
    State(posts): State<PostService>,
    State(comments): State<CommentService>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !posts.exists(post_id).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    Ok(Json(comments.list_by_post(post_id).await?))
}

/// Get a single comment with its direct replies.
pub async fn get_comment(
    State(comments): State<CommentService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(find_comment(&comments, id).await?))
}

/// Comment on a post. The post's author is notified unless commenting on
/// their own post.
/// Requires: Login.
pub async fn create_comment(
    State(posts): State<PostService>,
    State(comments): State<CommentService>,
    State(notifications): State<NotificationService>,
    State(users): State<UserService>,
    claims: Claims,
    Path(post_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.sanitized();
    payload.validate()?;
    let user_id = claims.user_id()?;

    let post = posts
        .get_by_id(post_id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let actor = actor_name(&users, user_id).await?;

    let comment = comments
        .create(&NewComment {
            content: payload.content,
            post_id,
            author_id: user_id,
        })
        .await?;

    if post.post.author_id != user_id {
        notify(
            &notifications,
            NewNotification {
                user_id: post.post.author_id,
                post_id,
                comment_id: Some(comment.id),
                message: format!("{} commented on \"{}\"", actor, post.post.title),
            },
        )
        .await;
    }

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Reply to a comment. The parent comment's author is notified unless
/// replying to themselves.
/// Requires: Login.
pub async fn reply_to_comment(
    State(comments): State<CommentService>,
    State(notifications): State<NotificationService>,
    State(users): State<UserService>,
    claims: Claims,
    Path(parent_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.sanitized();
    payload.validate()?;
    let user_id = claims.user_id()?;

    let parent = find_comment(&comments, parent_id).await?;
    let actor = actor_name(&users, user_id).await?;

    let reply = comments
        .reply(
            parent_id,
            &NewComment {
                content: payload.content,
                post_id: parent.comment.post_id,
                author_id: user_id,
            },
        )
        .await?;

    if parent.comment.author_id != user_id {
        notify(
            &notifications,
            NewNotification {
                user_id: parent.comment.author_id,
                post_id: parent.comment.post_id,
                comment_id: Some(reply.id),
                message: format!(
                    "{} replied to your comment on \"{}\"",
                    actor, parent.post_title
                ),
            },
        )
        .await;
    }

    Ok((StatusCode::CREATED, Json(reply)))
}

/// Edit a comment's content.
/// Requires: Login + Author.
pub async fn update_comment(
    State(comments): State<CommentService>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.sanitized();
    payload.validate()?;
    let user_id = claims.user_id()?;

    let existing = find_comment(&comments, id).await?;
    if existing.comment.author_id != user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to edit this comment".to_string(),
        ));
    }

    comments.update(id, &payload.content).await?;

    Ok(Json(find_comment(&comments, id).await?))
}

/// Delete a comment and its replies.
/// Requires: Login + Author.
pub async fn delete_comment(
    State(comments): State<CommentService>,
    claims: Claims,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let existing = find_comment(&comments, id).await?;
    if existing.comment.author_id != user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this comment".to_string(),
        ));
    }

    comments.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_comment(comments: &CommentService, id: i64) -> Result<CommentDetail, AppError> {
    comments
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Comment not found".to_string()))
}

/// Stores a notification. The triggering comment is already committed, so a
/// failure here is logged and not returned.
async fn notify(notifications: &NotificationService, notification: NewNotification) {
    if let Err(e) = notifications.create(&notification).await {
        tracing::error!(
            user_id = notification.user_id,
            post_id = notification.post_id,
            "Failed to create notification: {}",
            e
        );
    }
}

/// Name shown in notification messages; falls back to the email.
async fn actor_name(users: &UserService, user_id: i64) -> Result<String, AppError> {
    let user = users
        .get_by_id(user_id)
        .await?
        .ok_or(AppError::AuthError("User not found".to_string()))?;

    let name = user.display_name();
    Ok(if name.is_empty() { user.email } else { name })
}
