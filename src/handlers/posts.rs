// src/handlers/posts.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::post::{CreatePostRequest, NewPost, PostChanges, PostDetail, PostListParams, PostSearch},
    services::{PostService, UserService},
    utils::jwt::Claims,
};

/// Search posts: `q`, `tag`, `sort`, `page`, `page_size`.
pub async fn list_posts(
    State(posts): State<PostService>,
    Query(params): Query<PostListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = posts.search(&PostSearch::from(params)).await?;
    Ok(Json(page))
}

/// Every post, newest first.
pub async fn list_all_posts(
    State(posts): State<PostService>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts.list_all().await?))
}

/// Get a single post by ID, with comments and tags.
pub async fn get_post(
    State(posts): State<PostService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = find_post(&posts, id).await?;
    Ok(Json(post))
}

/// Posts written by one user, newest first.
pub async fn list_user_posts(
    State(posts): State<PostService>,
    State(users): State<UserService>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    users
        .get_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(posts.list_by_author(user_id).await?))
}

/// All tag names, alphabetically.
pub async fn list_tags(State(posts): State<PostService>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts.list_all_tag_names().await?))
}

/// Create a new post.
/// Requires: Login.
pub async fn create_post(
    State(posts): State<PostService>,
    claims: Claims,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.sanitized();
    payload.validate()?;
    let user_id = claims.user_id()?;

    let post = posts
        .create(
            &NewPost {
                title: payload.title,
                content: payload.content,
                image_url: payload.image_url.filter(|url| !url.is_empty()),
                author_id: user_id,
            },
            payload.tags.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Edit a post. Tags are replaced only when the request carries them.
/// An omitted or null `image_url` keeps the current image; an empty string
/// removes it.
/// Requires: Login + Author.
pub async fn update_post(
    State(posts): State<PostService>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.sanitized();
    payload.validate()?;
    let user_id = claims.user_id()?;

    let existing = find_post(&posts, id).await?;
    if existing.post.author_id != user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to edit this post".to_string(),
        ));
    }

    let image_url = match payload.image_url {
        None => existing.post.image_url,
        Some(url) if url.is_empty() => None,
        Some(url) => Some(url),
    };

    let changes = PostChanges {
        id,
        title: payload.title,
        content: payload.content,
        image_url,
    };
    posts.update(&changes, payload.tags.as_deref()).await?;

    Ok(Json(find_post(&posts, id).await?))
}

/// Delete a post with its comments and tag links.
/// Requires: Login + Author.
pub async fn delete_post(
    State(posts): State<PostService>,
    claims: Claims,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let existing = find_post(&posts, id).await?;
    if existing.post.author_id != user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this post".to_string(),
        ));
    }

    posts.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_post(posts: &PostService, id: i64) -> Result<PostDetail, AppError> {
    posts
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))
}
