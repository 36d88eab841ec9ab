// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{ProfileChanges, UpdateProfileRequest, User},
    services::UserService,
    utils::jwt::Claims,
};

pub async fn list_users(State(users): State<UserService>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(users.list_all().await?))
}

/// Public profile of any user.
pub async fn get_user(
    State(users): State<UserService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(find_user(&users, id).await?))
}

/// Get current user's profile.
pub async fn get_me(
    State(users): State<UserService>,
    claims: Claims,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(find_user(&users, claims.user_id()?).await?))
}

/// Edit the current user's names, bio and profile image URL.
pub async fn update_me(
    State(users): State<UserService>,
    claims: Claims,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let changes = ProfileChanges {
        first_name: payload.first_name,
        last_name: payload.last_name,
        bio: payload.bio,
        profile_image_url: payload.profile_image_url,
    };

    if !users.update_profile(user_id, &changes).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(find_user(&users, user_id).await?))
}

async fn find_user(users: &UserService, id: i64) -> Result<User, AppError> {
    users
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
}
