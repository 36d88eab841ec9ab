// src/services/users.rs

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{NewUser, ProfileChanges, User},
};

const USER_COLUMNS: &str =
    "id, email, password, role, first_name, last_name, bio, profile_image_url, created_at";

/// Role given to every self-registered account.
pub const DEFAULT_ROLE: &str = "user";

/// Lookups over the identity store, plus the few writes the auth and
/// profile endpoints need.
#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Case-insensitive email lookup.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a user with the default role. A taken email is a `Conflict`.
    pub async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password, role, first_name, last_name, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.email.trim())
        .bind(&user.password)
        .bind(DEFAULT_ROLE)
        .bind(user.first_name.trim())
        .bind(user.last_name.trim())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let taken = e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if taken {
                AppError::Conflict(format!("Email '{}' is already registered", user.email.trim()))
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::from(e)
            }
        })?;

        tracing::info!(user_id = created.id, "User created");
        Ok(created)
    }

    /// Applies profile edits. Names and image keep their stored value when
    /// `None`; `bio` is always replaced. Returns `false` for an unknown user.
    pub async fn update_profile(&self, id: i64, changes: &ProfileChanges) -> Result<bool, AppError> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                bio = ?,
                profile_image_url = COALESCE(?, profile_image_url)
            WHERE id = ?
            "#,
        )
        .bind(changes.first_name.as_deref().map(str::trim))
        .bind(changes.last_name.as_deref().map(str::trim))
        .bind(&changes.bio)
        .bind(&changes.profile_image_url)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }
}
