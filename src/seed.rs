// src/seed.rs

//! Demo content for a fresh store: two users, two posts, two comments.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{NewUser, User},
    services::UserService,
    utils::hash::hash_password,
};

/// Password shared by the demo accounts; satisfies both password policies.
pub const DEMO_PASSWORD: &str = "AA@@@111bbb!";

/// Seeds demo data unless any post already exists. Returns whether it seeded.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<bool, AppError> {
    let post_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;
    if post_count > 0 {
        return Ok(false);
    }

    let users = UserService::new(pool.clone());
    let hashed_password = hash_password(DEMO_PASSWORD)?;

    let alice = ensure_user(&users, "alice@example.com", "Alice", "Anderson", &hashed_password).await?;
    let bob = ensure_user(&users, "bob@example.com", "Bob", "Brown", &hashed_password).await?;

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let welcome_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO posts (title, content, created_at, author_id) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind("Welcome to the Mini Blog")
    .bind("This is a seeded welcome post.")
    .bind(now - Duration::minutes(120))
    .bind(alice.id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO posts (title, content, created_at, author_id) VALUES (?, ?, ?, ?)")
        .bind("Second Post")
        .bind("Another example post with some content.")
        .bind(now - Duration::minutes(60))
        .bind(bob.id)
        .execute(&mut *tx)
        .await?;

    for (content, author_id, minutes_ago) in [
        ("Nice post!", bob.id, 30),
        ("Thanks for sharing.", alice.id, 20),
    ] {
        sqlx::query(
            "INSERT INTO comments (content, created_at, post_id, author_id) VALUES (?, ?, ?, ?)",
        )
        .bind(content)
        .bind(now - Duration::minutes(minutes_ago))
        .bind(welcome_id)
        .bind(author_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!("Demo data seeded");
    Ok(true)
}

async fn ensure_user(
    users: &UserService,
    email: &str,
    first_name: &str,
    last_name: &str,
    hashed_password: &str,
) -> Result<User, AppError> {
    if let Some(existing) = users.find_by_email(email).await? {
        return Ok(existing);
    }

    tracing::info!("Seeding demo user: {}", email);
    users
        .create(&NewUser {
            email: email.to_string(),
            password: hashed_password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
        .await
}
