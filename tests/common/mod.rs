// tests/common/mod.rs

#![allow(dead_code)]

use miniblog::{
    db,
    models::{
        comment::{Comment, NewComment},
        post::{NewPost, Post},
        user::{NewUser, User},
    },
    services::{CommentService, PostService, UserService},
};
use sqlx::SqlitePool;

/// Fresh in-memory store with the schema applied.
pub async fn test_pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory SQLite");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

/// Inserts a user directly; the password column holds a placeholder.
pub async fn create_user(pool: &SqlitePool, first_name: &str, last_name: &str) -> User {
    let email = format!(
        "{}_{}@example.com",
        first_name.to_lowercase(),
        &uuid::Uuid::new_v4().to_string()[..8]
    );

    UserService::new(pool.clone())
        .create(&NewUser {
            email,
            password: "not-a-real-hash".to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
        .await
        .expect("Failed to create user")
}

pub async fn create_post(pool: &SqlitePool, author: &User, title: &str, tags: Option<&[&str]>) -> Post {
    let tags: Option<Vec<String>> = tags.map(|t| t.iter().map(|s| s.to_string()).collect());

    PostService::new(pool.clone())
        .create(
            &NewPost {
                title: title.to_string(),
                content: format!("Content of {}", title),
                image_url: None,
                author_id: author.id,
            },
            tags.as_deref(),
        )
        .await
        .expect("Failed to create post")
}

pub async fn create_comment(pool: &SqlitePool, post: &Post, author: &User, content: &str) -> Comment {
    CommentService::new(pool.clone())
        .create(&NewComment {
            content: content.to_string(),
            post_id: post.id,
            author_id: author.id,
        })
        .await
        .expect("Failed to create comment")
}

pub fn strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
