// src/state.rs

use crate::config::Config;
use crate::services::{CommentService, NotificationService, PostService, UserService};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for PostService {
    fn from_ref(state: &AppState) -> Self {
        PostService::new(state.pool.clone())
    }
}

impl FromRef<AppState> for CommentService {
    fn from_ref(state: &AppState) -> Self {
        CommentService::new(state.pool.clone())
    }
}

impl FromRef<AppState> for NotificationService {
    fn from_ref(state: &AppState) -> Self {
        NotificationService::new(state.pool.clone())
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        UserService::new(state.pool.clone())
    }
}
