// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, comments, notifications, posts, users},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Reads are public; handlers taking `Claims` require a bearer token.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool + config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let post_routes = Router::new()
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/all", get(posts::list_all_posts))
        .route(
            "/api/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/api/posts/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/api/tags", get(posts::list_tags));

    let comment_routes = Router::new()
        .route(
            "/api/comments/{id}",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/api/comments/{id}/replies", post(comments::reply_to_comment));

    let notification_routes = Router::new()
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/count", get(notifications::unread_count))
        .route(
            "/api/notifications/mark-all-read",
            post(notifications::mark_all_read),
        );

    let user_routes = Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/users/{id}/posts", get(posts::list_user_posts))
        .route("/api/profile/me", get(users::get_me).put(users::update_me));

    Router::new()
        .merge(auth_routes)
        .merge(post_routes)
        .merge(comment_routes)
        .merge(notification_routes)
        .merge(user_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
