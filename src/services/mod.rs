// src/services/mod.rs

//! Query and persistence core. Each service is a cheap handle over the pool;
//! every call re-queries the store.

pub mod comments;
pub mod notifications;
pub mod posts;
pub mod tags;
pub mod users;

pub use comments::CommentService;
pub use notifications::NotificationService;
pub use posts::PostService;
pub use users::UserService;
