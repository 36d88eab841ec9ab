// tests/comment_tests.rs

mod common;

use common::{create_comment, create_post, create_user, test_pool};
use miniblog::{
    error::AppError,
    models::comment::NewComment,
    services::{CommentService, PostService},
};

#[tokio::test]
async fn reply_shows_under_parent_and_not_at_top_level() {
    let pool = test_pool().await;
    let comments = CommentService::new(pool.clone());
    let alice = create_user(&pool, "Alice", "Anderson").await;
    let bob = create_user(&pool, "Bob", "Brown").await;

    let post = create_post(&pool, &alice, "Threads", None).await;
    let parent = create_comment(&pool, &post, &bob, "Nice post!").await;
    let sibling = create_comment(&pool, &post, &alice, "Thanks for sharing.").await;

    let reply = comments
        .reply(
            parent.id,
            &NewComment {
                content: "Glad you liked it".to_string(),
                post_id: post.id,
                author_id: alice.id,
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.parent_comment_id, Some(parent.id));
    assert_eq!(reply.post_id, post.id);

    let detail = comments.get_by_id(parent.id).await.unwrap().unwrap();
    let reply_ids: Vec<i64> = detail.replies.iter().map(|r| r.id).collect();
    assert_eq!(reply_ids, vec![reply.id]);
    assert_eq!(detail.replies[0].author_name, "Alice Anderson");

    let threads = comments.list_by_post(post.id).await.unwrap();
    let top_level: Vec<i64> = threads.iter().map(|t| t.comment.id).collect();
    assert_eq!(top_level, vec![parent.id, sibling.id]);
    assert_eq!(threads[0].replies.len(), 1);
    assert_eq!(threads[0].replies[0].comment.id, reply.id);
    assert!(threads[1].replies.is_empty());
}

#[tokio::test]
async fn replies_nest_beyond_one_level() {
    let pool = test_pool().await;
    let comments = CommentService::new(pool.clone());
    let alice = create_user(&pool, "Alice", "Anderson").await;

    let post = create_post(&pool, &alice, "Deep", None).await;
    let root = create_comment(&pool, &post, &alice, "root").await;

    let mut parent_id = root.id;
    for depth in 1..=3 {
        parent_id = comments
            .reply(
                parent_id,
                &NewComment {
                    content: format!("depth {}", depth),
                    post_id: post.id,
                    author_id: alice.id,
                },
            )
            .await
            .unwrap()
            .id;
    }

    let threads = comments.list_by_post(post.id).await.unwrap();
    assert_eq!(threads.len(), 1);
    let deepest = &threads[0].replies[0].replies[0].replies[0];
    assert_eq!(deepest.comment.id, parent_id);
    assert_eq!(deepest.comment.content, "depth 3");
}

#[tokio::test]
async fn reply_requires_parent_on_same_post() {
    let pool = test_pool().await;
    let comments = CommentService::new(pool.clone());
    let alice = create_user(&pool, "Alice", "Anderson").await;

    let first = create_post(&pool, &alice, "First", None).await;
    let second = create_post(&pool, &alice, "Second", None).await;
    let parent = create_comment(&pool, &first, &alice, "On first").await;

    let cross_post = comments
        .reply(
            parent.id,
            &NewComment {
                content: "Wrong post".to_string(),
                post_id: second.id,
                author_id: alice.id,
            },
        )
        .await;
    assert!(matches!(cross_post, Err(AppError::NotFound(_))));

    let missing_parent = comments
        .reply(
            9999,
            &NewComment {
                content: "Orphan".to_string(),
                post_id: first.id,
                author_id: alice.id,
            },
        )
        .await;
    assert!(matches!(missing_parent, Err(AppError::NotFound(_))));

    assert!(comments.list_by_post(second.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_by_id_carries_author_and_post() {
    let pool = test_pool().await;
    let comments = CommentService::new(pool.clone());
    let alice = create_user(&pool, "Alice", "Anderson").await;
    let bob = create_user(&pool, "Bob", "Brown").await;

    let post = create_post(&pool, &alice, "Welcome to the Mini Blog", None).await;
    let comment = create_comment(&pool, &post, &bob, "Nice post!").await;

    let detail = comments.get_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(detail.comment.content, "Nice post!");
    assert_eq!(detail.comment.author_id, bob.id);
    assert_eq!(detail.comment.author_name, "Bob Brown");
    assert_eq!(detail.comment.parent_comment_id, None);
    assert_eq!(detail.post_title, "Welcome to the Mini Blog");
    assert!(detail.replies.is_empty());

    assert!(comments.get_by_id(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn update_changes_content_and_stamps_time() {
    let pool = test_pool().await;
    let comments = CommentService::new(pool.clone());
    let alice = create_user(&pool, "Alice", "Anderson").await;

    let post = create_post(&pool, &alice, "Edits", None).await;
    let comment = create_comment(&pool, &post, &alice, "Typo").await;
    assert!(comment.updated_at.is_none());

    assert!(comments.update(comment.id, "Fixed").await.unwrap());

    let detail = comments.get_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(detail.comment.content, "Fixed");
    assert!(detail.comment.updated_at.is_some());
    assert_eq!(detail.comment.created_at, comment.created_at);

    assert!(!comments.update(9999, "Nobody").await.unwrap());
}

#[tokio::test]
async fn deleting_comment_takes_its_replies() {
    let pool = test_pool().await;
    let comments = CommentService::new(pool.clone());
    let posts = PostService::new(pool.clone());
    let alice = create_user(&pool, "Alice", "Anderson").await;
    let bob = create_user(&pool, "Bob", "Brown").await;

    let post = create_post(&pool, &alice, "Cleanup", None).await;
    let parent = create_comment(&pool, &post, &bob, "Parent").await;
    let keeper = create_comment(&pool, &post, &bob, "Keeper").await;
    let reply = comments
        .reply(
            parent.id,
            &NewComment {
                content: "Child".to_string(),
                post_id: post.id,
                author_id: alice.id,
            },
        )
        .await
        .unwrap();

    assert!(comments.delete(parent.id).await.unwrap());
    assert!(comments.get_by_id(parent.id).await.unwrap().is_none());
    assert!(comments.get_by_id(reply.id).await.unwrap().is_none());

    let threads = comments.list_by_post(post.id).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].comment.id, keeper.id);

    let detail = posts.get_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(detail.post.comment_count, 1);

    assert!(!comments.delete(parent.id).await.unwrap());
}

#[tokio::test]
async fn author_with_comments_cannot_be_removed() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "Alice", "Anderson").await;
    let bob = create_user(&pool, "Bob", "Brown").await;

    let post = create_post(&pool, &alice, "Restrict", None).await;
    create_comment(&pool, &post, &bob, "Still here").await;

    let removed = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(bob.id)
        .execute(&pool)
        .await;
    assert!(removed.is_err());
}
