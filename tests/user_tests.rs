// tests/user_tests.rs

mod common;

use common::{create_user, test_pool};
use miniblog::{
    error::AppError,
    models::user::{NewUser, ProfileChanges},
    services::UserService,
};

#[tokio::test]
async fn users_are_looked_up_by_id_and_email() {
    let pool = test_pool().await;
    let users = UserService::new(pool.clone());
    let alice = create_user(&pool, "Alice", "Anderson").await;
    let bob = create_user(&pool, "Bob", "Brown").await;

    let found = users.get_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(found.email, alice.email);
    assert_eq!(found.role, "user");
    assert_eq!(found.display_name(), "Alice Anderson");

    let by_email = users
        .find_by_email(&alice.email.to_uppercase())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, alice.id);

    let all: Vec<i64> = users.list_all().await.unwrap().iter().map(|u| u.id).collect();
    assert_eq!(all, vec![alice.id, bob.id]);

    assert!(users.get_by_id(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let pool = test_pool().await;
    let users = UserService::new(pool);

    let new_user = NewUser {
        email: "carol@example.com".to_string(),
        password: "hash".to_string(),
        first_name: "Carol".to_string(),
        last_name: "Clark".to_string(),
    };
    users.create(&new_user).await.unwrap();

    let again = users
        .create(&NewUser {
            email: "Carol@Example.com".to_string(),
            ..new_user
        })
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn profile_update_keeps_unspecified_names() {
    let pool = test_pool().await;
    let users = UserService::new(pool.clone());
    let alice = create_user(&pool, "Alice", "Anderson").await;

    let changes = ProfileChanges {
        first_name: None,
        last_name: Some("Archer".to_string()),
        bio: Some("Writes about Rust.".to_string()),
        profile_image_url: Some("https://example.com/alice.png".to_string()),
    };
    assert!(users.update_profile(alice.id, &changes).await.unwrap());

    let updated = users.get_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(updated.first_name, "Alice");
    assert_eq!(updated.last_name, "Archer");
    assert_eq!(updated.bio.as_deref(), Some("Writes about Rust."));
    assert_eq!(
        updated.profile_image_url.as_deref(),
        Some("https://example.com/alice.png")
    );

    // Bio is replaced as given; the image stays when not re-supplied.
    users
        .update_profile(alice.id, &ProfileChanges::default())
        .await
        .unwrap();
    let cleared = users.get_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(cleared.bio, None);
    assert_eq!(
        cleared.profile_image_url.as_deref(),
        Some("https://example.com/alice.png")
    );

    assert!(!users.update_profile(9999, &changes).await.unwrap());
}
