//! Integration tests for the user store's update semantics. These need a
//! live MongoDB; set `TEST_MONGODB_URI` to run them, otherwise they skip.

use kinodex::database::{StoreError, UserStore};
use kinodex::models::user::NewUser;

async fn test_store() -> Option<(mongodb::Database, UserStore)> {
    let uri = match std::env::var("TEST_MONGODB_URI") {
        Ok(uri) => uri,
        Err(_) => {
            eprintln!("TEST_MONGODB_URI not set; skipping");
            return None;
        }
    };

    let client = mongodb::Client::with_uri_str(&uri)
        .await
        .expect("connect to test MongoDB");
    let database = client.database(&format!("kinodex_test_{}", uuid::Uuid::new_v4().simple()));

    let users = UserStore::new(&database);
    users.ensure_indexes().await.expect("create indexes");
    Some((database, users))
}

fn account(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        email: format!("{}@example.com", username),
        birthday: None,
    }
}

#[tokio::test]
async fn registering_the_same_username_twice_conflicts() {
    let Some((database, users)) = test_store().await else {
        return;
    };

    users.insert(account("alice1")).await.unwrap();
    let second = users.insert(account("alice1")).await;
    assert!(matches!(second, Err(StoreError::AlreadyExists)));

    database.drop(None).await.ok();
}

#[tokio::test]
async fn favorites_permit_duplicates_and_removal_strips_all() {
    let Some((database, users)) = test_store().await else {
        return;
    };

    users.insert(account("bobby1")).await.unwrap();

    // Any string is accepted as a movie id, and duplicates accumulate.
    users.push_favorite("bobby1", "m1").await.unwrap();
    let after_second = users.push_favorite("bobby1", "m1").await.unwrap().unwrap();
    assert_eq!(after_second.favorite_movies, vec!["m1", "m1"]);

    users
        .push_favorite("bobby1", "not-an-object-id")
        .await
        .unwrap();

    // Removal takes out every occurrence, not just the first.
    let after_pull = users.pull_favorite("bobby1", "m1").await.unwrap().unwrap();
    assert_eq!(after_pull.favorite_movies, vec!["not-an-object-id"]);

    database.drop(None).await.ok();
}

#[tokio::test]
async fn favorites_update_on_unknown_user_reports_not_found() {
    let Some((database, users)) = test_store().await else {
        return;
    };

    let result = users.push_favorite("ghost", "m1").await.unwrap();
    assert!(result.is_none());

    database.drop(None).await.ok();
}

#[tokio::test]
async fn update_replaces_account_fields_and_keeps_favorites() {
    let Some((database, users)) = test_store().await else {
        return;
    };

    users.insert(account("carol1")).await.unwrap();
    users.push_favorite("carol1", "m9").await.unwrap();

    let mut patch = account("carol1");
    patch.email = "new@example.com".to_string();
    let updated = users.update("carol1", patch).await.unwrap().unwrap();

    assert_eq!(updated.email, "new@example.com");
    assert_eq!(updated.favorite_movies, vec!["m9"]);

    let missing = users.update("ghost", account("ghost")).await.unwrap();
    assert!(missing.is_none());

    database.drop(None).await.ok();
}

#[tokio::test]
async fn deleting_a_user_confirms_and_missing_user_reports_not_found() {
    let Some((database, users)) = test_store().await else {
        return;
    };

    users.insert(account("dave01")).await.unwrap();

    let deleted = users.delete("dave01").await.unwrap();
    assert!(deleted.is_some());
    assert!(users.find_by_username("dave01").await.unwrap().is_none());

    let missing = users.delete("dave01").await.unwrap();
    assert!(missing.is_none());

    database.drop(None).await.ok();
}
