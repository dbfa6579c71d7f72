//! Smoke checks against a running deployment and its database.
//!
//! These tests require:
//! - `STOREFRONT_URL` pointing at a running storefront (default: `http://localhost:3000`)
//! - `ADMIN_URL` pointing at a running admin API (default: `http://localhost:3001`)
//! - `ADMIN_API_TOKEN` if the admin API is guarded
//! - `ADMIN_DATABASE_URL` (or `DATABASE_URL`) for a database migrated with
//!   `kultr-cli migrate`
//!
//! Run with: `cargo test -p kultr-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use kultr_admin::db::{RepositoryError, UserRepository, UserStore, create_pool};
use kultr_admin::models::{NewUser, User, UserListQuery};
use kultr_core::Email;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::Value;

fn storefront_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn admin_url() -> String {
    std::env::var("ADMIN_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_live_storefront_shop() {
    let resp = reqwest::get(format!("{}/shop", storefront_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert!(body["products"].is_array());
    assert!(body["facets"]["categories"].is_array());
}

#[tokio::test]
#[ignore = "Requires a running admin API and migrated database"]
async fn test_live_admin_ready_and_stats() {
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/health/ready", admin_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let mut request = client.get(format!("{}/admin/users/stats", admin_url()));
    if let Ok(token) = std::env::var("ADMIN_API_TOKEN") {
        request = request.bearer_auth(token);
    }
    let body: Value = request.send().await.unwrap().json().await.unwrap();
    assert!(body["stats"]["totalUsers"].is_i64());
}

async fn repository() -> UserRepository {
    let url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("ADMIN_DATABASE_URL or DATABASE_URL must be set");
    let pool = create_pool(&SecretString::from(url)).await.unwrap();
    UserRepository::new(pool)
}

/// Short per-test tag so rows from concurrent runs never collide.
fn tag() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn new_user(name: &str, email: &str, role: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: Email::parse(email).unwrap(),
        role: role.to_string(),
    }
}

async fn remove(repo: &UserRepository, users: &[User]) {
    for user in users {
        repo.delete(user.id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "Requires a migrated database"]
async fn test_live_duplicate_email_is_conflict() {
    let repo = repository().await;
    let email = format!("dup-{}@kultr.test", tag());

    let first = repo.create(&new_user("Dup", &email, "user")).await.unwrap();
    let second = repo.create(&new_user("Dup Again", &email, "user")).await;
    assert!(matches!(second, Err(RepositoryError::Conflict(_))));

    let other = repo
        .create(&new_user("Other", &format!("other-{}@kultr.test", tag()), "user"))
        .await
        .unwrap();
    let clash = repo.update(other.id, &new_user("Other", &email, "user")).await;
    assert!(matches!(clash, Err(RepositoryError::Conflict(_))));

    remove(&repo, &[first, other]).await;
}

#[tokio::test]
#[ignore = "Requires a migrated database"]
async fn test_live_search_matches_percent_literally() {
    let repo = repository().await;
    let tag = tag();

    let literal = repo
        .create(&new_user(
            &format!("Promo 100% {tag}"),
            &format!("literal-{tag}@kultr.test"),
            "user",
        ))
        .await
        .unwrap();
    let lookalike = repo
        .create(&new_user(
            &format!("Promo 100x {tag}"),
            &format!("lookalike-{tag}@kultr.test"),
            "user",
        ))
        .await
        .unwrap();

    let query = UserListQuery {
        search: Some(format!("100% {tag}")),
        ..UserListQuery::default()
    };
    let found = repo.list(&query).await.unwrap();
    let ids: Vec<_> = found.iter().map(|u| u.id).collect();
    assert_eq!(ids, [literal.id]);

    // Case-insensitive on email too.
    let query = UserListQuery {
        search: Some(format!("LOOKALIKE-{tag}")),
        ..UserListQuery::default()
    };
    let found = repo.list(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.first().unwrap().id, lookalike.id);

    remove(&repo, &[literal, lookalike]).await;
}

#[tokio::test]
#[ignore = "Requires a migrated database"]
async fn test_live_stats_count_new_rows() {
    let repo = repository().await;
    let tag = tag();

    let admin = repo
        .create(&new_user("Stat Admin", &format!("stat-admin-{tag}@kultr.test"), "admin"))
        .await
        .unwrap();
    let member = repo
        .create(&new_user("Stat User", &format!("stat-user-{tag}@kultr.test"), "user"))
        .await
        .unwrap();

    let stats = repo.stats().await.unwrap();
    assert!(stats.total_users >= 2);
    assert!(stats.active_users >= 2);
    assert!(stats.admin_users >= 1);
    assert!(stats.new_users_today >= 2);
    assert!(stats.total_users >= stats.active_users);
    assert!(stats.active_users >= stats.new_users_today);

    let member_id = member.id;
    remove(&repo, &[admin, member]).await;
    assert!(matches!(repo.delete(member_id).await, Err(RepositoryError::NotFound)));
}
