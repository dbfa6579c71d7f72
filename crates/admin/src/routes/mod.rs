//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /admin/users?search=&page=&limit=  - Newest-first user page
//! POST   /admin/users                       - Create user
//! GET    /admin/users/stats                 - Dashboard counters
//! PUT    /admin/users/{id}                  - Replace name, email, role
//! DELETE /admin/users/{id}                  - Delete user
//! ```

pub mod users;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

/// Create the `/admin` routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/stats", get(users::stats))
        .route("/users/{id}", put(users::update).delete(users::delete))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::db::MemoryUserStore;
    use crate::state::AppState;

    const TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn app() -> axum::Router {
        crate::app(AppState::new(Arc::new(MemoryUserStore::new()), None))
    }

    async fn send(
        app: &axum::Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_create_returns_201_with_defaults() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/admin/users",
            Some(json!({ "name": "A", "email": "a@x.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["name"], "A");
        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["role"], "user");
        assert!(body["user"]["id"].is_i64());
        assert!(body["user"]["created_at"].is_string());
        assert!(body["user"]["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_create_twice_is_409() {
        let app = app();
        let user = json!({ "name": "A", "email": "a@x.com" });

        let (first, _) = send(&app, "POST", "/admin/users", Some(user.clone())).await;
        assert_eq!(first, StatusCode::CREATED);

        let (second, body) = send(&app, "POST", "/admin/users", Some(user)).await;
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already exists");
    }

    #[tokio::test]
    async fn test_create_wrong_typed_field_is_json_400() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/admin/users",
            Some(json!({ "name": 5, "email": "a@x.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_without_content_type_is_json_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/admin/users")
            .body(Body::from(r#"{"name":"A","email":"a@x.com"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_list_non_numeric_page_is_json_400() {
        let (status, body) = send(&app(), "GET", "/admin/users?page=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_400() {
        let app = app();
        let (status, body) =
            send(&app, "POST", "/admin/users", Some(json!({ "name": "A" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name and email are required");
    }

    #[tokio::test]
    async fn test_list_search_and_limit() {
        let app = app();
        for (name, email) in [("Kim", "kim@x.com"), ("Ada", "ada@x.com"), ("Bo", "bo@kim.io")] {
            send(
                &app,
                "POST",
                "/admin/users",
                Some(json!({ "name": name, "email": email })),
            )
            .await;
        }

        let (status, body) = send(&app, "GET", "/admin/users?search=kim", None).await;
        assert_eq!(status, StatusCode::OK);
        let users = body["users"].as_array().unwrap();
        assert_eq!(users.len(), 2);

        let (_, body) = send(&app, "GET", "/admin/users?limit=1&page=2", None).await;
        assert_eq!(body["users"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_resets_absent_role() {
        let app = app();
        let (_, created) = send(
            &app,
            "POST",
            "/admin/users",
            Some(json!({ "name": "A", "email": "a@x.com", "role": "admin" })),
        )
        .await;
        let id = created["user"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/admin/users/{id}"),
            Some(json!({ "name": "Ann", "email": "ann@x.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Ann");
        assert_eq!(body["user"]["email"], "ann@x.com");
        assert_eq!(body["user"]["role"], "user");
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_is_404() {
        let app = app();
        let (status, body) = send(
            &app,
            "PUT",
            "/admin/users/999",
            Some(json!({ "name": "A", "email": "a@x.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");

        let (status, _) = send(&app, "DELETE", "/admin/users/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/admin/users/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_then_stats() {
        let app = app();
        let (_, created) = send(
            &app,
            "POST",
            "/admin/users",
            Some(json!({ "name": "A", "email": "a@x.com", "role": "admin" })),
        )
        .await;
        send(
            &app,
            "POST",
            "/admin/users",
            Some(json!({ "name": "B", "email": "b@x.com" })),
        )
        .await;

        let (_, body) = send(&app, "GET", "/admin/users/stats", None).await;
        assert_eq!(
            body["stats"],
            json!({ "totalUsers": 2, "activeUsers": 2, "adminUsers": 1, "newUsersToday": 2 })
        );

        let id = created["user"]["id"].as_i64().unwrap();
        let (status, body) = send(&app, "DELETE", &format!("/admin/users/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (_, body) = send(&app, "GET", "/admin/users/stats", None).await;
        assert_eq!(body["stats"]["totalUsers"], 1);
        assert_eq!(body["stats"]["adminUsers"], 0);
    }

    #[tokio::test]
    async fn test_token_guard() {
        let app = crate::app(AppState::new(
            Arc::new(MemoryUserStore::new()),
            Some(SecretString::from(TOKEN)),
        ));

        let (status, body) = send(&app, "GET", "/admin/users", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let request = Request::builder()
            .uri("/admin/users")
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Health stays open.
        let (status, _) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
