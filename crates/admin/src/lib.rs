//! KULTR Admin library.
//!
//! User administration over `PostgreSQL`: list/search/paginate, create,
//! update, delete, and dashboard counters.
//!
//! # Modules
//!
//! - [`db`] - `UserStore` trait, `PostgreSQL` repository, migrations
//! - [`models`] - User, request bodies, stats
//! - [`routes`] - JSON handlers under `/admin`
//! - [`middleware`] - Optional bearer-token guard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the admin router with the token guard and trace layer. Sentry
/// layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let admin = routes::admin_routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::require_api_token,
    ));

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/admin", admin)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 if the database is not reachable. Stores without a pool are
/// always ready.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
