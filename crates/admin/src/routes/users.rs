//! User management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use kultr_core::UserId;

use crate::error::{AppError, AppJson, AppQuery, Result};
use crate::models::{User, UserInput, UserListQuery, UserStats};
use crate::state::AppState;

/// `GET /admin/users` response.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

/// Single-user response for create and update.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// `GET /admin/users/stats` response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: UserStats,
}

fn parse_id(raw: &str) -> Result<UserId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid user id".to_string()))
}

/// List users, newest first, with optional search and paging.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserListQuery>,
) -> Result<Json<UserListResponse>> {
    let users = state.users().list(&query).await?;
    Ok(Json(UserListResponse { users }))
}

/// Create a user.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<UserInput>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let new_user = input.validate()?;
    let user = state.users().create(&new_user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// Replace a user's name, email, and role.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UserInput>,
) -> Result<Json<UserResponse>> {
    let id = parse_id(&id)?;
    let new_user = input.validate()?;
    let user = state.users().update(id, &new_user).await?;
    tracing::info!(user_id = %user.id, "User updated");

    Ok(Json(UserResponse { user }))
}

/// Delete a user.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_id(&id)?;
    state.users().delete(id).await?;
    tracing::info!(user_id = %id, "User deleted");

    Ok(Json(json!({ "success": true })))
}

/// Dashboard counters.
#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.users().stats().await?;
    Ok(Json(StatsResponse { stats }))
}
