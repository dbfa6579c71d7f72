//! Sign-in, sign-out, and account handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppJson, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_customer, set_current_customer};
use crate::models::CurrentCustomer;
use crate::services::auth::{SignInForm, sign_in};
use crate::state::AppState;

/// Where the client goes after signing in.
pub const ACCOUNT_PATH: &str = "/account";

/// `POST /auth/login` response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub customer: CurrentCustomer,
    pub redirect: &'static str,
}

/// Verify credentials and sign the customer in.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    AppJson(form): AppJson<SignInForm>,
) -> Result<Json<LoginResponse>> {
    let customer = sign_in(state.credentials(), form).await?;

    set_current_customer(&session, &customer).await?;
    set_sentry_user(&customer.id);

    Ok(Json(LoginResponse {
        customer,
        redirect: ACCOUNT_PATH,
    }))
}

/// Sign the customer out. The cart stays with the session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_customer(&session).await?;
    clear_sentry_user();
    Ok(Json(json!({ "success": true })))
}

/// The signed-in customer.
#[instrument(skip_all)]
pub async fn account(RequireAuth(customer): RequireAuth) -> Json<Value> {
    Json(json!({ "customer": customer }))
}
