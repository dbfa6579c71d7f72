//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::SecretString;
use sqlx::PgPool;

use crate::db::UserStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: Arc<dyn UserStore>,
    pool: Option<PgPool>,
    api_token: Option<SecretString>,
}

impl AppState {
    /// State over any user store. `api_token` guards `/admin/*` when set.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, api_token: Option<SecretString>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users,
                pool: None,
                api_token,
            }),
        }
    }

    /// State backed by `PostgreSQL`; the pool also serves the readiness check.
    #[must_use]
    pub fn with_pool(pool: PgPool, api_token: Option<SecretString>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users: Arc::new(crate::db::UserRepository::new(pool.clone())),
                pool: Some(pool),
                api_token,
            }),
        }
    }

    /// Get the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get the database pool, if the store is database-backed.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Bearer token required on `/admin/*`, if configured.
    #[must_use]
    pub fn api_token(&self) -> Option<&SecretString> {
        self.inner.api_token.as_ref()
    }
}
