//! Integration tests for KULTR.
//!
//! Both servers are started in-process on ephemeral ports and driven over
//! real HTTP with `reqwest`. The storefront signs in against
//! [`StubCredentials`]; the admin API runs on the in-memory user store, so no
//! database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kultr-integration-tests
//!
//! # Live checks against a deployment (see tests/live.rs)
//! STOREFRONT_URL=https://kultr.store cargo test -p kultr-integration-tests -- --ignored
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use kultr_admin::db::MemoryUserStore;
use kultr_core::Email;
use kultr_storefront::cart::ShippingPolicy;
use kultr_storefront::catalog::Catalog;
use kultr_storefront::config::{AuthProviderConfig, StorefrontConfig};
use kultr_storefront::models::CurrentCustomer;
use kultr_storefront::services::auth::{AuthError, CredentialProvider};

/// Password the stub accepts for any well-formed email.
pub const GOOD_PASSWORD: &str = "correct horse";

/// Bearer token for admin servers started with a guard.
pub const ADMIN_TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// Credential provider that accepts [`GOOD_PASSWORD`] and nothing else.
pub struct StubCredentials;

#[async_trait]
impl CredentialProvider for StubCredentials {
    async fn verify(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<CurrentCustomer, AuthError> {
        if password.expose_secret() == GOOD_PASSWORD {
            Ok(CurrentCustomer {
                id: format!("cust-{}", email.as_str()),
                email: email.clone(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// A server running on a background task.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

async fn serve(app: axum::Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test server failed");
    });

    TestServer { addr }
}

/// Start the storefront with the embedded catalog and [`StubCredentials`].
pub async fn spawn_storefront() -> TestServer {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        base_url: "http://localhost".to_string(),
        catalog_path: None,
        shipping: ShippingPolicy::default(),
        session_idle_minutes: 60,
        auth_provider: AuthProviderConfig {
            url: "http://localhost:9".parse().expect("valid url"),
            api_key: SecretString::from("unused"),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        json_logs: false,
    };
    let catalog = Catalog::embedded().expect("Embedded catalog is valid");
    let state = kultr_storefront::state::AppState::new(config, catalog, Arc::new(StubCredentials));

    serve(kultr_storefront::app(state)).await
}

/// Start the admin API on a fresh in-memory store.
pub async fn spawn_admin(api_token: Option<&str>) -> TestServer {
    let state = kultr_admin::state::AppState::new(
        Arc::new(MemoryUserStore::new()),
        api_token.map(SecretString::from),
    );
    serve(kultr_admin::app(state)).await
}

/// HTTP client that keeps cookies, so one client is one shopper session.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
