//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::ShippingPolicy;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::auth::CredentialProvider;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Everything inside is read-only after startup;
/// per-shopper state lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    credentials: Arc<dyn CredentialProvider>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                credentials,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the credential provider used for sign-in.
    #[must_use]
    pub fn credentials(&self) -> &dyn CredentialProvider {
        self.inner.credentials.as_ref()
    }

    /// Shipping rule applied to cart totals.
    #[must_use]
    pub fn shipping(&self) -> &ShippingPolicy {
        &self.inner.config.shipping
    }
}
