//! Session middleware configuration.
//!
//! Sessions live in a bounded `moka` cache and expire after a period of
//! inactivity. Nothing in them survives a restart, which is acceptable for a
//! cart and a sign-in marker.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};

use crate::cart::Cart;
use crate::config::StorefrontConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "kultr_session";

/// Upper bound on live sessions held in memory.
const MAX_SESSIONS: u64 = 100_000;

/// Session store backed by a `moka` cache.
///
/// Entries are dropped once idle for longer than the session timeout, and the
/// least recently used ones go first when the cache is full.
#[derive(Clone)]
pub struct MokaSessionStore {
    cache: Cache<Id, Record>,
}

impl MokaSessionStore {
    /// Create a store that evicts sessions idle for longer than `idle`.
    #[must_use]
    pub fn new(idle: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(idle)
            .build();
        Self { cache }
    }

    /// Number of sessions currently held, after pending evictions run.
    pub async fn session_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl std::fmt::Debug for MokaSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaSessionStore")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let Some(record) = self.cache.get(session_id).await else {
            return Ok(None);
        };
        if record.expiry_date <= OffsetDateTime::now_utc() {
            self.cache.invalidate(session_id).await;
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer with a cache-backed store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaSessionStore> {
    let idle_minutes = i64::from(config.session_idle_minutes);
    let store = MokaSessionStore::new(
        Duration::from_secs(u64::from(config.session_idle_minutes) * 60),
        MAX_SESSIONS,
    );

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::minutes(idle_minutes),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Read the shopper's cart, or an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored cart does not
/// deserialize.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::Duration as TimeDuration;

    use super::*;

    fn record(expires_in: TimeDuration) -> Record {
        Record {
            id: Id::default(),
            data: std::collections::HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MokaSessionStore::new(Duration::from_secs(60), 10);
        let mut rec = record(TimeDuration::minutes(5));
        store.create(&mut rec).await.unwrap();

        let loaded = store.load(&rec.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, rec.id);

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = MokaSessionStore::new(Duration::from_millis(50), 10);
        let mut rec = record(TimeDuration::minutes(5));
        store.create(&mut rec).await.unwrap();
        assert_eq!(store.session_count().await, 1);

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_expired_record_is_removed_on_load() {
        let store = MokaSessionStore::new(Duration::from_secs(60), 10);
        let rec = record(TimeDuration::seconds(-1));
        store.save(&rec).await.unwrap();

        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let store = MokaSessionStore::new(Duration::from_secs(60), 5);
        for _ in 0..50 {
            store.save(&record(TimeDuration::minutes(5))).await.unwrap();
        }
        assert!(store.session_count().await <= 5);
    }
}
