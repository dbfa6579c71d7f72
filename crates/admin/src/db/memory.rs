//! In-memory [`UserStore`] for tests.
//!
//! Mirrors the `PostgreSQL` behavior the handlers depend on: serial ids,
//! exact-match email uniqueness, case-insensitive search, newest-first order.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use kultr_core::UserId;

use super::{DUPLICATE_EMAIL, RepositoryError, UserStore};
use crate::models::user::ADMIN_ROLE;
use crate::models::{NewUser, User, UserListQuery, UserStats};

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    users: Vec<User>,
}

/// Mutex-guarded user table.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with an explicit creation time, for exercising the
    /// date-based stats.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] on a duplicate email.
    pub fn insert_at(
        &self,
        user: &NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let mut inner = self.lock()?;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        inner.next_id += 1;
        let stored = User {
            id: UserId::new(inner.next_id),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            created_at,
            updated_at: created_at,
        };
        inner.users.push(stored.clone());
        Ok(stored)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::DataCorruption("user store lock poisoned".to_string()))
    }
}

fn count_where(users: &[User], pred: impl Fn(&User) -> bool) -> i64 {
    i64::try_from(users.iter().filter(|u| pred(u)).count()).unwrap_or(i64::MAX)
}

fn matches_search(user: &User, term: &str) -> bool {
    let term = term.to_lowercase();
    user.name.to_lowercase().contains(&term) || user.email.as_str().to_lowercase().contains(&term)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self, query: &UserListQuery) -> Result<Vec<User>, RepositoryError> {
        let inner = self.lock()?;
        let mut users: Vec<User> = inner
            .users
            .iter()
            .filter(|u| query.search_term().is_none_or(|term| matches_search(u, term)))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit()).unwrap_or(usize::MAX);
        Ok(users.into_iter().skip(offset).take(limit).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        self.insert_at(user, Utc::now())
    }

    async fn update(&self, id: UserId, user: &NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.lock()?;
        if !inner.users.iter().any(|u| u.id == id) {
            return Err(RepositoryError::NotFound);
        }
        if inner.users.iter().any(|u| u.id != id && u.email == user.email) {
            return Err(RepositoryError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        stored.name.clone_from(&user.name);
        stored.email = user.email.clone();
        stored.role.clone_from(&user.role);
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut inner = self.lock()?;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn stats(&self) -> Result<UserStats, RepositoryError> {
        let inner = self.lock()?;
        let today = Utc::now().date_naive();
        let window_start = today - Duration::days(30);
        let users = &inner.users;

        Ok(UserStats {
            total_users: count_where(users, |_| true),
            active_users: count_where(users, |u| u.created_at.date_naive() >= window_start),
            admin_users: count_where(users, |u| u.role == ADMIN_ROLE),
            new_users_today: count_where(users, |u| u.created_at.date_naive() == today),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kultr_core::Email;

    use super::*;

    fn new_user(name: &str, email: &str, role: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: Email::parse(email).unwrap(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(&new_user("A", "a@x.com", "user")).await.unwrap();

        let err = store
            .create(&new_user("A", "a@x.com", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_search_and_order() {
        let store = MemoryUserStore::new();
        let now = Utc::now();
        store
            .insert_at(&new_user("Kim Lee", "kim@x.com", "user"), now - Duration::days(2))
            .unwrap();
        store
            .insert_at(&new_user("Ada", "ada@kimchi.io", "user"), now - Duration::days(1))
            .unwrap();
        store.insert_at(&new_user("Bo", "bo@x.com", "user"), now).unwrap();

        let all = store.list(&UserListQuery::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Bo", "Ada", "Kim Lee"]);

        let query = UserListQuery {
            search: Some("KIM".to_string()),
            ..UserListQuery::default()
        };
        let found = store.list(&query).await.unwrap();
        let names: Vec<&str> = found.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Kim Lee"]);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let store = MemoryUserStore::new();
        for i in 0..12 {
            store
                .create(&new_user(&format!("U{i}"), &format!("u{i}@x.com"), "user"))
                .await
                .unwrap();
        }

        let second = UserListQuery {
            page: Some(2),
            ..UserListQuery::default()
        };
        assert_eq!(store.list(&second).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = MemoryUserStore::new();
        let user = new_user("A", "a@x.com", "user");

        assert!(matches!(
            store.update(UserId::new(99), &user).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.delete(UserId::new(99)).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(&new_user("A", "a@x.com", "user")).await.unwrap();
        let b = store.create(&new_user("B", "b@x.com", "user")).await.unwrap();

        let err = store
            .update(b.id, &new_user("B", "a@x.com", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // Keeping one's own email is not a conflict.
        let updated = store
            .update(b.id, &new_user("Bea", "b@x.com", "admin"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Bea");
        assert_eq!(updated.role, "admin");
    }

    #[tokio::test]
    async fn test_stats() {
        let store = MemoryUserStore::new();
        let now = Utc::now();
        store
            .insert_at(&new_user("Old", "old@x.com", "admin"), now - Duration::days(90))
            .unwrap();
        store
            .insert_at(&new_user("Recent", "recent@x.com", "user"), now - Duration::days(5))
            .unwrap();
        store.insert_at(&new_user("Today", "today@x.com", "admin"), now).unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(
            stats,
            UserStats {
                total_users: 3,
                active_users: 2,
                admin_users: 2,
                new_users_today: 1,
            }
        );
    }
}
