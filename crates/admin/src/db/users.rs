//! `PostgreSQL` user repository.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate builds
//! without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use kultr_core::{Email, UserId};

use super::{RepositoryError, UserStore, map_unique_violation};
use crate::models::user::ADMIN_ROLE;
use crate::models::{NewUser, User, UserListQuery, UserStats};

const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Convert listed rows, dropping any that no longer parse.
///
/// One bad row written by another tool should not take the whole page down.
fn readable_users(rows: Vec<UserRow>) -> Vec<User> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            User::try_from(row)
                .inspect_err(|e| tracing::warn!(user_id = id, error = %e, "Skipping unreadable user row"))
                .ok()
        })
        .collect()
}

/// Escape `LIKE` wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a repository over a shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> Result<i64, RepositoryError> {
        Ok(sqlx::query_scalar::<_, i64>(sql).fetch_one(&self.pool).await?)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    #[instrument(skip(self))]
    async fn list(&self, query: &UserListQuery) -> Result<Vec<User>, RepositoryError> {
        let rows = if let Some(term) = query.search_term() {
            sqlx::query_as::<_, UserRow>(&format!(
                r"
                SELECT {USER_COLUMNS}
                FROM users
                WHERE name ILIKE '%' || $1 || '%' ESCAPE '\'
                   OR email ILIKE '%' || $1 || '%' ESCAPE '\'
                ORDER BY created_at DESC, id DESC
                LIMIT $2 OFFSET $3
                "
            ))
            .bind(escape_like(term))
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, UserRow>(&format!(
                r"
                SELECT {USER_COLUMNS}
                FROM users
                ORDER BY created_at DESC, id DESC
                LIMIT $1 OFFSET $2
                "
            ))
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?
        };

        Ok(readable_users(rows))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO users (name, email, role)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.try_into()
    }

    #[instrument(skip(self, user), fields(user_id = %id))]
    async fn update(&self, id: UserId, user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            UPDATE users
            SET name = $1, email = $2, role = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.role)
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> Result<UserStats, RepositoryError> {
        let total_users = self.count("SELECT COUNT(*) FROM users").await?;
        let active_users = self
            .count("SELECT COUNT(*) FROM users WHERE created_at >= CURRENT_DATE - INTERVAL '30 days'")
            .await?;
        let admin_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(ADMIN_ROLE)
            .fetch_one(&self.pool)
            .await?;
        let new_users_today = self
            .count("SELECT COUNT(*) FROM users WHERE created_at::date = CURRENT_DATE")
            .await?;

        Ok(UserStats {
            total_users,
            active_users,
            admin_users,
            new_users_today,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("kim"), "kim");
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_row_into_user() {
        let now = Utc::now();
        let user: User = UserRow {
            id: 7,
            name: "Kim".to_string(),
            email: "kim@kultr.store".to_string(),
            role: "admin".to_string(),
            created_at: now,
            updated_at: now,
        }
        .try_into()
        .unwrap();

        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.email.as_str(), "kim@kultr.store");
    }

    fn row(id: i32, email: &str) -> UserRow {
        let now = Utc::now();
        UserRow {
            id,
            name: "Kim".to_string(),
            email: email.to_string(),
            role: "user".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_with_bad_email_is_corruption() {
        let result: Result<User, _> = row(1, "nope").try_into();
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_listing_skips_unreadable_rows() {
        let users = readable_users(vec![row(3, "c@x.com"), row(2, "nope"), row(1, "a@x.com")]);
        let ids: Vec<i32> = users.iter().map(|u| u.id.as_i32()).collect();
        assert_eq!(ids, [3, 1]);
    }
}
