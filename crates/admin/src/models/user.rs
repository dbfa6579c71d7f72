//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kultr_core::{Email, UserId};

/// Role given to users created without one.
pub const DEFAULT_ROLE: &str = "user";

/// Role counted by the `adminUsers` stat.
pub const ADMIN_ROLE: &str = "admin";

/// Default page size for user listings.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 100;

/// Message returned when name or email is blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Name and email are required";

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a create or update body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserInputError {
    #[error("Name and email are required")]
    MissingFields,
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] kultr_core::EmailError),
}

/// Body of `POST /admin/users` and `PUT /admin/users/{id}`.
///
/// Fields are optional on the wire so a missing field is reported as a 400
/// with a readable message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserInput {
    /// Check required fields and normalize into a [`NewUser`].
    ///
    /// Name is trimmed. A blank or absent role becomes [`DEFAULT_ROLE`], so a
    /// full-replace update without a role resets it.
    ///
    /// # Errors
    ///
    /// Returns [`UserInputError::MissingFields`] if name or email is blank and
    /// [`UserInputError::InvalidEmail`] if the email does not parse.
    pub fn validate(self) -> Result<NewUser, UserInputError> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() || email.is_empty() {
            return Err(UserInputError::MissingFields);
        }

        let role = self
            .role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_ROLE);

        Ok(NewUser {
            name: name.to_string(),
            email: Email::parse(email)?,
            role: role.to_string(),
        })
    }
}

/// Validated fields for an insert or full-replace update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub role: String,
}

/// Query string of `GET /admin/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl UserListQuery {
    /// Search term, or `None` when absent or blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// 1-based page; anything below 1 reads as 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Rows to skip for the current page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Dashboard counters for `GET /admin/users/stats`.
///
/// `active_users` counts signups in the last 30 days; there is no activity
/// tracking behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: i64,
    pub active_users: i64,
    pub admin_users: i64,
    pub new_users_today: i64,
}
