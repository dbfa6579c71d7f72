//! Sign-in error types.

use serde::Serialize;
use thiserror::Error;

/// Per-field validation messages for the sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Errors that can occur while signing a customer in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The form failed validation before reaching the provider.
    #[error("invalid sign-in form")]
    Validation(FieldErrors),

    /// The provider rejected the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Transport failure talking to the provider.
    #[error("credential provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an unexpected status.
    #[error("credential provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider's success response could not be understood.
    #[error("credential provider response invalid: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Whether this is the shopper's fault rather than ours.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidCredentials)
    }
}
