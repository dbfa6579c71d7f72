//! Customer sign-in.
//!
//! Passwords are never checked locally. The form is validated, then the
//! credential pair is handed to a [`CredentialProvider`]; a successful answer
//! becomes a [`CurrentCustomer`] that the route stores in the session.

mod error;
mod provider;

pub use error::{AuthError, FieldErrors};
pub use provider::HttpCredentialProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;

use kultr_core::Email;

use crate::models::CurrentCustomer;

/// Minimum password length accepted by the form.
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// Message shown for an email that does not parse.
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email";

/// Message shown for a password under [`MIN_PASSWORD_LENGTH`].
pub const SHORT_PASSWORD_MESSAGE: &str = "Password is too short";

/// Verifies an email/password pair against an identity service.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Exchange credentials for the customer's identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the pair is rejected,
    /// or a transport/provider error otherwise.
    async fn verify(&self, email: &Email, password: &SecretString)
    -> Result<CurrentCustomer, AuthError>;
}

/// Sign-in form body.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignInForm {
    /// Check both fields, collecting a message per failing field.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] listing every field that failed.
    pub fn validate(self) -> Result<(Email, SecretString), AuthError> {
        let mut errors = FieldErrors::default();

        let email = Email::parse(&self.email).ok();
        if email.is_none() {
            errors.email = Some(INVALID_EMAIL_MESSAGE.to_string());
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.password = Some(SHORT_PASSWORD_MESSAGE.to_string());
        }

        match email {
            Some(email) if errors.is_empty() => Ok((email, SecretString::from(self.password))),
            _ => Err(AuthError::Validation(errors)),
        }
    }
}

/// Validate the form and verify it with `provider`.
///
/// # Errors
///
/// Validation errors, [`AuthError::InvalidCredentials`], or provider failures.
#[tracing::instrument(skip_all)]
pub async fn sign_in(
    provider: &dyn CredentialProvider,
    form: SignInForm,
) -> Result<CurrentCustomer, AuthError> {
    let (email, password) = form.validate()?;

    match provider.verify(&email, &password).await {
        Ok(customer) => {
            tracing::info!(customer_id = %customer.id, "Customer signed in");
            Ok(customer)
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(email_domain = email.domain(), "Sign-in rejected");
            Err(AuthError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}
