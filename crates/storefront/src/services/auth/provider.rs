//! GoTrue-style password grant client.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use kultr_core::Email;

use super::{AuthError, CredentialProvider};
use crate::config::AuthProviderConfig;
use crate::models::CurrentCustomer;

/// Password grant path, relative to the provider base URL.
const TOKEN_PATH: &str = "auth/v1/token?grant_type=password";

/// Credential provider backed by a hosted auth service.
#[derive(Clone)]
pub struct HttpCredentialProvider {
    client: reqwest::Client,
    token_url: String,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    user: ProviderUser,
}

#[derive(Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl HttpCredentialProvider {
    /// Create a client for the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &AuthProviderConfig) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| AuthError::InvalidResponse(format!("invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        let base = config.url.as_str().trim_end_matches('/');
        Ok(Self {
            client,
            token_url: format!("{base}/{TOKEN_PATH}"),
        })
    }

    /// Full password grant URL.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl CredentialProvider for HttpCredentialProvider {
    async fn verify(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<CurrentCustomer, AuthError> {
        let response = self
            .client
            .post(&self.token_url)
            .json(&PasswordGrant {
                email: email.as_str(),
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let status = response.status();
        // GoTrue answers bad credentials with 400 invalid_grant
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        let email = match token.user.email {
            Some(returned) => {
                Email::parse(&returned).map_err(|e| AuthError::InvalidResponse(e.to_string()))?
            }
            None => email.clone(),
        };

        Ok(CurrentCustomer {
            id: token.user.id,
            email,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_joins_base() {
        for base in ["https://auth.kultr.store", "https://auth.kultr.store/"] {
            let config = AuthProviderConfig {
                url: base.parse().unwrap(),
                api_key: SecretString::from("kX9#mQ2$vL7@pR4!"),
            };
            let provider = HttpCredentialProvider::new(&config).unwrap();
            assert_eq!(
                provider.token_url(),
                "https://auth.kultr.store/auth/v1/token?grant_type=password"
            );
        }
    }

    #[test]
    fn test_token_response_shape() {
        let json = r#"{"access_token":"t","user":{"id":"u-1","email":"a@x.com"}}"#;
        let parsed: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.user.id, "u-1");
        assert_eq!(parsed.user.email.as_deref(), Some("a@x.com"));
    }
}
