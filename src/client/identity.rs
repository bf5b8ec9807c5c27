//! The external identity provider the client logs in with.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use super::token::decode_unverified;
use crate::config::IdentityConfig;
use crate::models::UserProfile;

/// What the user typed into the login form.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A successful login: the profile and the session token, always together.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub profile: UserProfile,
    pub token: String,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("login was cancelled")]
    Cancelled,
    #[error("identity provider refused the login: {0}")]
    Rejected(String),
    #[error("could not reach the identity provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider sent an unusable response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn get_name(&self) -> &str;

    /// Exchanges credentials for a profile and token.
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginSuccess, LoginError>;

    /// Drops whatever state the provider keeps for the session.
    async fn signout(&self) -> Result<(), LoginError> {
        Ok(())
    }
}

/// Logs in with the resource-owner password grant and reads `/userinfo`.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(config: &IdentityConfig, timeout: Duration) -> Result<Self, LoginError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!("Creating identity provider client for '{}'", config.domain);
        Ok(HttpIdentityProvider {
            client,
            base_url: config.base_url(),
            client_id: config.client_id.clone(),
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, LoginError> {
        let res = self
            .client
            .get(format!("{}/userinfo", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(LoginError::Rejected(format!(
                "userinfo returned {}",
                res.status()
            )));
        }
        let body: Value = res.json().await?;
        UserProfile::try_from(body).map_err(LoginError::MalformedResponse)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn get_name(&self) -> &str {
        &self.base_url
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginSuccess, LoginError> {
        if credentials.username.is_empty() && credentials.password.is_empty() {
            return Err(LoginError::Cancelled);
        }

        debug!("Requesting token for '{}'", credentials.username);
        let res = self
            .client
            .post(format!("{}/oauth/token", self.base_url))
            .json(&json!({
                "grant_type": "password",
                "username": credentials.username,
                "password": credentials.password,
                "client_id": self.client_id,
                "scope": "openid profile",
            }))
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let reason = res
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error_description.or(e.error))
                .unwrap_or_else(|| status.to_string());
            return Err(LoginError::Rejected(reason));
        }
        if !status.is_success() {
            return Err(LoginError::Rejected(format!("token endpoint returned {}", status)));
        }

        let tokens: TokenResponse = res
            .json()
            .await
            .map_err(|e| LoginError::MalformedResponse(e.to_string()))?;
        let token = tokens
            .id_token
            .ok_or_else(|| LoginError::MalformedResponse("no id_token in response".into()))?;

        let profile = match tokens.access_token {
            Some(access_token) => self.fetch_profile(&access_token).await?,
            // Without an access token the id_token claims are all we know.
            None => {
                let claims = decode_unverified(&token)
                    .map_err(|e| LoginError::MalformedResponse(e.to_string()))?;
                let value = serde_json::to_value(claims)
                    .map_err(|e| LoginError::MalformedResponse(e.to_string()))?;
                UserProfile::try_from(value).map_err(LoginError::MalformedResponse)?
            }
        };

        Ok(LoginSuccess { profile, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use mockito::{Matcher, Server};

    fn config(url: &str) -> IdentityConfig {
        IdentityConfig {
            domain: url.to_string(),
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            secret_base64: false,
            algorithms: vec!["HS256".to_string()],
            issuer: None,
            leeway_seconds: 0,
        }
    }

    fn id_token() -> String {
        encode(
            &Header::default(),
            &json!({ "sub": "auth0|42", "name": "Ada", "aud": "client-123" }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn password_login_returns_profile_and_token() {
        let mut server = Server::new_async().await;
        let token = id_token();
        let token_mock = server
            .mock("POST", "/oauth/token")
            .match_body(Matcher::PartialJson(json!({
                "grant_type": "password",
                "username": "ada",
                "client_id": "client-123",
                "scope": "openid profile",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id_token": token, "access_token": "opaque" }).to_string())
            .create_async()
            .await;
        let userinfo_mock = server
            .mock("GET", "/userinfo")
            .match_header("authorization", "Bearer opaque")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sub": "auth0|42", "name": "Ada Lovelace"}"#)
            .create_async()
            .await;

        let provider = HttpIdentityProvider::new(&config(&server.url()), Duration::from_secs(5)).unwrap();
        let success = provider
            .authenticate(&Credentials::new("ada", "pw"))
            .await
            .expect("login should succeed");

        token_mock.assert_async().await;
        userinfo_mock.assert_async().await;
        assert_eq!(success.token, token);
        assert_eq!(success.profile.name(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn profile_falls_back_to_id_token_claims() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id_token": id_token() }).to_string())
            .create_async()
            .await;

        let provider = HttpIdentityProvider::new(&config(&server.url()), Duration::from_secs(5)).unwrap();
        let success = provider
            .authenticate(&Credentials::new("ada", "pw"))
            .await
            .unwrap();
        assert_eq!(success.profile.user_id(), Some("auth0|42"));
        assert_eq!(success.profile.name(), Some("Ada"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_with_reason() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/oauth/token")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "invalid_grant", "error_description": "Wrong email or password."}"#)
            .create_async()
            .await;

        let provider = HttpIdentityProvider::new(&config(&server.url()), Duration::from_secs(5)).unwrap();
        let err = provider
            .authenticate(&Credentials::new("ada", "nope"))
            .await
            .unwrap_err();
        match err {
            LoginError::Rejected(reason) => assert_eq!(reason, "Wrong email or password."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_form_counts_as_cancelled() {
        let provider = HttpIdentityProvider::new(&config("http://127.0.0.1:9"), Duration::from_secs(1)).unwrap();
        assert!(matches!(
            provider.authenticate(&Credentials::new("", "")).await,
            Err(LoginError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn missing_id_token_is_malformed() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "opaque"}"#)
            .create_async()
            .await;

        let provider = HttpIdentityProvider::new(&config(&server.url()), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            provider.authenticate(&Credentials::new("ada", "pw")).await,
            Err(LoginError::MalformedResponse(_))
        ));
    }
}
