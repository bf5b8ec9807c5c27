//! Talking to the application API on behalf of a [`Session`].
//!
//! Every request leaves with the stored bearer token (if there is one), and every
//! 401 that comes back ends the session before the error is handed to the caller.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::session::Session;
use super::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the server refused our credentials")]
    Unauthorized,
    #[error("unexpected response status {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Attaches the session token as a bearer credential. Without a token the
/// request goes out as-is; the server decides whether that is acceptable.
pub fn authorize(request: RequestBuilder, session: &Session) -> Result<RequestBuilder, StoreError> {
    Ok(match session.token()? {
        Some(token) => request.bearer_auth(token),
        None => request,
    })
}

/// Ends the session on a 401 and reports it as [`ApiError::Unauthorized`], even
/// when clearing the store fails. Every other response is passed through untouched.
pub fn handle_response(response: Response, session: &mut Session) -> Result<Response, ApiError> {
    if response.status() == StatusCode::UNAUTHORIZED {
        warn!(url = %response.url(), "Server rejected credentials, logging out");
        if let Err(e) = session.logout() {
            error!("Could not clear the stored session after a 401: {}", e);
        }
        return Err(ApiError::Unauthorized);
    }
    Ok(response)
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        ApiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends `request` through the augmenter and the rejection handler.
    pub async fn send(
        &self,
        session: &mut Session,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let request = authorize(request, session)?;
        let response = request.send().await?;
        debug!(url = %response.url(), status = %response.status(), "API response");
        handle_response(response, session)
    }

    /// GETs `path` and decodes a JSON body from a successful response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        session: &mut Session,
        path: &str,
    ) -> Result<T, ApiError> {
        let request = self.http.get(self.url(path));
        let response = self.send(session, request).await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}
