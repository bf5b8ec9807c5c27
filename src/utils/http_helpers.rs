use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    pub status: StatusCode,
    pub message: String,
    /// Value for the `WWW-Authenticate` header, sent with 401s.
    pub challenge: Option<String>,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code, message and optional challenge.
    pub fn new(status: StatusCode, message: impl Into<String>, challenge: Option<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
            challenge,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HTTPError::new(StatusCode::NOT_FOUND, message, None)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, message, None)
    }
}

/// Converts our `HTTPError` into a JSON response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(json!({ "error": self.message }))).into_response();
        if let Some(challenge) = self.challenge {
            match HeaderValue::from_str(&challenge) {
                Ok(value) => {
                    response
                        .headers_mut()
                        .insert(header::WWW_AUTHENTICATE, value);
                }
                Err(e) => tracing::warn!("Dropping unencodable challenge header: {}", e),
            }
        }
        response
    }
}
