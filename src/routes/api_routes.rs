//! JSON API endpoints.

use axum::extract::OriginalUri;
use axum::routing::{any, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;
use crate::verifier::VerifiedClaims;

pub const PUBLIC_MESSAGE: &str =
    "Hello from a public endpoint, you don't need to be authenticated to see this.";
pub const PRIVATE_MESSAGE: &str =
    "Hello from a private endpoint, you DO need to be authenticated to see this!";

/// Registers the API routes. Only handlers taking [`VerifiedClaims`] are protected.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/public", get(public_message))
        .route("/api/private", get(private_message))
        .route("/api/{*rest}", any(unknown_endpoint))
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

async fn public_message() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: PUBLIC_MESSAGE.to_string(),
    })
}

async fn private_message(VerifiedClaims(claims): VerifiedClaims) -> Json<MessageResponse> {
    debug!(sub = ?claims.sub, "Serving private message");
    Json(MessageResponse {
        message: PRIVATE_MESSAGE.to_string(),
    })
}

/// Unknown API paths get a JSON 404 rather than the application shell.
async fn unknown_endpoint(OriginalUri(uri): OriginalUri) -> HTTPError {
    HTTPError::not_found(format!("No API endpoint at {}", uri.path()))
}
