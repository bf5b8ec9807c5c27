//! Server-side bearer token verification.
//!
//! Protected handlers take a [`VerifiedClaims`] argument; axum runs the extractor
//! before the handler body, so an unverified request never reaches it.

use std::collections::HashSet;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::IdentityConfig;
use crate::models::Claims;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Why a request was refused. All variants end up as a 401.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("no bearer credential presented")]
    MissingCredential,
    #[error("authorization header is not of the form 'Bearer <token>'")]
    MalformedHeader,
    #[error("token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

impl VerifyError {
    /// Whether the client presented something that looked like a token.
    pub fn token_presented(&self) -> bool {
        !matches!(self, VerifyError::MissingCredential)
    }
}

/// Validates signature, audience, expiry and (optionally) issuer of HMAC-signed tokens.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    realm: String,
}

impl TokenVerifier {
    pub fn new(config: &IdentityConfig) -> Result<Self, String> {
        let algorithms = config
            .algorithms
            .iter()
            .map(|name| {
                let alg = name
                    .parse::<Algorithm>()
                    .map_err(|e| format!("Unknown JWT algorithm '{}': {}", name, e))?;
                match alg {
                    Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(alg),
                    _ => Err(format!(
                        "Algorithm '{}' needs a public key; only shared-secret algorithms are supported",
                        name
                    )),
                }
            })
            .collect::<Result<Vec<_>, String>>()?;
        let first = *algorithms
            .first()
            .ok_or("identity.algorithms must not be empty")?;

        let mut validation = Validation::new(first);
        validation.algorithms = algorithms;
        validation.leeway = config.leeway_seconds;
        validation.set_audience(&[config.client_id.as_str()]);
        // exp is checked when present, aud must always be there
        validation.required_spec_claims = HashSet::from(["aud".to_string()]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        Ok(TokenVerifier {
            key: DecodingKey::from_secret(&config.secret_bytes()?),
            validation,
            realm: config.domain.clone(),
        })
    }

    /// Verifies a raw token.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }

    /// Verifies the value of an `Authorization` header.
    pub fn verify_header(&self, auth_header: Option<&str>) -> Result<Claims, VerifyError> {
        let auth_header = match auth_header.map(str::trim) {
            None | Some("") => return Err(VerifyError::MissingCredential),
            Some(h) => h,
        };
        let parts: Vec<&str> = auth_header.split_whitespace().collect();
        match parts.as_slice() {
            [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => self.verify(token),
            _ => Err(VerifyError::MalformedHeader),
        }
    }

    /// `WWW-Authenticate` value for a rejected request.
    pub fn challenge(&self, error: &VerifyError) -> String {
        if error.token_presented() {
            format!("Bearer realm=\"{}\", error=\"invalid_token\"", self.realm)
        } else {
            format!("Bearer realm=\"{}\"", self.realm)
        }
    }
}

/// Claims of a request whose bearer token passed verification.
#[derive(Debug, Clone)]
pub struct VerifiedClaims(pub Claims);

impl FromRequestParts<AppState> for VerifiedClaims {
    type Rejection = HTTPError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, HTTPError> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match state.verifier.verify_header(auth_header) {
            Ok(claims) => {
                debug!(sub = ?claims.sub, "Bearer token accepted");
                Ok(VerifiedClaims(claims))
            }
            Err(e) => {
                warn!(path = %parts.uri.path(), "Rejecting request: {}", e);
                Err(HTTPError::new(
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized access",
                    Some(state.verifier.challenge(&e)),
                ))
            }
        }
    }
}
