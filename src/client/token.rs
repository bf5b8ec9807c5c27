//! Client-side look at a session token.
//!
//! The client never trusts token contents; it only reads `exp` to avoid
//! carrying on with a session the server is going to refuse anyway.

use chrono::Utc;
use jsonwebtoken::{decode, errors::Error, DecodingKey, Validation};

use crate::models::Claims;

/// Reads the claims without checking the signature or any claim.
pub fn decode_unverified(token: &str) -> Result<Claims, Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).map(|data| data.claims)
}

/// Expired means `exp` lies before `now` (seconds since the epoch).
///
/// A token that cannot be decoded counts as expired; one without `exp` does not.
pub fn is_token_expired_at(token: &str, now: i64) -> bool {
    match decode_unverified(token) {
        Ok(claims) => claims.exp.is_some_and(|exp| exp < now),
        Err(e) => {
            tracing::debug!("Undecodable token treated as expired: {}", e);
            true
        }
    }
}

pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unknown-to-the-client"),
        )
        .unwrap()
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = 1_700_000_000;
        for offset in [1, 60, 86_400, 1_000_000] {
            assert!(is_token_expired_at(&token(json!({ "exp": now - offset })), now));
        }
    }

    #[test]
    fn future_expiry_is_valid() {
        let now = 1_700_000_000;
        assert!(!is_token_expired_at(&token(json!({ "exp": now + 60 })), now));
        assert!(!is_token_expired_at(&token(json!({ "exp": now })), now));
    }

    #[test]
    fn missing_expiry_is_not_expired() {
        assert!(!is_token_expired(&token(json!({ "sub": "u" }))));
    }

    #[test]
    fn garbage_is_expired() {
        assert!(is_token_expired("not-a-jwt"));
        assert!(is_token_expired("a.b.c"));
        assert!(decode_unverified("not-a-jwt").is_err());
    }
}
