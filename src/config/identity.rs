use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings shared by the token verifier and the client: both sides must agree on
/// the client identifier and the signing secret or every request is rejected.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct IdentityConfig {
    /// Identity provider domain, e.g. `example.eu.auth0.com`.
    pub domain: String,
    /// Client identifier, expected in the `aud` claim.
    pub client_id: String,
    pub client_secret: String,
    /// The secret is base64 (standard or URL-safe alphabet) rather than raw bytes.
    #[serde(default)]
    pub secret_base64: bool,
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
    /// Expected `iss` claim. Not checked when absent.
    pub issuer: Option<String>,
    #[serde(default)]
    pub leeway_seconds: u64,
}

fn default_algorithms() -> Vec<String> {
    vec!["HS256".to_string()]
}

impl IdentityConfig {
    /// Raw bytes of the verification secret.
    pub fn secret_bytes(&self) -> Result<Vec<u8>, String> {
        if !self.secret_base64 {
            return Ok(self.client_secret.as_bytes().to_vec());
        }
        let normalized: String = self
            .client_secret
            .trim()
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();
        STANDARD_NO_PAD
            .decode(normalized)
            .map_err(|e| format!("client_secret is not valid base64: {}", e))
    }

    /// Base URL of the identity provider.
    pub fn base_url(&self) -> String {
        if self.domain.starts_with("http://") || self.domain.starts_with("https://") {
            self.domain.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.domain.trim_end_matches('/'))
        }
    }
}
