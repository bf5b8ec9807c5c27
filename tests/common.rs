#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use authapp::config::{extract_config, ConfigV1};
use authapp::routes::create_router;
use authapp::state::AppState;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use chrono::Utc;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

pub const CLIENT_ID: &str = "z21JLgCKTTXPTpjhUSREflDexnHrheuz";
pub const SECRET: &str = "integration-secret";
pub const INDEX_HTML: &str = "<!doctype html><html><body ng-app=\"authApp\"></body></html>";

/// Writes a minimal single-page application into `root`.
pub fn write_public_dir(root: &Path) {
    std::fs::create_dir_all(root.join("css")).expect("create css dir");
    std::fs::write(root.join("index.html"), INDEX_HTML).expect("write index");
    std::fs::write(root.join("css").join("app.css"), "body { margin: 0; }").expect("write css");
}

pub fn test_config(static_root: &Path) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
bind_address: 127.0.0.1:0
logging:
  level: "warn"
  format: "json"
identity:
  domain: tenant.example.com
  client_id: "{CLIENT_ID}"
  client_secret: "{SECRET}"
static_files:
  root: "{root}"
"#,
        root = static_root.display()
    );

    extract_config(Figment::new().merge(Yaml::string(&yaml))).expect("Failed to parse test config")
}

pub fn build_app(config: ConfigV1) -> Router {
    let state = AppState::new(Arc::new(config)).expect("state should build");
    create_router(state)
}

pub fn sign(claims: Value, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("Failed to create token")
}

/// A token the server accepts: right secret, right audience, an hour left.
pub fn valid_token() -> String {
    sign(
        json!({
            "sub": "auth0|123",
            "aud": CLIENT_ID,
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + 3600,
        }),
        SECRET.as_bytes(),
    )
}

pub fn request(path: &str, authorization: Option<&str>, method: Method) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
