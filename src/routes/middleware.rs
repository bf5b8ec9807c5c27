//! Cross-cutting request middleware.

use std::time::Instant;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";
const DEFAULT_ALLOWED_HEADERS: &str = "Authorization, Content-Type";

/// Logs one line per request and tags the response with a request id.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string();

    let mut response = next.run(request).await;

    let status = response.status();
    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = status.as_u16(),
        latency_ms = started.elapsed().as_secs_f64() * 1000.0,
        "{} {} {}",
        method,
        path,
        status.as_u16()
    );
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Permissive CORS: pre-flights are answered directly, every other response
/// gets the allow-origin header.
pub async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let cors = &state.config.cors;
    if !cors.enabled {
        return next.run(request).await;
    }

    let origin = match HeaderValue::from_str(&cors.allow_origin) {
        Ok(origin) => origin,
        Err(e) => {
            warn!("Invalid cors.allow_origin '{}': {}", cors.allow_origin, e);
            return next.run(request).await;
        }
    };

    if request.method() == Method::OPTIONS {
        let allowed_headers = request
            .headers()
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned()
            .unwrap_or(HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));

        let mut response = (StatusCode::NO_CONTENT, Body::empty()).into_response();
        let headers = response.headers_mut();
        set_origin(headers, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers);
        return response;
    }

    let mut response = next.run(request).await;
    set_origin(response.headers_mut(), origin);
    response
}

fn set_origin(headers: &mut HeaderMap, origin: HeaderValue) {
    if origin != "*" {
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
}
