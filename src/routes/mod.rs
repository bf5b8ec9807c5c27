//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! the JSON API, health checks and the single-page application itself.

mod api_routes;
mod app_routes;
mod health_routes;
mod middleware;

use crate::state::AppState;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Anything not matched by the API or health routes is handed to the
/// single-page application, which does its own routing client-side.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(api_routes::routes())
        .merge(health_routes::routes())
        .fallback_service(app_routes::app_service(&state.config.static_files))
        .layer(from_fn_with_state(state.clone(), middleware::cors))
        .layer(from_fn(middleware::log_requests))
        .with_state(state)
}
