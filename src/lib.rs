//! Library exports for authapp, shared between the binary and tests.
//!
//! The server half (`routes`, `verifier`, `startup`) serves the public and
//! protected API plus the single-page application; the `client` half holds the
//! session logic the application runs against it.

pub mod client;
pub mod config;
pub mod models;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
pub mod verifier;
