//! Request validation for the Plant Care Assistant API.
//!
//! The [`models`] module holds the validators; [`routes`] exposes them over
//! HTTP so clients can check a payload before submitting it.

pub mod clock;
pub mod config;
pub mod errors;
pub mod extract;
pub mod logging;
pub mod models;
pub mod routes;

use axum::{Extension, Router, extract::DefaultBodyLimit};

use clock::SharedClock;
use config::ServerConfig;

/// Builds the application with its layers.
pub fn app(config: &ServerConfig, clock: SharedClock) -> Router {
    routes::create_router()
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(Extension(clock))
}
