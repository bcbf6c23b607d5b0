//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guest submission endpoints and the token-guarded admin listing share one
//! Axum router. When a static directory is configured the invitation site
//! itself (HTML, the canvas WASM bundle) is served as the fallback service.

pub mod admin;
pub mod submissions;

use std::path::PathBuf;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes with CORS, request tracing and the submission body limit.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/rsvp", post(submissions::submit_rsvp))
        .route("/api/messages", post(submissions::submit_message).get(admin::list_messages))
        .route("/api/submissions", post(submissions::submit_combined))
        .route("/api/rsvps", get(admin::list_rsvps))
        .route("/api/rsvps/download", get(admin::download_rsvps))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// [`app`] plus static frontend assets served from `static_dir`.
pub fn app_with_static(state: AppState, max_body_bytes: usize, static_dir: PathBuf) -> Router {
    let site = ServeDir::new(static_dir).append_index_html_on_directories(true);
    app(state, max_body_bytes).fallback_service(site)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
