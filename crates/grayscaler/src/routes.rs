//! Route configuration.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let static_route = state.config.storage.static_route.trim_end_matches('/').to_string();
    let static_files = ServeDir::new(state.config.static_dir());
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/process",
            post(handlers::process_images).layer(DefaultBodyLimit::max(body_limit)),
        )
        .nest_service(&static_route, static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
