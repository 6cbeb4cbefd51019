use crate::{
    AppState,
    handlers, // Import handlers module
};
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Creates the Axum router and associates routes with handlers.
///
/// Everything outside the upload API falls through to the static capture
/// page, so `GET /` serves `index.html` from `static_dir`.
pub fn create_router(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/api/upload", post(handlers::upload_photo))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        // Middleware Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        // The upload contract enforces no request size limit
        .layer(DefaultBodyLimit::disable())
        .with_state(state) // Pass the application state
}
