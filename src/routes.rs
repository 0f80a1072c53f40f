use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let upload_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/api/detect-language", post(handlers::detect_language))
        .route(
            "/api/ocr",
            post(handlers::ocr).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/translate", post(handlers::translate))
        .route("/api/ask", post(handlers::ask))

        // Health check
        .route("/health", get(handlers::health))

        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
