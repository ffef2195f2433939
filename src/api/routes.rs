//! API Routes
//!
//! Configures the Axum router with all tutor endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, clear_keywords_handler, create_session_handler,
    delete_session_handler, explain_handler, extract_keywords_handler, get_session_handler,
    health_handler, list_keywords_handler, list_sessions_handler, send_message_handler,
    speech_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, the browser client is served elsewhere
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/speech", post(speech_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route(
            "/sessions",
            post(create_session_handler).get(list_sessions_handler),
        )
        .route(
            "/sessions/:id",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/:id/messages", post(send_message_handler))
        .route(
            "/keywords",
            get(list_keywords_handler).delete(clear_keywords_handler),
        )
        .route("/keywords/extract", post(extract_keywords_handler))
        .route("/grammar/explain", post(explain_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
