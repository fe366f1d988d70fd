mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the stateless HTTP surface over the linkage engine.
///
/// Every route takes a fetched snapshot in the request body and returns the
/// classified result; nothing is stored between requests.
pub fn create_router() -> Router {
    let api = Router::new()
        // Classification
        .route("/classify/sessions", post(handlers::classify_sessions))
        .route("/classify/documents", post(handlers::classify_documents))
        // Aggregation
        .route("/progress", post(handlers::feature_progress))
        // Composed views
        .route("/features/linkage", post(handlers::feature_linkage))
        .route("/sessions/artifacts", post(handlers::session_artifacts))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
