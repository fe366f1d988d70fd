use axum::{response::IntoResponse, Json};

use crate::engine::{self, DocumentGroup, FeatureProgress, SessionClassification};
use crate::models::{Feature, LinkedDocument, SessionLink};
use crate::view::{FeatureLinkageView, FeatureSnapshot, SessionDetailView, SessionSnapshot};

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Classification
// ============================================================

pub async fn classify_sessions(
    Json(sessions): Json<Vec<SessionLink>>,
) -> Json<SessionClassification> {
    tracing::debug!("Classifying {} linked sessions", sessions.len());
    Json(engine::classify_sessions(&sessions))
}

pub async fn classify_documents(
    Json(docs): Json<Vec<LinkedDocument>>,
) -> Json<Vec<DocumentGroup>> {
    tracing::debug!("Classifying {} linked documents", docs.len());
    Json(engine::classify_documents(&docs))
}

// ============================================================
// Aggregation
// ============================================================

pub async fn feature_progress(Json(feature): Json<Feature>) -> Json<FeatureProgress> {
    Json(engine::feature_progress(&feature))
}

// ============================================================
// Composed views
// ============================================================

pub async fn feature_linkage(Json(snapshot): Json<FeatureSnapshot>) -> Json<FeatureLinkageView> {
    tracing::debug!(feature = %snapshot.feature.id, "Building feature linkage view");
    Json(FeatureLinkageView::build(&snapshot))
}

pub async fn session_artifacts(Json(snapshot): Json<SessionSnapshot>) -> Json<SessionDetailView> {
    tracing::debug!(
        artifacts = snapshot.artifacts.len(),
        logs = snapshot.logs.len(),
        "Building session detail view"
    );
    Json(SessionDetailView::build(&snapshot))
}
