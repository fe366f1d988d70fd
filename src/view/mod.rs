//! Composed views over the engine, as consumed by presentation code.
//!
//! A view is rebuilt from scratch on every refresh; nothing is cached
//! between builds. Which groups are expanded is presentation state and lives
//! in [`ViewState`], outside the classification results.

mod tree_render;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use tree_render::{render_feature_view, render_session_view};

use crate::engine::{
    classify_documents, classify_sessions, collect_command_tags, feature_progress, group_artifacts,
    ArtifactGroup, CommandTags, DocumentGroup, FeatureProgress, SessionClassification,
};
use crate::error::LinkageResult;
use crate::models::{Artifact, Feature, LinkedDocument, Session, SessionLink, SessionLog};

/// Group id of the collapsible secondary-session list.
pub const SECONDARY_GROUP: &str = "secondary";

/// Everything fetched for one feature's linkage panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSnapshot {
    pub feature: Feature,
    pub sessions: Vec<SessionLink>,
    /// Linked documents. When empty, the feature's own `linked_docs` are used.
    pub documents: Vec<LinkedDocument>,
}

/// Everything fetched for one session's detail panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    pub artifacts: Vec<Artifact>,
    pub logs: Vec<SessionLog>,
    pub threads: Vec<Session>,
}

impl FeatureSnapshot {
    pub fn load(path: &Path) -> LinkageResult<Self> {
        load_json(path)
    }
}

impl SessionSnapshot {
    pub fn load(path: &Path) -> LinkageResult<Self> {
        load_json(path)
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> LinkageResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Classified sessions, grouped documents and progress of one feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureLinkageView {
    pub feature_id: String,
    pub feature_name: String,
    pub progress: FeatureProgress,
    pub sessions: SessionClassification,
    pub documents: Vec<DocumentGroup>,
}

impl FeatureLinkageView {
    pub fn build(snapshot: &FeatureSnapshot) -> Self {
        let documents = if snapshot.documents.is_empty() {
            &snapshot.feature.linked_docs
        } else {
            &snapshot.documents
        };

        Self {
            feature_id: snapshot.feature.id.clone(),
            feature_name: snapshot.feature.name.clone(),
            progress: feature_progress(&snapshot.feature),
            sessions: classify_sessions(&snapshot.sessions),
            documents: classify_documents(documents),
        }
    }
}

/// Merged artifact groups and command tags of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetailView {
    pub artifact_groups: Vec<ArtifactGroup>,
    pub command_tags: CommandTags,
}

impl SessionDetailView {
    pub fn build(snapshot: &SessionSnapshot) -> Self {
        Self {
            artifact_groups: group_artifacts(
                &snapshot.artifacts,
                &snapshot.logs,
                &snapshot.threads,
            ),
            command_tags: collect_command_tags(&snapshot.artifacts),
        }
    }
}

/// Which groups are expanded, keyed by group id.
///
/// Groups without an explicit entry are expanded, except the secondary
/// session list which starts collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    overrides: BTreeMap<String, bool>,
}

impl ViewState {
    pub fn from_overrides(overrides: BTreeMap<String, bool>) -> Self {
        Self { overrides }
    }

    pub fn is_expanded(&self, group_id: &str) -> bool {
        self.overrides
            .get(group_id)
            .copied()
            .unwrap_or(group_id != SECONDARY_GROUP)
    }

    pub fn set_expanded(&mut self, group_id: &str, expanded: bool) {
        self.overrides.insert(group_id.to_string(), expanded);
    }

    pub fn toggle(&mut self, group_id: &str) {
        let expanded = self.is_expanded(group_id);
        self.set_expanded(group_id, !expanded);
    }

    pub fn into_overrides(self) -> BTreeMap<String, bool> {
        self.overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_starts_collapsed() {
        let state = ViewState::default();
        assert!(!state.is_expanded(SECONDARY_GROUP));
        assert!(state.is_expanded("plan"));
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut state = ViewState::default();
        state.toggle(SECONDARY_GROUP);
        state.toggle("execution");
        assert!(state.is_expanded(SECONDARY_GROUP));
        assert!(!state.is_expanded("execution"));

        let overrides = state.into_overrides();
        assert_eq!(overrides.get("execution"), Some(&false));
    }

    #[test]
    fn test_feature_docs_are_used_when_snapshot_has_none() {
        let snapshot = FeatureSnapshot {
            feature: Feature {
                linked_docs: vec![LinkedDocument {
                    id: "d1".to_string(),
                    title: "PRD".to_string(),
                    doc_type: "prd".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        };

        let view = FeatureLinkageView::build(&snapshot);
        assert_eq!(view.documents.len(), 1);
        assert_eq!(view.documents[0].docs[0].id, "d1");
    }
}
