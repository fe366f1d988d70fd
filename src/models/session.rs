use serde::{Deserialize, Serialize};

/// An agent work session linked to a feature.
///
/// Links are produced by the backend link-resolution service. `confidence`
/// and `reasons` are opaque scores computed upstream; they are consumed here
/// as-is and never re-derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionLink {
    #[serde(deserialize_with = "super::null_as_default")]
    pub session_id: String,
    /// Explicit title, when the session has been named.
    pub title: Option<String>,
    /// Link confidence in `0.0..=1.0`.
    #[serde(deserialize_with = "super::null_as_default")]
    pub confidence: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub reasons: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub commands: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub commit_hashes: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub models: Vec<String>,
    /// RFC 3339 start timestamp. Unparsable values sort as the oldest.
    #[serde(deserialize_with = "super::null_as_default")]
    pub started_at: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_cost: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub duration_seconds: f64,
    pub session_type: Option<String>,
    pub parent_session_id: Option<String>,
    pub is_primary_link: Option<bool>,
    pub is_subthread: Option<bool>,
    pub workflow_type: Option<String>,
    pub link_strategy: Option<String>,
    pub session_metadata: Option<SessionMetadata>,
}

impl SessionLink {
    /// Title shown for the session: explicit title, then the related
    /// command, then the raw session id.
    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref())
            .or_else(|| {
                self.session_metadata
                    .as_ref()
                    .and_then(|m| non_empty(m.related_command.as_deref()))
            })
            .unwrap_or(&self.session_id)
    }
}

/// Structured metadata attached to a session by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionMetadata {
    pub session_type_label: Option<String>,
    pub related_command: Option<String>,
    /// Phase tokens such as `"2"`, `"phase-3"` or `"all"`.
    #[serde(deserialize_with = "super::null_as_default")]
    pub related_phases: Vec<String>,
    pub related_file_path: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub fields: Vec<MetadataField>,
}

/// An arbitrary labeled value attached to session metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MetadataField {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub value: String,
}

/// A session record used to resolve sub-thread evidence.
///
/// Sub-threads are sessions spawned by a parent session (typically through a
/// `Task` tool call). Only the fields needed to name a thread are modeled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    pub title: Option<String>,
    pub agent_name: Option<String>,
    pub parent_session_id: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub started_at: String,
}

impl Session {
    /// Human-facing thread name: agent name, then title, then id.
    pub fn display_name(&self) -> &str {
        non_empty(self.agent_name.as_deref())
            .or_else(|| non_empty(self.title.as_deref()))
            .unwrap_or(&self.id)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
