use serde::{Deserialize, Serialize};

/// A reusable evidence record attached to a session.
///
/// Artifacts are extracted upstream from session logs; the same logical
/// object (a memory file, a skill, an agent) is often reported several times
/// and is merged by the artifact grouper.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Artifact {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    /// Artifact kind: `memory`, `request_log`, `skill`, `agent`, `task`,
    /// `command_path`, `feature_slug`, `command_phase`, `request`, `document`...
    #[serde(rename = "type", deserialize_with = "super::null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub source: String,
    pub description: Option<String>,
    pub url: Option<String>,
    /// The log entry this artifact was extracted from.
    pub source_log_id: Option<String>,
    pub source_tool_name: Option<String>,
}

impl Artifact {
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.trim().eq_ignore_ascii_case(kind)
    }
}
