use serde::{Deserialize, Serialize};

/// The smallest unit of tracked work inside a phase.
///
/// Tasks can optionally point at the session and commit that delivered
/// them. The status is kept as the raw backend label because the set of
/// task statuses is open-ended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub status: String,
    pub session_id: Option<String>,
    pub commit_hash: Option<String>,
    pub owner: Option<String>,
    pub source_file: Option<String>,
}

