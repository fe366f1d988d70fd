use serde::{Deserialize, Serialize};

use super::document::LinkedDocument;
use super::task::Task;

/// A trackable unit of work composed of ordered phases.
///
/// Features arrive pre-computed from the backend. Task counts are reported
/// by the backend as-is and may be inconsistent (e.g. `deferred_tasks`
/// larger than `completed_tasks`); the progress aggregator is responsible
/// for turning them into counts that satisfy the display invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Feature {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub status: FeatureStatus,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_tasks: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub completed_tasks: i64,
    /// Explicit deferred count. When absent it is derived from the phases.
    pub deferred_tasks: Option<i64>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub phases: Vec<Phase>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub linked_docs: Vec<LinkedDocument>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub related_features: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub tags: Vec<String>,
}

/// The workflow status of a feature.
///
/// - `Backlog`: Not yet started
/// - `InProgress`: Actively being worked on
/// - `Review`: Waiting on review
/// - `Done`: Finished
/// - `Deferred`: Closed with remaining work pushed out
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureStatus {
    #[default]
    Backlog,
    InProgress,
    Review,
    Done,
    Deferred,
    #[serde(other)]
    Unknown,
}

impl FeatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Done => "done",
            Self::Deferred => "deferred",
            Self::Unknown => "unknown",
        }
    }
}

/// An ordered sub-unit of a feature containing tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Phase {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    /// Numeric phase index as reported by the backend.
    #[serde(deserialize_with = "super::null_as_default")]
    pub phase: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub status: FeatureStatus,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_tasks: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub completed_tasks: i64,
    pub deferred_tasks: Option<i64>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub tasks: Vec<Task>,
}
