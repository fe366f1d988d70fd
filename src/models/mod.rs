//! Input models consumed by the linkage engine.
//!
//! # Core Concepts
//!
//! Everything here is produced upstream by the dashboard backend and treated
//! as a read-only snapshot. Every struct deserializes with `#[serde(default)]`
//! so absent optional fields become empty strings, empty lists or zero. An
//! explicit `null` is read the same way as an absent field.
//!
//! ## Feature tracking
//!
//! - [`Feature`]: A trackable unit of work made of ordered [`Phase`]s.
//! - [`Phase`]: An ordered sub-unit of a feature containing [`Task`]s.
//! - [`Task`]: The smallest unit of tracked work.
//!
//! ## Linkage
//!
//! - [`SessionLink`]: An agent session linked to a feature with a confidence score.
//! - [`LinkedDocument`]: A document linked to a feature.
//!
//! ## Session detail
//!
//! - [`Artifact`]: Evidence records (memories, skills, agents) extracted from a session.
//! - [`SessionLog`]: Transcript entries, optionally carrying a [`ToolCall`].
//! - [`Session`]: Sub-thread sessions referenced from transcript entries.

use serde::{Deserialize, Deserializer};

mod artifact;
mod document;
mod feature;
mod log;
mod session;
mod task;

pub use artifact::*;
pub use document::*;
pub use feature::*;
pub use log::*;
pub use session::*;
pub use task::*;

/// Deserialize a field, mapping JSON `null` to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_fields_read_as_defaults() {
        let links: Vec<SessionLink> = serde_json::from_str(
            r#"[{"sessionId":"s","confidence":null,"status":null,"reasons":null}]"#,
        )
        .unwrap();
        assert_eq!(links[0].session_id, "s");
        assert_eq!(links[0].confidence, 0.0);
        assert!(links[0].status.is_empty());
        assert!(links[0].reasons.is_empty());

        let doc: LinkedDocument =
            serde_json::from_str(r#"{"id":"d","title":null,"filePath":null}"#).unwrap();
        assert!(doc.title.is_empty());
        assert!(doc.file_path.is_empty());

        let log: SessionLog =
            serde_json::from_str(r#"{"id":"l","type":null,"timestamp":null}"#).unwrap();
        assert!(log.kind.is_empty());
        assert!(log.timestamp.is_empty());

        let feature: Feature =
            serde_json::from_str(r#"{"id":"f","status":null,"totalTasks":null}"#).unwrap();
        assert_eq!(feature.status, FeatureStatus::Backlog);
        assert_eq!(feature.total_tasks, 0);
    }

    #[test]
    fn test_wrong_types_are_still_rejected() {
        assert!(serde_json::from_str::<SessionLink>(r#"{"confidence":"high"}"#).is_err());
    }
}
