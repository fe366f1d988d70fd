//! Linkage classification and aggregation engine.
//!
//! Every function here is a pure, synchronous computation over an
//! already-fetched snapshot. The same input always produces the same output
//! and nothing here can fail: absent fields count as empty and malformed
//! payloads simply contribute no evidence.
//!
//! - [`phase`]: phase numbers mentioned in free text.
//! - [`sessions`]: primary/secondary tiers and plan/execution/other groups.
//! - [`documents`]: the five fixed document groups.
//! - [`progress`]: completed/deferred/total counts and bar segments.
//! - [`artifacts`]: merged artifact groups with tool-call evidence.

pub mod artifacts;
pub mod documents;
pub mod phase;
pub mod progress;
pub mod sessions;
pub mod text;

pub use artifacts::{
    collect_command_tags, group_artifacts, resolve_subagent_name, ArtifactGroup, ArtifactKey,
    CommandTags,
};
pub use documents::{classify_documents, DocumentGroup, DocumentGroupId};
pub use phase::{collect_phase_numbers, extract_phase_number, primary_phase_number};
pub use progress::{
    effective_completed, effective_completed_feature, effective_deferred,
    effective_deferred_feature, feature_progress, has_deferred_caveat, FeatureProgress,
    PhaseProgress, ProgressSegments, TaskCounts,
};
pub use sessions::{
    classify_sessions, is_primary_link, session_group, session_phase_number, SessionClassification,
    SessionGroup, SessionGroups, PRIMARY_CONFIDENCE_THRESHOLD,
};
