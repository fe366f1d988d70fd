//! Artifact de-duplication and evidence resolution.
//!
//! Upstream extraction reports the same logical artifact many times (once
//! per tool call that touched it). Artifacts are merged by their normalized
//! `(type, title, source, url)` key and each merged group is linked back to
//! the tool-call logs and sub-threads that produced it.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Artifact, Session, SessionLog};

/// Artifact kinds surfaced as command metadata instead of artifact cards.
pub const TAG_ONLY_KINDS: &[&str] = &["command_path", "feature_slug", "command_phase", "request"];

/// Argument keys naming the sub-agent of a `Task` tool call, in lookup order.
const SUBAGENT_KEYS: &[&str] = &["subagent_type", "subagentType", "agent_name", "agentName"];
const SUBAGENT_CONFIG_KEYS: &[&str] = &["name", "id", "type"];

static RE_AGENT_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^agent-[\w-]+$").expect("placeholder pattern is valid"));

/// Composite identity of a merged artifact group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub kind: String,
    pub title: String,
    pub source: String,
    pub url: String,
}

impl ArtifactKey {
    pub fn of(artifact: &Artifact) -> Self {
        Self {
            kind: normalize(&artifact.kind),
            title: normalize(&artifact.title),
            source: normalize(&artifact.source),
            url: normalize(artifact.url.as_deref().unwrap_or_default()),
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Artifacts merged under one key, with their resolved evidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactGroup {
    pub key: ArtifactKey,
    /// Kind and title as first reported.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub source: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub artifact_ids: Vec<String>,
    pub source_log_ids: Vec<String>,
    pub source_tool_names: Vec<String>,
    pub related_tool_calls: Vec<SessionLog>,
    pub threads: Vec<Session>,
}

impl ArtifactGroup {
    fn new(key: ArtifactKey, artifact: &Artifact) -> Self {
        Self {
            key,
            kind: artifact.kind.trim().to_string(),
            title: artifact.title.trim().to_string(),
            source: artifact.source.trim().to_string(),
            description: None,
            url: None,
            artifact_ids: Vec::new(),
            source_log_ids: Vec::new(),
            source_tool_names: Vec::new(),
            related_tool_calls: Vec::new(),
            threads: Vec::new(),
        }
    }

    fn absorb(&mut self, artifact: &Artifact) {
        self.artifact_ids.push(artifact.id.clone());
        if self.description.is_none() {
            self.description = non_empty(artifact.description.as_deref());
        }
        if self.url.is_none() {
            self.url = non_empty(artifact.url.as_deref());
        }
        if let Some(log_id) = non_empty(artifact.source_log_id.as_deref()) {
            push_unique(&mut self.source_log_ids, log_id);
        }
        if let Some(tool) = non_empty(artifact.source_tool_name.as_deref()) {
            push_unique(&mut self.source_tool_names, tool);
        }
    }

    pub fn is_agent(&self) -> bool {
        self.key.kind == "agent"
    }

    /// A generic `agent-<id>` group created before the agent was named.
    pub fn is_agent_placeholder(&self) -> bool {
        self.is_agent() && RE_AGENT_PLACEHOLDER.is_match(&self.title)
    }

    /// Record a source log as evidence. Only tool-call entries are kept as
    /// related calls; the linked sub-thread is resolved for any entry.
    fn attach_log(&mut self, log: &SessionLog, threads: &HashMap<&str, &Session>) {
        if log.is_tool_call() && !self.related_tool_calls.iter().any(|l| l.id == log.id) {
            self.related_tool_calls.push(log.clone());
        }
        if let Some(thread) = log.linked_session_id().and_then(|id| threads.get(id)) {
            if !self.threads.iter().any(|t| t.id == thread.id) {
                self.threads.push((*thread).clone());
            }
        }
    }

    fn claims_thread_of(&self, other: &ArtifactGroup) -> bool {
        self.threads
            .iter()
            .any(|thread| other.threads.iter().any(|t| t.id == thread.id))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn same_name(a: &str, b: &str) -> bool {
    let a = a.trim();
    !a.is_empty() && a.eq_ignore_ascii_case(b.trim())
}

/// Resolve the sub-agent named in serialized `Task` tool-call arguments.
///
/// Unparsable or non-object payloads resolve to `None`.
pub fn resolve_subagent_name(args: &str) -> Option<String> {
    let value: Value = serde_json::from_str(args).ok()?;
    let object = value.as_object()?;

    let direct = SUBAGENT_KEYS.iter().filter_map(|key| object.get(*key));
    let nested = object
        .get("config")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|config| SUBAGENT_CONFIG_KEYS.iter().filter_map(move |key| config.get(*key)));

    direct
        .chain(nested)
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

/// Merge artifacts and attach tool-call and sub-thread evidence.
///
/// Groups are ordered by member count (largest first), then by title.
pub fn group_artifacts(
    artifacts: &[Artifact],
    logs: &[SessionLog],
    threads: &[Session],
) -> Vec<ArtifactGroup> {
    let logs_by_id: HashMap<&str, &SessionLog> =
        logs.iter().map(|log| (log.id.as_str(), log)).collect();
    let threads_by_id: HashMap<&str, &Session> =
        threads.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut by_key: BTreeMap<ArtifactKey, ArtifactGroup> = BTreeMap::new();
    for artifact in artifacts
        .iter()
        .filter(|a| !TAG_ONLY_KINDS.iter().any(|kind| a.is_kind(kind)))
    {
        let key = ArtifactKey::of(artifact);
        by_key
            .entry(key.clone())
            .or_insert_with(|| ArtifactGroup::new(key, artifact))
            .absorb(artifact);
    }

    let mut groups: Vec<ArtifactGroup> = by_key.into_values().collect();

    for group in &mut groups {
        let source_logs: Vec<&SessionLog> = group
            .source_log_ids
            .iter()
            .filter_map(|id| logs_by_id.get(id.as_str()).copied())
            .collect();
        for log in source_logs {
            group.attach_log(log, &threads_by_id);
        }

        if group.is_agent() {
            attach_subagent_calls(group, logs, &threads_by_id);
        }
    }

    let mut groups = suppress_agent_placeholders(groups);
    groups.sort_by(|a, b| {
        b.artifact_ids
            .len()
            .cmp(&a.artifact_ids.len())
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.key.cmp(&b.key))
    });

    tracing::debug!(
        artifacts = artifacts.len(),
        groups = groups.len(),
        "grouped session artifacts"
    );

    groups
}

/// Attach `Task` tool calls that invoked the group's agent, either by the
/// sub-agent named in their arguments or by the name of the spawned thread.
fn attach_subagent_calls(
    group: &mut ArtifactGroup,
    logs: &[SessionLog],
    threads: &HashMap<&str, &Session>,
) {
    for log in logs.iter().filter(|log| log.is_task_tool_call()) {
        let by_args = log
            .tool_call
            .as_ref()
            .and_then(|call| resolve_subagent_name(&call.args))
            .is_some_and(|name| same_name(&name, &group.title));
        let by_thread = log
            .linked_session_id()
            .and_then(|id| threads.get(id))
            .is_some_and(|thread| same_name(thread.display_name(), &group.title));

        if by_args || by_thread {
            group.attach_log(log, threads);
        }
    }
}

/// Drop `agent-<id>` groups whose thread is already claimed by a named agent
/// group.
fn suppress_agent_placeholders(groups: Vec<ArtifactGroup>) -> Vec<ArtifactGroup> {
    let keep: Vec<bool> = groups
        .iter()
        .map(|group| {
            !group.is_agent_placeholder()
                || !groups.iter().any(|other| {
                    other.is_agent()
                        && !other.is_agent_placeholder()
                        && other.claims_thread_of(group)
                })
        })
        .collect();

    groups
        .into_iter()
        .zip(keep)
        .filter_map(|(group, keep)| keep.then_some(group))
        .collect()
}

/// Values of the tag-only artifacts, surfaced as command metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandTags {
    pub command_paths: Vec<String>,
    pub feature_slugs: Vec<String>,
    pub command_phases: Vec<String>,
    pub requests: Vec<String>,
}

impl CommandTags {
    pub fn is_empty(&self) -> bool {
        self.command_paths.is_empty()
            && self.feature_slugs.is_empty()
            && self.command_phases.is_empty()
            && self.requests.is_empty()
    }
}

/// Collect the artifacts excluded from grouping as command tags.
///
/// Values are trimmed and de-duplicated case-insensitively, keeping the first
/// spelling seen.
pub fn collect_command_tags(artifacts: &[Artifact]) -> CommandTags {
    let mut tags = CommandTags::default();
    for artifact in artifacts {
        let target = match normalize(&artifact.kind).as_str() {
            "command_path" => &mut tags.command_paths,
            "feature_slug" => &mut tags.feature_slugs,
            "command_phase" => &mut tags.command_phases,
            "request" => &mut tags.requests,
            _ => continue,
        };
        let Some(value) = non_empty(Some(artifact.title.as_str())) else {
            continue;
        };
        if !target.iter().any(|existing| existing.eq_ignore_ascii_case(&value)) {
            target.push(value);
        }
    }
    tags
}
