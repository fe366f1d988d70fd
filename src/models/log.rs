use serde::{Deserialize, Serialize};

/// A single entry of a session transcript.
///
/// Tool-call entries usually carry a [`ToolCall`]. Entries produced by a
/// sub-agent invocation point at the spawned sub-thread through
/// `linked_session_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionLog {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    /// Entry kind: `tool`, `command`, `message`, ...
    #[serde(rename = "type", deserialize_with = "super::null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub timestamp: String,
    pub linked_session_id: Option<String>,
    pub tool_call: Option<ToolCall>,
    pub metadata: Option<CommandMetadata>,
}

impl SessionLog {
    pub fn is_tool_call(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case("tool")
    }

    /// Whether this is a call to the sub-agent spawning `Task` tool.
    pub fn is_task_tool_call(&self) -> bool {
        self.is_tool_call()
            && self
                .tool_call
                .as_ref()
                .is_some_and(|call| call.name.trim() == "Task")
    }

    pub fn linked_session_id(&self) -> Option<&str> {
        self.linked_session_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// A tool invocation recorded in the transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolCall {
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub status: String,
    /// Raw serialized arguments. Not guaranteed to be valid JSON.
    #[serde(deserialize_with = "super::null_as_default")]
    pub args: String,
}

/// Parsed metadata of a slash-command entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandMetadata {
    #[serde(deserialize_with = "super::null_as_default")]
    pub phases: Vec<String>,
    pub feature_path: Option<String>,
    pub feature_slug: Option<String>,
    pub request_id: Option<String>,
}
