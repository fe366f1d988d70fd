//! ASCII tree rendering for linkage views.

use super::{FeatureLinkageView, SessionDetailView, ViewState, SECONDARY_GROUP};
use crate::engine::{session_phase_number, ProgressSegments, SessionGroup};
use crate::models::SessionLink;

const EXPANDED: char = '▾';
const COLLAPSED: char = '▸';
const CAVEAT: char = '◆';

/// A labeled node of the rendered tree.
struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn branch(label: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// A collapsible group: shows its count always, its children only when
    /// expanded.
    fn group(id: &str, label: &str, children: Vec<Node>, state: &ViewState) -> Self {
        let expanded = state.is_expanded(id);
        let marker = if expanded { EXPANDED } else { COLLAPSED };
        let label = format!("{} {} ({})", marker, label, children.len());
        if expanded {
            Self::branch(label, children)
        } else {
            Self::leaf(label)
        }
    }
}

fn segments_label(segments: &ProgressSegments) -> String {
    format!(
        "[done {} | deferred {} | incomplete {}]",
        segments.done, segments.deferred, segments.incomplete
    )
}

fn session_label(session: &SessionLink) -> String {
    let mut label = format!("{} ({:.2})", session.display_title(), session.confidence);
    if let Some(phase) = session_phase_number(session) {
        label.push_str(&format!(" phase {}", phase));
    }
    label
}

/// Render a feature's linkage view.
///
/// Example output:
/// ```text
/// Caching (60%) ◆
/// ├── Progress [done 4 | deferred 2 | incomplete 4]
/// │   └── Phase 1: 6/10 [done 4 | deferred 2 | incomplete 4]
/// ├── Sessions
/// │   ├── ▾ Execution (1)
/// │   │   └── Phase 1 work (0.95) phase 1
/// │   └── ▸ Secondary (2)
/// └── Documents
///     └── ▾ PRDs (1)
///         └── PRD v1
/// ```
pub fn render_feature_view(view: &FeatureLinkageView, state: &ViewState) -> String {
    let progress = &view.progress;

    let phases = progress
        .phases
        .iter()
        .map(|phase| {
            Node::leaf(format!(
                "Phase {}: {}/{} {}",
                phase.phase,
                phase.counts.completed,
                phase.counts.total,
                segments_label(&phase.segments)
            ))
        })
        .collect();

    let groups = [SessionGroup::Plan, SessionGroup::Execution, SessionGroup::Other];
    let mut session_groups: Vec<Node> = groups
        .into_iter()
        .filter(|group| !view.sessions.groups.get(*group).is_empty())
        .map(|group| {
            let children = view
                .sessions
                .groups
                .get(group)
                .iter()
                .map(|s| Node::leaf(session_label(s)))
                .collect();
            Node::group(group.as_str(), group.label(), children, state)
        })
        .collect();
    if !view.sessions.secondary.is_empty() {
        let children = view
            .sessions
            .secondary
            .iter()
            .map(|s| Node::leaf(session_label(s)))
            .collect();
        session_groups.push(Node::group(SECONDARY_GROUP, "Secondary", children, state));
    }

    let documents = view
        .documents
        .iter()
        .map(|group| {
            let children = group.docs.iter().map(|doc| Node::leaf(doc.title.clone())).collect();
            Node::group(group.id.as_str(), &group.label, children, state)
        })
        .collect();

    let name = if view.feature_name.is_empty() {
        &view.feature_id
    } else {
        &view.feature_name
    };
    let mut title = format!("{} ({}%)", name, progress.percent_complete);
    if progress.has_deferred_caveat {
        title.push(' ');
        title.push(CAVEAT);
    }

    let root = Node::branch(
        title,
        vec![
            Node::branch(format!("Progress {}", segments_label(&progress.segments)), phases),
            Node::branch("Sessions", session_groups),
            Node::branch("Documents", documents),
        ],
    );
    render_tree(&[root])
}

/// Render a session's merged artifacts and command tags.
pub fn render_session_view(view: &SessionDetailView) -> String {
    let groups = view
        .artifact_groups
        .iter()
        .map(|group| {
            let mut children: Vec<Node> = group
                .related_tool_calls
                .iter()
                .map(|log| {
                    let tool = log.tool_call.as_ref().map(|c| c.name.as_str()).unwrap_or("tool");
                    Node::leaf(format!("{} {}", tool, log.id))
                })
                .collect();
            children.extend(
                group
                    .threads
                    .iter()
                    .map(|thread| Node::leaf(format!("thread {}", thread.display_name()))),
            );
            Node::branch(
                format!("[{}] {} ×{}", group.kind, group.title, group.artifact_ids.len()),
                children,
            )
        })
        .collect();

    let tags = &view.command_tags;
    let tag_nodes = [
        ("commands", &tags.command_paths),
        ("features", &tags.feature_slugs),
        ("phases", &tags.command_phases),
        ("requests", &tags.requests),
    ]
    .into_iter()
    .filter(|(_, values)| !values.is_empty())
    .map(|(name, values)| Node::leaf(format!("{}: {}", name, values.join(", "))))
    .collect();

    render_tree(&[
        Node::branch("Artifacts", groups),
        Node::branch("Command tags", tag_nodes),
    ])
}

fn render_tree(nodes: &[Node]) -> String {
    let mut output = String::new();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        render_node(&mut output, node, "", is_last, true);
    }
    output
}

/// Recursively render a node and its children.
fn render_node(output: &mut String, node: &Node, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        output.push_str(&node.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&node.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}
