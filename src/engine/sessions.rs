//! Session tiering and grouping.
//!
//! Linked sessions are split into a primary tier (authoritative links) and a
//! secondary tier. Primary sessions are further grouped by core activity:
//! planning, execution, or other. Grouping is an ordered first-match-wins
//! rule chain: plan, then execution, then other.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::phase::{extract_phase_number, primary_phase_number};
use super::text::{confidence_desc, contains_any, haystack, newest_first, some_first_asc};
use crate::models::SessionLink;

/// Links at or above this confidence are primary even without an explicit flag.
pub const PRIMARY_CONFIDENCE_THRESHOLD: f64 = 0.9;

const PLAN_KEYWORDS: &[&str] = &[
    "/plan:",
    "planning",
    "analysis",
    "spike",
    "adr",
    "discovery",
    "research",
    "scoping",
];

const EXECUTION_KEYWORDS: &[&str] = &[
    "/dev:execute-phase",
    "execute-phase",
    "execution",
    "implement",
    "implementation",
    "quick-feature",
];

const EXECUTION_WORKFLOWS: &[&str] = &["execution", "debug", "enhancement"];

/// Core-activity group of a primary session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionGroup {
    Plan,
    Execution,
    Other,
}

impl SessionGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Execution => "execution",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Plan => "Planning",
            Self::Execution => "Execution",
            Self::Other => "Other",
        }
    }
}

/// Primary sessions bucketed by core activity, each bucket already ordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionGroups {
    pub plan: Vec<SessionLink>,
    pub execution: Vec<SessionLink>,
    pub other: Vec<SessionLink>,
}

impl SessionGroups {
    pub fn get(&self, group: SessionGroup) -> &[SessionLink] {
        match group {
            SessionGroup::Plan => &self.plan,
            SessionGroup::Execution => &self.execution,
            SessionGroup::Other => &self.other,
        }
    }

    fn get_mut(&mut self, group: SessionGroup) -> &mut Vec<SessionLink> {
        match group {
            SessionGroup::Plan => &mut self.plan,
            SessionGroup::Execution => &mut self.execution,
            SessionGroup::Other => &mut self.other,
        }
    }
}

/// Result of [`classify_sessions`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClassification {
    pub primary: Vec<SessionLink>,
    pub secondary: Vec<SessionLink>,
    pub groups: SessionGroups,
}

/// Fields of a session that the grouping rules look at, computed once.
struct SessionFacts<'a> {
    workflow: String,
    text: String,
    phase: Option<u32>,
    session: &'a SessionLink,
}

impl<'a> SessionFacts<'a> {
    fn new(session: &'a SessionLink) -> Self {
        let metadata = session.session_metadata.as_ref();
        let workflow = session
            .workflow_type
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let text = haystack(
            [
                session.workflow_type.as_deref(),
                session.session_type.as_deref(),
                metadata.and_then(|m| m.session_type_label.as_deref()),
                session.title.as_deref(),
            ]
            .into_iter()
            .flatten()
            .chain(session.reasons.iter().map(String::as_str))
            .chain(session.commands.iter().map(String::as_str)),
        );

        Self {
            workflow,
            text,
            phase: session_phase_number(session),
            session,
        }
    }
}

type GroupRule = fn(&SessionFacts) -> bool;

fn is_plan(facts: &SessionFacts) -> bool {
    facts.workflow == "planning" || contains_any(&facts.text, PLAN_KEYWORDS)
}

fn is_execution(facts: &SessionFacts) -> bool {
    EXECUTION_WORKFLOWS.contains(&facts.workflow.as_str())
        || contains_any(&facts.text, EXECUTION_KEYWORDS)
        || facts.phase.is_some()
}

/// Grouping rules in precedence order. Sessions matching none are `Other`.
const GROUP_RULES: &[(GroupRule, SessionGroup)] = &[
    (is_plan, SessionGroup::Plan),
    (is_execution, SessionGroup::Execution),
];

/// Whether the link is authoritative for its feature.
pub fn is_primary_link(session: &SessionLink) -> bool {
    session.is_primary_link.unwrap_or(false) || session.confidence >= PRIMARY_CONFIDENCE_THRESHOLD
}

/// The smallest phase the session works on.
///
/// Metadata phase tokens accept bare numbers; title and commands need an
/// explicit `phase` marker.
pub fn session_phase_number(session: &SessionLink) -> Option<u32> {
    let from_metadata = session
        .session_metadata
        .as_ref()
        .map(|m| m.related_phases.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|token| extract_phase_number(token, true));

    let from_text = primary_phase_number(
        session
            .title
            .iter()
            .chain(session.commands.iter())
            .map(String::as_str),
        false,
    );

    from_metadata.chain(from_text).min()
}

/// Group a primary session by core activity.
pub fn session_group(session: &SessionLink) -> SessionGroup {
    group_of(&SessionFacts::new(session))
}

fn group_of(facts: &SessionFacts) -> SessionGroup {
    GROUP_RULES
        .iter()
        .find(|(rule, _)| rule(facts))
        .map(|(_, group)| *group)
        .unwrap_or(SessionGroup::Other)
}

fn by_confidence_then_recency(a: &SessionLink, b: &SessionLink) -> Ordering {
    confidence_desc(a.confidence, b.confidence)
        .then_with(|| newest_first(&a.started_at, &b.started_at))
}

/// Tier, group and order linked sessions.
///
/// Every input session lands in exactly one tier; every primary session in
/// exactly one group. The execution group is ordered by phase number (missing
/// last), the other groups and both tiers by confidence then recency.
pub fn classify_sessions(sessions: &[SessionLink]) -> SessionClassification {
    let mut result = SessionClassification::default();
    let mut execution: Vec<SessionFacts> = Vec::new();

    for session in sessions {
        if !is_primary_link(session) {
            result.secondary.push(session.clone());
            continue;
        }

        result.primary.push(session.clone());
        let facts = SessionFacts::new(session);
        match group_of(&facts) {
            SessionGroup::Execution => execution.push(facts),
            group => result.groups.get_mut(group).push(session.clone()),
        }
    }

    execution.sort_by(|a, b| {
        some_first_asc(a.phase, b.phase)
            .then_with(|| by_confidence_then_recency(a.session, b.session))
    });
    result.groups.execution = execution.into_iter().map(|f| f.session.clone()).collect();

    result.primary.sort_by(by_confidence_then_recency);
    result.secondary.sort_by(by_confidence_then_recency);
    result.groups.plan.sort_by(by_confidence_then_recency);
    result.groups.other.sort_by(by_confidence_then_recency);

    tracing::debug!(
        primary = result.primary.len(),
        secondary = result.secondary.len(),
        plan = result.groups.plan.len(),
        execution = result.groups.execution.len(),
        other = result.groups.other.len(),
        "classified linked sessions"
    );

    result
}
