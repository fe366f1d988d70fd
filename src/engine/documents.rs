//! Linked document grouping.
//!
//! Documents are bucketed into five fixed groups, always reported in the
//! same relative order with empty groups left out:
//!
//! ```text
//! initialPlanning → prd → plans → progress → context
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::phase::extract_phase_number;
use super::text::{contains_any, haystack, some_first_asc, title_then_path};
use crate::models::LinkedDocument;

const INITIAL_PLANNING_KEYWORDS: &[&str] = &[
    "spike",
    "adr",
    "analysis",
    "discovery",
    "research",
    "investigation",
    "architecture decision",
];

/// One of the fixed document groups, in display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DocumentGroupId {
    InitialPlanning,
    Prd,
    Plans,
    Progress,
    Context,
}

impl DocumentGroupId {
    pub const ALL: [Self; 5] = [
        Self::InitialPlanning,
        Self::Prd,
        Self::Plans,
        Self::Progress,
        Self::Context,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialPlanning => "initialPlanning",
            Self::Prd => "prd",
            Self::Plans => "plans",
            Self::Progress => "progress",
            Self::Context => "context",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InitialPlanning => "Initial Planning",
            Self::Prd => "PRDs",
            Self::Plans => "Plans",
            Self::Progress => "Progress",
            Self::Context => "Context",
        }
    }
}

/// A non-empty document group with its ordered documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentGroup {
    pub id: DocumentGroupId,
    pub label: String,
    pub docs: Vec<LinkedDocument>,
}

/// Lower-cased `doc_type + title + file_path + category`.
fn classification_text(doc: &LinkedDocument) -> String {
    haystack([
        doc.doc_type.as_str(),
        doc.title.as_str(),
        doc.file_path.as_str(),
        doc.category.as_deref().unwrap_or_default(),
    ])
}

type DocRule = fn(&LinkedDocument, &str) -> bool;

fn is_initial_planning(doc: &LinkedDocument, text: &str) -> bool {
    doc.has_doc_type("report")
        || doc.has_doc_type("spec")
        || contains_any(text, INITIAL_PLANNING_KEYWORDS)
}

fn is_prd(doc: &LinkedDocument, _text: &str) -> bool {
    doc.has_doc_type("prd")
}

fn is_plan(doc: &LinkedDocument, _text: &str) -> bool {
    doc.has_doc_type("implementation_plan") || doc.has_doc_type("phase_plan")
}

fn is_progress(doc: &LinkedDocument, _text: &str) -> bool {
    doc.has_doc_type("progress") || doc.file_path.to_lowercase().contains("/progress/")
}

/// Group rules in precedence order. Documents matching none go to `Context`.
const GROUP_RULES: &[(DocRule, DocumentGroupId)] = &[
    (is_initial_planning, DocumentGroupId::InitialPlanning),
    (is_prd, DocumentGroupId::Prd),
    (is_plan, DocumentGroupId::Plans),
    (is_progress, DocumentGroupId::Progress),
];

/// Assign a document to its group.
pub fn document_group(doc: &LinkedDocument) -> DocumentGroupId {
    let text = classification_text(doc);
    GROUP_RULES
        .iter()
        .find(|(rule, _)| rule(doc, &text))
        .map(|(_, group)| *group)
        .unwrap_or(DocumentGroupId::Context)
}

/// Precedence of an initial-planning document; lower sorts first.
pub fn initial_planning_rank(doc: &LinkedDocument) -> u8 {
    let text = classification_text(doc);
    if contains_any(&text, &["adr", "architecture decision"]) {
        0
    } else if text.contains("spike") {
        1
    } else if text.contains("report") {
        2
    } else if contains_any(&text, &["analysis", "discovery", "research"]) {
        3
    } else if doc.has_doc_type("spec") {
        4
    } else {
        5
    }
}

/// Phase number of a plan or progress document: title first, then path.
pub fn document_phase_number(doc: &LinkedDocument) -> Option<u32> {
    extract_phase_number(&doc.title, false).or_else(|| extract_phase_number(&doc.file_path, false))
}

fn by_title_then_path(a: &LinkedDocument, b: &LinkedDocument) -> Ordering {
    title_then_path(&a.title, &a.file_path, &b.title, &b.file_path)
}

fn sort_group(group: DocumentGroupId, docs: &mut [LinkedDocument]) {
    docs.sort_by(|a, b| primary_key_cmp(group, a, b).then_with(|| by_title_then_path(a, b)));
}

fn primary_key_cmp(group: DocumentGroupId, a: &LinkedDocument, b: &LinkedDocument) -> Ordering {
    match group {
        DocumentGroupId::InitialPlanning => initial_planning_rank(a).cmp(&initial_planning_rank(b)),
        DocumentGroupId::Plans | DocumentGroupId::Progress => {
            some_first_asc(document_phase_number(a), document_phase_number(b))
        }
        DocumentGroupId::Prd | DocumentGroupId::Context => Ordering::Equal,
    }
}

/// Bucket and order linked documents into the fixed groups.
pub fn classify_documents(docs: &[LinkedDocument]) -> Vec<DocumentGroup> {
    let mut buckets: [Vec<LinkedDocument>; 5] = Default::default();

    for doc in docs {
        let group = document_group(doc);
        buckets[group as usize].push(doc.clone());
    }

    let groups: Vec<DocumentGroup> = DocumentGroupId::ALL
        .into_iter()
        .zip(buckets)
        .filter(|(_, docs)| !docs.is_empty())
        .map(|(id, mut docs)| {
            sort_group(id, &mut docs);
            DocumentGroup {
                id,
                label: id.label().to_string(),
                docs,
            }
        })
        .collect();

    tracing::debug!(
        documents = docs.len(),
        groups = groups.len(),
        "classified linked documents"
    );

    groups
}
