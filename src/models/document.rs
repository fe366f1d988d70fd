use serde::{Deserialize, Serialize};

/// A document linked to a feature.
///
/// `doc_type` is the backend label (`prd`, `implementation_plan`,
/// `phase_plan`, `progress`, `report`, `spec`, ...). The set is open, so it
/// is kept as a string and matched by the document classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkedDocument {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub file_path: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub doc_type: String,
    pub category: Option<String>,
}

impl LinkedDocument {
    pub fn has_doc_type(&self, doc_type: &str) -> bool {
        self.doc_type.trim().eq_ignore_ascii_case(doc_type)
    }
}
