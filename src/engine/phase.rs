//! Phase number extraction from free text.
//!
//! Titles, commands and file names mention phases in many shapes
//! (`"Phase 3"`, `"/dev:execute-phase 2 ..."`, `"phase_04-plan.md"`). The
//! extractor finds the first `phase` token followed by optional separators
//! and digits. A bare number (`"3"`) is only accepted when the call site
//! opts in, since free text like a title is full of unrelated numbers while
//! structured metadata fields carry bare phase tokens.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static RE_PHASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)phase[\s:_\-#.]*(\d+)").expect("phase pattern is valid")
});

/// Extract a phase number from `text`.
///
/// Returns `None` when no phase is mentioned. With `allow_bare_number`, a
/// string consisting only of digits (after trimming) is accepted as-is.
pub fn extract_phase_number(text: &str, allow_bare_number: bool) -> Option<u32> {
    if let Some(caps) = RE_PHASE.captures(text) {
        if let Ok(number) = caps[1].parse() {
            return Some(number);
        }
    }

    let trimmed = text.trim();
    if allow_bare_number && !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.parse().ok();
    }

    None
}

/// Collect every phase number mentioned in `candidates`, sorted ascending
/// and de-duplicated.
pub fn collect_phase_numbers<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    allow_bare_number: bool,
) -> Vec<u32> {
    candidates
        .into_iter()
        .filter_map(|text| extract_phase_number(text, allow_bare_number))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The smallest phase number mentioned in `candidates`.
pub fn primary_phase_number<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    allow_bare_number: bool,
) -> Option<u32> {
    collect_phase_numbers(candidates, allow_bare_number)
        .first()
        .copied()
}
