//! Task count aggregation for phases and features.
//!
//! A deferred task is a completed task with a caveat, so it is counted
//! inside `completed` and reported separately. Effective counts always
//! satisfy `0 <= deferred <= completed <= total`, whatever the raw fields
//! say.

use serde::{Deserialize, Serialize};

use crate::models::{Feature, FeatureStatus, Phase};

/// Effective task counts after clamping.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub total: u64,
    pub completed: u64,
    pub deferred: u64,
}

impl TaskCounts {
    /// Clamp raw counts into a consistent triple.
    fn from_raw(total: i64, completed: i64, deferred: i64) -> Self {
        let total = clamp_non_negative(total);
        let deferred = clamp_non_negative(deferred).min(total);
        let completed = clamp_non_negative(completed).max(deferred).min(total);
        Self {
            total,
            completed,
            deferred,
        }
    }

    /// Rounded completion percentage; 0 when there are no tasks.
    pub fn percent_complete(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = (self.completed as f64 / self.total as f64 * 100.0).round();
        percent.clamp(0.0, 100.0) as u8
    }

    /// Disjoint bar segments that sum to `total`.
    pub fn segments(&self) -> ProgressSegments {
        ProgressSegments {
            done: self.completed - self.deferred,
            deferred: self.deferred,
            incomplete: self.total - self.completed,
        }
    }
}

/// Segments of a rendered progress bar.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSegments {
    /// Completed without caveat.
    pub done: u64,
    pub deferred: u64,
    pub incomplete: u64,
}

fn clamp_non_negative(value: i64) -> u64 {
    value.max(0) as u64
}

/// Deferred count of a phase, never negative.
pub fn effective_deferred(phase: &Phase) -> u64 {
    phase_counts(phase).deferred
}

/// Completed count of a phase, never below its deferred count.
pub fn effective_completed(phase: &Phase) -> u64 {
    phase_counts(phase).completed
}

pub fn phase_counts(phase: &Phase) -> TaskCounts {
    TaskCounts::from_raw(
        phase.total_tasks,
        phase.completed_tasks,
        phase.deferred_tasks.unwrap_or(0),
    )
}

/// Feature deferred count: the explicit field when present, otherwise the
/// sum over phases.
pub fn effective_deferred_feature(feature: &Feature) -> u64 {
    feature_counts(feature).deferred
}

pub fn effective_completed_feature(feature: &Feature) -> u64 {
    feature_counts(feature).completed
}

pub fn feature_counts(feature: &Feature) -> TaskCounts {
    let deferred = match feature.deferred_tasks {
        Some(deferred) => deferred,
        None => feature
            .phases
            .iter()
            .map(|phase| effective_deferred(phase) as i64)
            .fold(0i64, i64::saturating_add),
    };
    TaskCounts::from_raw(feature.total_tasks, feature.completed_tasks, deferred)
}

/// Whether the feature must be flagged as complete-with-caveat.
pub fn has_deferred_caveat(feature: &Feature) -> bool {
    feature.status == FeatureStatus::Deferred || effective_deferred_feature(feature) > 0
}

/// Aggregated progress of one phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase_id: String,
    pub phase: i64,
    pub counts: TaskCounts,
    pub percent_complete: u8,
    pub segments: ProgressSegments,
}

impl PhaseProgress {
    pub fn from_phase(phase: &Phase) -> Self {
        let counts = phase_counts(phase);
        Self {
            phase_id: phase.id.clone(),
            phase: phase.phase,
            counts,
            percent_complete: counts.percent_complete(),
            segments: counts.segments(),
        }
    }
}

/// Aggregated progress of a feature and its phases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProgress {
    pub feature_id: String,
    pub counts: TaskCounts,
    pub percent_complete: u8,
    pub segments: ProgressSegments,
    pub has_deferred_caveat: bool,
    /// Ordered by phase index.
    pub phases: Vec<PhaseProgress>,
}

pub fn feature_progress(feature: &Feature) -> FeatureProgress {
    let counts = feature_counts(feature);
    let mut phases: Vec<PhaseProgress> =
        feature.phases.iter().map(PhaseProgress::from_phase).collect();
    phases.sort_by_key(|p| p.phase);

    FeatureProgress {
        feature_id: feature.id.clone(),
        counts,
        percent_complete: counts.percent_complete(),
        segments: counts.segments(),
        has_deferred_caveat: has_deferred_caveat(feature),
        phases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(total: i64, completed: i64, deferred: Option<i64>) -> Phase {
        Phase {
            total_tasks: total,
            completed_tasks: completed,
            deferred_tasks: deferred,
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_clamp_inconsistent_input() {
        let counts = phase_counts(&phase(5, 1, Some(9)));
        assert_eq!(counts.deferred, 5);
        assert_eq!(counts.completed, 5);

        let counts = phase_counts(&phase(-3, -1, Some(-2)));
        assert_eq!(counts, TaskCounts::default());
    }

    #[test]
    fn test_percent_rounds() {
        let counts = phase_counts(&phase(3, 2, None));
        assert_eq!(counts.percent_complete(), 67);
        assert_eq!(phase_counts(&phase(0, 0, None)).percent_complete(), 0);
    }

    #[test]
    fn test_phase_deferred_sum_saturates() {
        let feature = Feature {
            total_tasks: i64::MAX,
            completed_tasks: 0,
            phases: vec![
                phase(i64::MAX, 0, Some(i64::MAX)),
                phase(i64::MAX, 0, Some(i64::MAX)),
            ],
            ..Default::default()
        };

        let counts = feature_counts(&feature);
        assert_eq!(counts.deferred, i64::MAX as u64);
        assert_eq!(counts.completed, i64::MAX as u64);
        assert_eq!(counts.segments().incomplete, 0);
        assert_eq!(counts.percent_complete(), 100);
    }
}
