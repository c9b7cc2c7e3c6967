//! Per-artefact placement outcomes.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::placement::{ArtefactId, ArtefactSpec};

/// An accepted placement.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Artefact type that was placed.
    pub artefact_id: ArtefactId,
    /// Snapped terrain point.
    pub position: Vec3,
    /// Corners of the route from the reference point, when paths are produced.
    pub path: Option<Vec<Vec3>>,
}

/// Why a candidate was discarded.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// No terrain under the candidate.
    ProbeMiss,
    /// The sample failed a height or slope gate.
    RuleRejection,
    /// The sample passed the rules but cannot be reached from the reference point.
    Unreachable,
}

/// Why the search loop for one artefact ended.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    TargetReached,
    BudgetExhausted,
    Cancelled,
    TimedOut,
}

/// Counters describing how attempts were spent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptStats {
    pub probe_misses: usize,
    pub rule_rejections: usize,
    pub unreachable: usize,
    /// Samples checked against the rules.
    pub rules_evaluated: usize,
    /// Calls made to the reachability oracle.
    pub reachability_queries: usize,
}

impl AttemptStats {
    pub fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::ProbeMiss => self.probe_misses += 1,
            Rejection::RuleRejection => self.rule_rejections += 1,
            Rejection::Unreachable => self.unreachable += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.probe_misses + self.rule_rejections + self.unreachable
    }
}

/// Outcome of the placement search for one [`ArtefactSpec`].
///
/// `placed_count <= target_count` and `placed_count <= attempt_count <= attempt_budget`
/// always hold. Under-placement is not an error; check [`PlacementReport::is_under_placed`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    pub artefact_id: ArtefactId,
    pub target_count: usize,
    pub placed_count: usize,
    pub attempt_count: usize,
    /// Accepted placements in acceptance order.
    pub placements: Vec<Placement>,
    pub stats: AttemptStats,
    pub termination: Termination,
}

impl PlacementReport {
    /// Creates an empty report for `spec`, before any attempt.
    pub fn new(spec: &ArtefactSpec) -> Self {
        Self {
            artefact_id: spec.id.clone(),
            target_count: spec.target_count,
            placed_count: 0,
            attempt_count: 0,
            placements: Vec::with_capacity(spec.target_count.min(64)),
            stats: AttemptStats::default(),
            termination: Termination::BudgetExhausted,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.placed_count >= self.target_count
    }

    pub fn is_under_placed(&self) -> bool {
        !self.is_complete()
    }

    /// Number of placements still missing.
    pub fn shortfall(&self) -> usize {
        self.target_count.saturating_sub(self.placed_count)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.placements.iter().map(|p| p.position)
    }

    pub(crate) fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
        self.placed_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_record_each_rejection_kind() {
        let mut stats = AttemptStats::default();
        stats.record(Rejection::ProbeMiss);
        stats.record(Rejection::ProbeMiss);
        stats.record(Rejection::RuleRejection);
        stats.record(Rejection::Unreachable);
        assert_eq!(stats.probe_misses, 2);
        assert_eq!(stats.rule_rejections, 1);
        assert_eq!(stats.unreachable, 1);
        assert_eq!(stats.rejected(), 4);
    }

    #[test]
    fn new_report_is_empty_and_under_placed() {
        let spec = ArtefactSpec::new("Treasure Chest", 3);
        let mut report = PlacementReport::new(&spec);
        assert_eq!(report.artefact_id, "Treasure Chest");
        assert_eq!(report.shortfall(), 3);
        assert!(report.is_under_placed());

        for i in 0..3 {
            report.push(Placement {
                artefact_id: spec.id.clone(),
                position: Vec3::splat(i as f32),
                path: None,
            });
        }
        assert!(report.is_complete());
        assert_eq!(report.shortfall(), 0);
        assert_eq!(report.positions().count(), 3);
    }
}
