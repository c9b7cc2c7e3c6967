//! Constrained placement search for artefacts across a terrain.
//!
//! For each [`ArtefactSpec`] the engine samples candidates, evaluates them against the
//! terrain, filters them by the spec's [`PlacementRules`] and keeps only those reachable
//! from the reference point, until the target count or the attempt budget is reached.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod cancel;
pub mod events;
pub mod report;
pub mod rules;
pub mod runner;
pub mod seed;

pub use rules::{bound_from_sentinel, satisfies_rules, PlacementRules};

/// Attempts allowed per artefact when no budget is configured.
pub const DEFAULT_ATTEMPT_BUDGET: usize = 100;

pub type ArtefactId = String;

/// Declarative description of one artefact type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct ArtefactSpec {
    /// Name used in logs and reports. Never used to pick rules.
    pub id: ArtefactId,
    /// Opaque asset reference for whoever instantiates the placements.
    #[cfg_attr(feature = "serde", serde(default))]
    pub asset: Option<String>,
    /// Number of instances to place.
    pub target_count: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: PlacementRules,
}

impl ArtefactSpec {
    pub fn new(id: impl Into<ArtefactId>, target_count: usize) -> Self {
        Self {
            id: id.into(),
            asset: None,
            target_count,
            rules: PlacementRules::default(),
        }
    }

    /// Sets the opaque asset reference.
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Replaces all placement rules.
    pub fn with_rules(mut self, rules: PlacementRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the minimum normalized height.
    pub fn with_min_height(mut self, min: f32) -> Self {
        self.rules.min_height = Some(min);
        self
    }

    /// Sets the maximum normalized height.
    pub fn with_max_height(mut self, max: f32) -> Self {
        self.rules.max_height = Some(max);
        self
    }

    /// Sets the minimum slope in degrees.
    pub fn with_min_slope(mut self, min_deg: f32) -> Self {
        self.rules.min_slope = Some(min_deg);
        self
    }

    /// Sets the maximum slope in degrees.
    pub fn with_max_slope(mut self, max_deg: f32) -> Self {
        self.rules.max_slope = Some(max_deg);
        self
    }

    /// Validates the spec, returning an error if it cannot be searched for.
    pub fn validate(&self) -> Result<()> {
        if self.target_count == 0 {
            return Err(Error::InvalidConfig(format!(
                "artefact '{}' must have target_count > 0",
                self.id
            )));
        }
        self.rules
            .validate()
            .map_err(|e| Error::InvalidConfig(format!("artefact '{}': {e}", self.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_bounds_and_asset() {
        let spec = ArtefactSpec::new("Treasure Chest", 3)
            .with_asset("prefabs/chest")
            .with_min_height(0.75)
            .with_max_slope(10.0);
        assert_eq!(spec.id, "Treasure Chest");
        assert_eq!(spec.asset.as_deref(), Some("prefabs/chest"));
        assert_eq!(spec.rules.min_height, Some(0.75));
        assert_eq!(spec.rules.max_slope, Some(10.0));
        assert_eq!(spec.rules.max_height, None);
        assert_eq!(spec.rules.min_slope, None);
    }

    #[test]
    fn validate_rejects_zero_target_and_nan_bounds() {
        assert!(ArtefactSpec::new("a", 0).validate().is_err());
        assert!(ArtefactSpec::new("a", 1)
            .with_min_height(f32::NAN)
            .validate()
            .is_err());
        assert!(ArtefactSpec::new("a", 1).validate().is_ok());
    }

    #[test]
    fn inverted_bounds_still_validate() {
        let spec = ArtefactSpec::new("a", 1)
            .with_min_slope(40.0)
            .with_max_slope(10.0);
        assert!(spec.validate().is_ok());
    }
}
