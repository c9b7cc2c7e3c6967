//! Declarative placement rules.
//!
//! Each artefact type carries up to four optional bounds on the terrain features measured
//! at a candidate: normalized height and slope angle. Rules are data, so adding a new
//! artefact type never needs new code paths.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Optional inclusive bounds on normalized height (`[0, 1]`) and slope (degrees).
///
/// `None` leaves a bound unset.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlacementRules {
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub min_slope: Option<f32>,
    pub max_slope: Option<f32>,
}

impl PlacementRules {
    /// Rules that accept every sample.
    pub const UNCONSTRAINED: Self = Self {
        min_height: None,
        max_height: None,
        min_slope: None,
        max_slope: None,
    };

    /// Builds rules from values where a negative number means "unset".
    pub fn from_sentinels(
        min_height: f32,
        max_height: f32,
        min_slope: f32,
        max_slope: f32,
    ) -> Self {
        Self {
            min_height: bound_from_sentinel(min_height),
            max_height: bound_from_sentinel(max_height),
            min_slope: bound_from_sentinel(min_slope),
            max_slope: bound_from_sentinel(max_slope),
        }
    }

    pub fn with_height_band(mut self, min: f32, max: f32) -> Self {
        self.min_height = Some(min);
        self.max_height = Some(max);
        self
    }

    pub fn with_slope_band(mut self, min: f32, max: f32) -> Self {
        self.min_slope = Some(min);
        self.max_slope = Some(max);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == Self::UNCONSTRAINED
    }

    /// Names of bands whose minimum exceeds their maximum.
    ///
    /// Such rules are legal but can never accept a sample.
    pub fn inverted_bands(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if let (Some(lo), Some(hi)) = (self.min_height, self.max_height) {
            if lo > hi {
                out.push("height");
            }
        }
        if let (Some(lo), Some(hi)) = (self.min_slope, self.max_slope) {
            if lo > hi {
                out.push("slope");
            }
        }
        out
    }

    /// Rejects NaN bounds.
    pub fn validate(&self) -> Result<()> {
        let bounds = [
            ("min_height", self.min_height),
            ("max_height", self.max_height),
            ("min_slope", self.min_slope),
            ("max_slope", self.max_slope),
        ];
        for (name, bound) in bounds {
            if bound.is_some_and(f32::is_nan) {
                return Err(Error::InvalidConfig(format!("{name} must not be NaN")));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn allows(&self, normalized_height: f32, slope_deg: f32) -> bool {
        satisfies_rules(self, normalized_height, slope_deg)
    }
}

/// Converts a sentinel-encoded bound: negative (or NaN) means unset.
#[inline]
pub fn bound_from_sentinel(value: f32) -> Option<f32> {
    (value >= 0.0).then_some(value)
}

/// Evaluates the four gates of `rules` against one sample.
///
/// Each set bound is inclusive; unset bounds never reject. A NaN feature fails every gate
/// that is set on it.
pub fn satisfies_rules(rules: &PlacementRules, normalized_height: f32, slope_deg: f32) -> bool {
    let at_least = |value: f32, bound: Option<f32>| bound.is_none_or(|b| value >= b);
    let at_most = |value: f32, bound: Option<f32>| bound.is_none_or(|b| value <= b);

    at_least(normalized_height, rules.min_height)
        && at_most(normalized_height, rules.max_height)
        && at_least(slope_deg, rules.min_slope)
        && at_most(slope_deg, rules.max_slope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconstrained_rules_accept_anything() {
        let rules = PlacementRules::UNCONSTRAINED;
        for h in [-1.0, 0.0, 0.5, 1.0, 7.0, f32::NAN] {
            for s in [0.0, 10.0, 90.0, 180.0, f32::NAN] {
                assert!(satisfies_rules(&rules, h, s), "h={h} s={s}");
            }
        }
    }

    #[test]
    fn below_min_height_is_rejected_whatever_the_slope() {
        let rules = PlacementRules {
            min_height: Some(0.75),
            max_slope: Some(10.0),
            ..Default::default()
        };
        for s in [0.0, 5.0, 10.0, 45.0] {
            assert!(!satisfies_rules(&rules, 0.74, s));
        }
        assert!(satisfies_rules(&rules, 0.75, 10.0));
        assert!(satisfies_rules(&rules, 0.8, 5.0));
    }

    #[test]
    fn above_max_slope_is_rejected() {
        let rules = PlacementRules {
            max_slope: Some(35.0),
            ..Default::default()
        };
        assert!(!satisfies_rules(&rules, 0.5, 35.01));
        assert!(satisfies_rules(&rules, 0.5, 35.0));
    }

    #[test]
    fn each_gate_fires_independently() {
        let rules = PlacementRules::default()
            .with_height_band(0.2, 0.6)
            .with_slope_band(5.0, 30.0);
        assert!(rules.allows(0.4, 15.0));
        assert!(!rules.allows(0.1, 15.0));
        assert!(!rules.allows(0.7, 15.0));
        assert!(!rules.allows(0.4, 4.0));
        assert!(!rules.allows(0.4, 31.0));
    }

    #[test]
    fn nan_features_fail_set_gates() {
        let rules = PlacementRules {
            max_height: Some(1.0),
            ..Default::default()
        };
        assert!(!rules.allows(f32::NAN, 0.0));
        assert!(rules.allows(0.5, f32::NAN));
    }

    #[test]
    fn sentinels_map_to_unset() {
        let rules = PlacementRules::from_sentinels(-1.0, 0.55, -1.0, 10.0);
        assert_eq!(rules.min_height, None);
        assert_eq!(rules.max_height, Some(0.55));
        assert_eq!(rules.min_slope, None);
        assert_eq!(rules.max_slope, Some(10.0));
        assert_eq!(bound_from_sentinel(0.0), Some(0.0));
        assert_eq!(bound_from_sentinel(f32::NAN), None);
        assert!(PlacementRules::from_sentinels(-1.0, -1.0, -1.0, -1.0).is_unconstrained());
    }

    #[test]
    fn inverted_bands_are_reported_and_never_accept() {
        let rules = PlacementRules::default().with_height_band(0.8, 0.2);
        assert_eq!(rules.inverted_bands(), vec!["height"]);
        for h in [0.0, 0.2, 0.5, 0.8, 1.0] {
            assert!(!rules.allows(h, 0.0));
        }
    }

    #[test]
    fn validate_rejects_nan_bounds() {
        let rules = PlacementRules {
            min_slope: Some(f32::NAN),
            ..Default::default()
        };
        assert!(matches!(rules.validate(), Err(Error::InvalidConfig(_))));
        assert!(PlacementRules::default().validate().is_ok());
    }
}
