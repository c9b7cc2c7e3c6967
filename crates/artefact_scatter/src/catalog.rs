//! RON-authored artefact catalogs.
//!
//! A catalog lists artefact types as data so new types never need code. Bounds use the
//! legacy convention where a negative number means "unset"; they are converted to
//! [`PlacementRules`] when the catalog is turned into specs.
//!
//! ```ron
//! #![enable(implicit_some)]
//! (
//!     default_target_count: 3,
//!     artefacts: [
//!         (name: "Treasure Chest", asset: "prefabs/chest", min_height: 0.75, max_slope: 10.0),
//!         (name: "Poison Trap", min_slope: 35.0, target_count: 5),
//!     ],
//! )
//! ```
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::placement::{bound_from_sentinel, ArtefactSpec, PlacementRules};

fn default_target_count() -> usize {
    3
}

/// Collection of artefact definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtefactCatalog {
    /// Target count for definitions that do not set their own.
    #[serde(default = "default_target_count")]
    pub default_target_count: usize,
    #[serde(default)]
    pub artefacts: Vec<ArtefactDef>,
}

impl Default for ArtefactCatalog {
    fn default() -> Self {
        Self {
            default_target_count: default_target_count(),
            artefacts: Vec::new(),
        }
    }
}

/// One artefact type as authored in a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtefactDef {
    pub name: String,
    pub asset: Option<String>,
    pub target_count: Option<usize>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub min_slope: Option<f32>,
    pub max_slope: Option<f32>,
}

impl ArtefactDef {
    /// Bounds of this definition; negative values are treated as unset.
    pub fn rules(&self) -> PlacementRules {
        PlacementRules {
            min_height: self.min_height.and_then(bound_from_sentinel),
            max_height: self.max_height.and_then(bound_from_sentinel),
            min_slope: self.min_slope.and_then(bound_from_sentinel),
            max_slope: self.max_slope.and_then(bound_from_sentinel),
        }
    }
}

impl ArtefactCatalog {
    /// Parses a catalog from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Catalog(e.to_string()))
    }

    /// Reads and parses a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let catalog = Self::from_ron_str(&source)
            .map_err(|e| Error::Catalog(format!("{}: {e}", path.display())))?;
        debug!(
            "Loaded artefact catalog '{}' with {} definition(s).",
            path.display(),
            catalog.artefacts.len()
        );
        Ok(catalog)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Catalog(e.to_string()))
    }

    /// Converts every definition into a validated [`ArtefactSpec`], in catalog order.
    pub fn to_specs(&self) -> Result<Vec<ArtefactSpec>> {
        if self.artefacts.is_empty() {
            return Err(Error::Catalog("catalog defines no artefacts".into()));
        }
        self.artefacts
            .iter()
            .map(|def| {
                if def.name.trim().is_empty() {
                    return Err(Error::Catalog("artefact definition without a name".into()));
                }
                let target = def.target_count.unwrap_or(self.default_target_count);
                let mut spec =
                    ArtefactSpec::new(def.name.clone(), target).with_rules(def.rules());
                spec.asset = def.asset.clone();
                spec.validate()?;
                Ok(spec)
            })
            .collect()
    }
}
