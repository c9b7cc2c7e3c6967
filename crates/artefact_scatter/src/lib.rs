#![forbid(unsafe_code)]
//! artefact_scatter: Constrained placement of typed artefacts on terrain with reachability checks.
//!
//! Modules:
//! - terrain: terrain oracle, surface probing, heightfield adapter and height normalization
//! - navigation: reachability oracle and a walkable grid adapter with A* routing
//! - sampling: candidate generation over the map extent
//! - placement: artefact specs, placement rules, the placement engine, reports and events
//! - catalog: RON artefact catalogs (feature `ron`)
//!
//! For examples, see the `artefact_scatter_examples` crate.
pub mod error;
pub mod navigation;
pub mod placement;
pub mod sampling;
pub mod terrain;

#[cfg(feature = "ron")]
pub mod catalog;

/// Convenient re-exports for common types. Import with `use artefact_scatter::prelude::*;`.
pub mod prelude {
    #[cfg(feature = "ron")]
    pub use crate::catalog::{ArtefactCatalog, ArtefactDef};
    pub use crate::error::{Error, Result};
    pub use crate::navigation::{
        FnReachability, NavGrid, NavGridSettings, PathQuery, ReachabilityOracle,
    };
    pub use crate::placement::cancel::CancelToken;
    pub use crate::placement::events::{
        EventSink, FilterSink, FnSink, MultiSink, PlacementEvent, PlacementEventKind, VecSink,
    };
    pub use crate::placement::report::{
        AttemptStats, Placement, PlacementReport, Rejection, Termination,
    };
    pub use crate::placement::runner::{
        place_all, place_artefact, PlacementConfig, PlacementRunner,
    };
    pub use crate::placement::seed::seed_for_artefact;
    pub use crate::placement::{
        satisfies_rules, ArtefactId, ArtefactSpec, PlacementRules, DEFAULT_ATTEMPT_BUDGET,
    };
    pub use crate::sampling::{CandidateSampling, UniformRandomSampling};
    pub use crate::terrain::{
        FnTerrain, HeightNormalization, HeightRange, Heightfield, SurfaceHit, SurfaceTerrain,
        TerrainOracle, TerrainSample, TerrainSurface,
    };
}
