//! Raycast-based terrain oracle.
use glam::{Vec2, Vec3};

use crate::terrain::{
    slope_angle_deg, HeightNormalization, HeightRange, TerrainOracle, TerrainSample,
};

/// Height of the probe origin above the map plane.
pub const DEFAULT_PROBE_HEIGHT: f32 = 50.0;
/// Maximum downward ray length from the probe origin.
pub const DEFAULT_PROBE_DISTANCE: f32 = 60.0;

/// Point and normal where a ray met the terrain surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
}

/// A surface that can be probed with a vertical ray cast straight down.
pub trait TerrainSurface {
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit>;
}

impl<S: TerrainSurface + ?Sized> TerrainSurface for &S {
    #[inline]
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        (**self).raycast_down(origin, max_distance)
    }
}

/// Turns a [`TerrainSurface`] into a [`TerrainOracle`].
///
/// Map coordinate `(x, y)` is probed from world `(x, probe_height, y)`. The hit height is
/// normalized against `height_range` and the hit normal becomes the slope angle.
#[derive(Debug, Clone)]
pub struct SurfaceTerrain<S> {
    surface: S,
    height_range: HeightRange,
    normalization: HeightNormalization,
    probe_height: f32,
    probe_distance: f32,
}

impl<S: TerrainSurface> SurfaceTerrain<S> {
    pub fn new(surface: S, height_range: HeightRange) -> Self {
        Self {
            surface,
            height_range,
            normalization: HeightNormalization::default(),
            probe_height: DEFAULT_PROBE_HEIGHT,
            probe_distance: DEFAULT_PROBE_DISTANCE,
        }
    }

    /// Sets how raw heights outside the declared range are normalized.
    pub fn with_normalization(mut self, normalization: HeightNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Sets the probe origin height and the maximum ray length.
    pub fn with_probe(mut self, probe_height: f32, probe_distance: f32) -> Self {
        self.probe_height = probe_height;
        self.probe_distance = probe_distance;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn height_range(&self) -> HeightRange {
        self.height_range
    }
}

impl<S: TerrainSurface> TerrainOracle for SurfaceTerrain<S> {
    fn evaluate(&self, point: Vec2) -> Option<TerrainSample> {
        let origin = Vec3::new(point.x, self.probe_height, point.y);
        let hit = self.surface.raycast_down(origin, self.probe_distance)?;
        Some(TerrainSample {
            point: hit.point,
            normalized_height: self.height_range.normalize(hit.point.y, self.normalization),
            slope_deg: slope_angle_deg(hit.normal),
        })
    }
}
