//! Terrain evaluation for candidate positions.
//!
//! The placement engine only sees [`TerrainOracle`]: given a map coordinate it either misses
//! or returns a [`TerrainSample`] with the snapped point, normalized height and slope. The
//! [`SurfaceTerrain`] adapter builds an oracle from any [`TerrainSurface`] that can answer a
//! downward raycast, and [`Heightfield`] is a grid surface that does so.
use glam::{Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod heightfield;
pub mod surface;

pub use heightfield::Heightfield;
pub use surface::{
    SurfaceHit, SurfaceTerrain, TerrainSurface, DEFAULT_PROBE_DISTANCE, DEFAULT_PROBE_HEIGHT,
};

/// Terrain properties at a probed point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainSample {
    /// World-space point on the terrain surface.
    pub point: Vec3,
    /// Height rescaled from the terrain's declared range.
    pub normalized_height: f32,
    /// Angle between the surface normal and +Y, in degrees.
    pub slope_deg: f32,
}

impl TerrainSample {
    pub fn new(point: Vec3, normalized_height: f32, slope_deg: f32) -> Self {
        Self {
            point,
            normalized_height,
            slope_deg,
        }
    }
}

/// Answers terrain queries for map coordinates.
///
/// Implementations must be deterministic for a fixed terrain and point. `None` means the
/// probe found no terrain (outside the surface or over a hole).
pub trait TerrainOracle {
    fn evaluate(&self, point: Vec2) -> Option<TerrainSample>;
}

impl<T: TerrainOracle + ?Sized> TerrainOracle for &T {
    #[inline]
    fn evaluate(&self, point: Vec2) -> Option<TerrainSample> {
        (**self).evaluate(point)
    }
}

/// A terrain oracle backed by a closure, mostly useful for stubs.
pub struct FnTerrain<F>
where
    F: Fn(Vec2) -> Option<TerrainSample>,
{
    f: F,
}

impl<F> FnTerrain<F>
where
    F: Fn(Vec2) -> Option<TerrainSample>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> TerrainOracle for FnTerrain<F>
where
    F: Fn(Vec2) -> Option<TerrainSample>,
{
    #[inline]
    fn evaluate(&self, point: Vec2) -> Option<TerrainSample> {
        (self.f)(point)
    }
}

/// What to do with raw heights outside the declared [`HeightRange`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeightNormalization {
    /// Clamp normalized height to `[0, 1]`.
    #[default]
    Clamp,
    /// Keep the linear mapping outside `[0, 1]`.
    Extrapolate,
}

/// Declared minimum and maximum raw terrain height.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightRange {
    pub min: f32,
    pub max: f32,
}

impl HeightRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Rescales a raw height to the range, `(raw - min) / (max - min)`.
    ///
    /// A degenerate range maps every height to `0.0`.
    pub fn normalize(&self, raw: f32, mode: HeightNormalization) -> f32 {
        let span = self.span();
        if span == 0.0 || !span.is_finite() {
            return 0.0;
        }
        let t = (raw - self.min) / span;
        match mode {
            HeightNormalization::Clamp => t.clamp(0.0, 1.0),
            HeightNormalization::Extrapolate => t,
        }
    }
}

/// Angle between `normal` and the global up vector, in degrees within `[0, 180]`.
///
/// A zero normal yields `0.0`.
#[inline]
pub fn slope_angle_deg(normal: Vec3) -> f32 {
    let horizontal = Vec2::new(normal.x, normal.z).length();
    horizontal.atan2(normal.y).to_degrees()
}
