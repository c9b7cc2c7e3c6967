//! Regular-grid heightfield surface.
//!
//! Heights are stored row-major as `columns x rows` samples spaced `cell_size` apart in world
//! X and Z, starting at `origin`. Between samples the surface is bilinear. Non-finite samples
//! mark holes: any cell touching one has no surface.
use glam::{Vec2, Vec3};

use crate::error::{Error, Result};
use crate::terrain::{HeightRange, SurfaceHit, TerrainSurface};

#[derive(Clone, Debug)]
pub struct Heightfield {
    origin: Vec2,
    cell_size: f32,
    columns: usize,
    rows: usize,
    heights: Vec<f32>,
}

/// Cell lookup result: lower-left sample index and fractional offsets in the cell.
struct CellCoord {
    ix: usize,
    iz: usize,
    fx: f32,
    fz: f32,
}

impl Heightfield {
    /// Creates a heightfield from row-major samples.
    pub fn new(columns: usize, rows: usize, cell_size: f32, heights: Vec<f32>) -> Result<Self> {
        if columns < 2 || rows < 2 {
            return Err(Error::InvalidConfig(
                "heightfield needs at least 2x2 samples".into(),
            ));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::InvalidConfig(
                "heightfield cell_size must be finite and > 0".into(),
            ));
        }
        if heights.len() != columns * rows {
            return Err(Error::InvalidConfig(format!(
                "heightfield expects {} samples, got {}",
                columns * rows,
                heights.len()
            )));
        }
        Ok(Self {
            origin: Vec2::ZERO,
            cell_size,
            columns,
            rows,
            heights,
        })
    }

    /// Creates a heightfield by evaluating `f(column, row)` for every sample.
    pub fn from_fn(
        columns: usize,
        rows: usize,
        cell_size: f32,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self> {
        let mut heights = Vec::with_capacity(columns * rows);
        for iz in 0..rows {
            for ix in 0..columns {
                heights.push(f(ix, iz));
            }
        }
        Self::new(columns, rows, cell_size, heights)
    }

    /// Moves the world-space position of sample `(0, 0)`.
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// World-space size covered by the samples along X and Z.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            (self.columns - 1) as f32 * self.cell_size,
            (self.rows - 1) as f32 * self.cell_size,
        )
    }

    /// Minimum and maximum over all finite samples, or `0..0` when there are none.
    pub fn height_range(&self) -> HeightRange {
        let (min, max) = self
            .heights
            .iter()
            .copied()
            .filter(|h| h.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| {
                (lo.min(h), hi.max(h))
            });
        if min > max {
            HeightRange::new(0.0, 0.0)
        } else {
            HeightRange::new(min, max)
        }
    }

    /// Raw sample value, `None` outside the grid or for a hole.
    pub fn sample(&self, ix: usize, iz: usize) -> Option<f32> {
        if ix >= self.columns || iz >= self.rows {
            return None;
        }
        let h = self.heights[iz * self.columns + ix];
        h.is_finite().then_some(h)
    }

    /// World position of sample `(ix, iz)`, `None` for holes.
    pub fn sample_position(&self, ix: usize, iz: usize) -> Option<Vec3> {
        let h = self.sample(ix, iz)?;
        let p = self.origin + Vec2::new(ix as f32, iz as f32) * self.cell_size;
        Some(Vec3::new(p.x, h, p.y))
    }

    /// Slope gradient `(dh/dx, dh/dz)` at a sample from central differences.
    ///
    /// Falls back to one-sided differences at the border or next to holes.
    pub fn sample_gradient(&self, ix: usize, iz: usize) -> Option<Vec2> {
        let center = self.sample(ix, iz)?;
        let axis = |lo: Option<f32>, hi: Option<f32>| match (lo, hi) {
            (Some(l), Some(h)) => (h - l) / (2.0 * self.cell_size),
            (Some(l), None) => (center - l) / self.cell_size,
            (None, Some(h)) => (h - center) / self.cell_size,
            (None, None) => 0.0,
        };
        let left = ix.checked_sub(1).and_then(|x| self.sample(x, iz));
        let right = self.sample(ix + 1, iz);
        let down = iz.checked_sub(1).and_then(|z| self.sample(ix, z));
        let up = self.sample(ix, iz + 1);
        Some(Vec2::new(axis(left, right), axis(down, up)))
    }

    fn locate(&self, p: Vec2) -> Option<CellCoord> {
        let local = (p - self.origin) / self.cell_size;
        let max_x = (self.columns - 1) as f32;
        let max_z = (self.rows - 1) as f32;
        if !(local.x >= 0.0 && local.x <= max_x && local.y >= 0.0 && local.y <= max_z) {
            return None;
        }
        // The far edge belongs to the last cell.
        let ix = (local.x.floor() as usize).min(self.columns - 2);
        let iz = (local.y.floor() as usize).min(self.rows - 2);
        Some(CellCoord {
            ix,
            iz,
            fx: local.x - ix as f32,
            fz: local.y - iz as f32,
        })
    }

    fn cell_corners(&self, c: &CellCoord) -> Option<[f32; 4]> {
        Some([
            self.sample(c.ix, c.iz)?,
            self.sample(c.ix + 1, c.iz)?,
            self.sample(c.ix, c.iz + 1)?,
            self.sample(c.ix + 1, c.iz + 1)?,
        ])
    }

    /// Bilinear height at a world XZ position.
    pub fn height_at(&self, p: Vec2) -> Option<f32> {
        let c = self.locate(p)?;
        let [h00, h10, h01, h11] = self.cell_corners(&c)?;
        let bottom = h00 + (h10 - h00) * c.fx;
        let top = h01 + (h11 - h01) * c.fx;
        Some(bottom + (top - bottom) * c.fz)
    }

    /// Gradient `(dh/dx, dh/dz)` of the bilinear surface at a world XZ position.
    pub fn gradient_at(&self, p: Vec2) -> Option<Vec2> {
        let c = self.locate(p)?;
        let [h00, h10, h01, h11] = self.cell_corners(&c)?;
        let dx = ((h10 - h00) * (1.0 - c.fz) + (h11 - h01) * c.fz) / self.cell_size;
        let dz = ((h01 - h00) * (1.0 - c.fx) + (h11 - h10) * c.fx) / self.cell_size;
        Some(Vec2::new(dx, dz))
    }

    /// Unit surface normal at a world XZ position.
    pub fn normal_at(&self, p: Vec2) -> Option<Vec3> {
        let g = self.gradient_at(p)?;
        Some(Vec3::new(-g.x, 1.0, -g.y).normalize())
    }
}

impl TerrainSurface for Heightfield {
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        let p = Vec2::new(origin.x, origin.z);
        let h = self.height_at(p)?;
        let drop = origin.y - h;
        if drop < 0.0 || drop > max_distance {
            return None;
        }
        Some(SurfaceHit {
            point: Vec3::new(origin.x, h, origin.z),
            normal: self.normal_at(p)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::slope_angle_deg;

    fn ramp_x() -> Heightfield {
        // h = x (in world units) on a 5x5 grid with 2-unit cells.
        Heightfield::from_fn(5, 5, 2.0, |ix, _| ix as f32 * 2.0).expect("heightfield")
    }

    #[test]
    fn new_validates_shape_and_cell_size() {
        assert!(Heightfield::new(1, 4, 1.0, vec![0.0; 4]).is_err());
        assert!(Heightfield::new(2, 2, 0.0, vec![0.0; 4]).is_err());
        assert!(Heightfield::new(2, 2, 1.0, vec![0.0; 3]).is_err());
        assert!(Heightfield::new(2, 2, 1.0, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn extent_and_range_reflect_samples() {
        let hf = ramp_x();
        assert_eq!(hf.extent(), Vec2::new(8.0, 8.0));
        assert_eq!(hf.height_range(), HeightRange::new(0.0, 8.0));
    }

    #[test]
    fn bilinear_height_interpolates_between_samples() {
        let hf = Heightfield::new(2, 2, 1.0, vec![0.0, 1.0, 2.0, 3.0]).expect("heightfield");
        assert_eq!(hf.height_at(Vec2::new(0.0, 0.0)), Some(0.0));
        assert_eq!(hf.height_at(Vec2::new(1.0, 1.0)), Some(3.0));
        assert_eq!(hf.height_at(Vec2::new(0.5, 0.5)), Some(1.5));
        assert!(hf.height_at(Vec2::new(1.5, 0.5)).is_none());
        assert!(hf.height_at(Vec2::new(-0.1, 0.5)).is_none());
    }

    #[test]
    fn planar_ramp_has_constant_slope() {
        let hf = ramp_x();
        for p in [Vec2::new(1.0, 1.0), Vec2::new(5.5, 7.9), Vec2::new(8.0, 8.0)] {
            let n = hf.normal_at(p).expect("normal");
            assert!((slope_angle_deg(n) - 45.0).abs() < 1e-3);
        }
        let g = hf.sample_gradient(0, 0).expect("gradient");
        assert!((g.x - 1.0).abs() < 1e-6 && g.y.abs() < 1e-6);
    }

    #[test]
    fn holes_block_adjacent_cells() {
        let mut heights = vec![1.0; 9];
        heights[4] = f32::NAN;
        let hf = Heightfield::new(3, 3, 1.0, heights).expect("heightfield");
        assert!(hf.height_at(Vec2::new(0.5, 0.5)).is_none());
        assert!(hf.sample(1, 1).is_none());
        assert_eq!(hf.sample(0, 0), Some(1.0));
        assert_eq!(hf.height_range(), HeightRange::new(1.0, 1.0));
    }

    #[test]
    fn raycast_respects_probe_origin_and_length() {
        let hf = ramp_x().with_origin(Vec2::new(10.0, 10.0));
        let hit = hf
            .raycast_down(Vec3::new(14.0, 50.0, 12.0), 60.0)
            .expect("hit");
        assert_eq!(hit.point, Vec3::new(14.0, 4.0, 12.0));
        assert!(hf.raycast_down(Vec3::new(14.0, 2.0, 12.0), 60.0).is_none());
        assert!(hf.raycast_down(Vec3::new(14.0, 50.0, 12.0), 10.0).is_none());
        assert!(hf.raycast_down(Vec3::new(4.0, 50.0, 12.0), 60.0).is_none());
    }
}
