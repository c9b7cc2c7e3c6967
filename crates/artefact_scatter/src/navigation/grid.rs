//! Grid navigation graph built from a heightfield.
//!
//! Every heightfield sample is a node. A node is walkable when it is not a hole, its slope is
//! within [`NavGridSettings::max_slope_deg`] and it is not below the water line. Walkable
//! nodes connect to their 8 neighbours when the height step between them is small enough;
//! diagonal moves may not cut past a blocked orthogonal neighbour.
//!
//! Queries snap both endpoints to the nearest walkable node within the snap radius, run A*
//! over the graph and return the node path collapsed to its corners.
use glam::{Vec2, Vec3};
use pathfinding::directed::astar::astar;

use crate::navigation::{PathQuery, ReachabilityOracle};
use crate::terrain::{slope_angle_deg, Heightfield};

/// Default radius for snapping query endpoints onto the graph.
pub const DEFAULT_SNAP_RADIUS: f32 = 5.0;

/// Edge costs are world distances in thousandths, rounded up.
const COST_SCALE: f32 = 1000.0;

const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Walkability and snapping parameters for [`NavGrid`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavGridSettings {
    /// Steepest walkable slope in degrees.
    pub max_slope_deg: f32,
    /// Largest height difference between connected neighbours, if limited.
    pub max_step: Option<f32>,
    /// Raw height below which nodes are treated as water.
    pub min_walkable_height: Option<f32>,
    /// Search radius for snapping query endpoints onto walkable nodes.
    pub snap_radius: f32,
}

impl Default for NavGridSettings {
    fn default() -> Self {
        Self {
            max_slope_deg: 45.0,
            max_step: None,
            min_walkable_height: None,
            snap_radius: DEFAULT_SNAP_RADIUS,
        }
    }
}

impl NavGridSettings {
    /// Sets the steepest walkable slope in degrees.
    pub fn with_max_slope_deg(mut self, max_slope_deg: f32) -> Self {
        self.max_slope_deg = max_slope_deg;
        self
    }

    /// Sets the largest height step between connected neighbours.
    pub fn with_max_step(mut self, max_step: f32) -> Self {
        self.max_step = Some(max_step);
        self
    }

    /// Sets the water line below which nodes are not walkable.
    pub fn with_min_walkable_height(mut self, height: f32) -> Self {
        self.min_walkable_height = Some(height);
        self
    }

    /// Sets the endpoint snapping radius.
    pub fn with_snap_radius(mut self, snap_radius: f32) -> Self {
        self.snap_radius = snap_radius;
        self
    }
}

/// Navigation graph over heightfield samples.
#[derive(Clone, Debug)]
pub struct NavGrid {
    origin: Vec2,
    cell_size: f32,
    columns: usize,
    rows: usize,
    /// World position per node; holes keep `Vec3::NAN`.
    positions: Vec<Vec3>,
    walkable: Vec<bool>,
    settings: NavGridSettings,
}

impl NavGrid {
    pub fn from_heightfield(heightfield: &Heightfield, settings: NavGridSettings) -> Self {
        let columns = heightfield.columns();
        let rows = heightfield.rows();
        let mut positions = Vec::with_capacity(columns * rows);
        let mut walkable = Vec::with_capacity(columns * rows);

        for iz in 0..rows {
            for ix in 0..columns {
                let node = heightfield
                    .sample_position(ix, iz)
                    .zip(heightfield.sample_gradient(ix, iz));
                match node {
                    Some((pos, gradient)) => {
                        let slope = slope_angle_deg(Vec3::new(-gradient.x, 1.0, -gradient.y));
                        let above_water = settings
                            .min_walkable_height
                            .is_none_or(|water| pos.y >= water);
                        positions.push(pos);
                        walkable.push(slope <= settings.max_slope_deg && above_water);
                    }
                    None => {
                        positions.push(Vec3::NAN);
                        walkable.push(false);
                    }
                }
            }
        }

        Self {
            origin: heightfield.origin(),
            cell_size: heightfield.cell_size(),
            columns,
            rows,
            positions,
            walkable,
            settings,
        }
    }

    pub fn settings(&self) -> &NavGridSettings {
        &self.settings
    }

    /// Number of walkable nodes.
    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }

    pub fn is_walkable(&self, ix: usize, iz: usize) -> bool {
        ix < self.columns && iz < self.rows && self.walkable[self.index(ix, iz)]
    }

    #[inline]
    fn index(&self, ix: usize, iz: usize) -> usize {
        iz * self.columns + ix
    }

    #[inline]
    fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.columns, index / self.columns)
    }

    fn offset(&self, index: usize, dx: isize, dz: isize) -> Option<usize> {
        let (ix, iz) = self.coords(index);
        let nx = ix.checked_add_signed(dx).filter(|x| *x < self.columns)?;
        let nz = iz.checked_add_signed(dz).filter(|z| *z < self.rows)?;
        Some(self.index(nx, nz))
    }

    /// Nearest walkable node to `p` within the snap radius, by 3D distance.
    pub fn snap(&self, p: Vec3) -> Option<usize> {
        let r = self.settings.snap_radius;
        if r.is_nan() || r < 0.0 || !p.is_finite() {
            return None;
        }
        let lo = (Vec2::new(p.x, p.z) - r - self.origin) / self.cell_size;
        let hi = (Vec2::new(p.x, p.z) + r - self.origin) / self.cell_size;
        if hi.x < 0.0 || hi.y < 0.0 {
            return None;
        }
        let x0 = lo.x.ceil().max(0.0) as usize;
        let z0 = lo.y.ceil().max(0.0) as usize;
        let x1 = (hi.x.floor() as usize).min(self.columns - 1);
        let z1 = (hi.y.floor() as usize).min(self.rows - 1);

        let mut best: Option<(usize, f32)> = None;
        for iz in z0..=z1 {
            for ix in x0..=x1 {
                let idx = self.index(ix, iz);
                if !self.walkable[idx] {
                    continue;
                }
                let d = self.positions[idx].distance(p);
                if d <= r && best.is_none_or(|(_, bd)| d < bd) {
                    best = Some((idx, d));
                }
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn successors(&self, index: usize) -> Vec<(usize, u32)> {
        let here = self.positions[index];
        NEIGHBORS_8
            .iter()
            .filter_map(|&(dx, dz)| {
                let next = self.offset(index, dx, dz)?;
                if !self.walkable[next] {
                    return None;
                }
                if dx != 0 && dz != 0 {
                    let side_x = self.offset(index, dx, 0)?;
                    let side_z = self.offset(index, 0, dz)?;
                    if !self.walkable[side_x] || !self.walkable[side_z] {
                        return None;
                    }
                }
                let there = self.positions[next];
                if let Some(max_step) = self.settings.max_step {
                    if (there.y - here.y).abs() > max_step {
                        return None;
                    }
                }
                let cost = (here.distance(there) * COST_SCALE).ceil() as u32;
                Some((next, cost.max(1)))
            })
            .collect()
    }

    fn heuristic(&self, index: usize, goal: usize) -> u32 {
        (self.positions[index].distance(self.positions[goal]) * COST_SCALE).floor() as u32
    }

    /// Keeps the endpoints and every node where the step direction changes.
    fn corners(&self, path: &[usize]) -> Vec<Vec3> {
        let step = |a: usize, b: usize| {
            let (ax, az) = self.coords(a);
            let (bx, bz) = self.coords(b);
            (bx as isize - ax as isize, bz as isize - az as isize)
        };
        let mut out = Vec::with_capacity(path.len().min(8));
        for (i, &node) in path.iter().enumerate() {
            let keep = i == 0
                || i + 1 == path.len()
                || step(path[i - 1], node) != step(node, path[i + 1]);
            if keep {
                out.push(self.positions[node]);
            }
        }
        out
    }
}

impl ReachabilityOracle for NavGrid {
    fn query(&self, from: Vec3, to: Vec3) -> PathQuery {
        let (Some(start), Some(goal)) = (self.snap(from), self.snap(to)) else {
            return PathQuery::unreachable();
        };

        let result = astar(
            &start,
            |&n| self.successors(n),
            |&n| self.heuristic(n, goal),
            |&n| n == goal,
        );

        match result {
            Some((path, _cost)) => PathQuery::complete(self.corners(&path)),
            None => PathQuery::unreachable(),
        }
    }
}
