//! Reachability queries between world points.
//!
//! The placement engine asks a [`ReachabilityOracle`] whether each accepted candidate can be
//! reached from the reference point. [`NavGrid`] is a grid navigation graph derived from a
//! [`crate::terrain::Heightfield`] that answers those queries with A*.
use glam::Vec3;

pub mod grid;

pub use grid::{NavGrid, NavGridSettings, DEFAULT_SNAP_RADIUS};

/// Outcome of a reachability query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathQuery {
    /// Whether a complete route exists between the snapped endpoints.
    pub reachable: bool,
    /// Route corners from start to end; empty when unreachable.
    pub corners: Vec<Vec3>,
}

impl PathQuery {
    pub fn complete(corners: Vec<Vec3>) -> Self {
        Self {
            reachable: true,
            corners,
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }
}

/// Answers whether a traversable route connects two world points.
///
/// Called once per candidate that passes the terrain rules, so implementations should expect
/// thousands of calls per run.
pub trait ReachabilityOracle {
    fn query(&self, from: Vec3, to: Vec3) -> PathQuery;
}

impl<T: ReachabilityOracle + ?Sized> ReachabilityOracle for &T {
    #[inline]
    fn query(&self, from: Vec3, to: Vec3) -> PathQuery {
        (**self).query(from, to)
    }
}

/// A reachability oracle backed by a closure.
pub struct FnReachability<F>
where
    F: Fn(Vec3, Vec3) -> PathQuery,
{
    f: F,
}

impl<F> FnReachability<F>
where
    F: Fn(Vec3, Vec3) -> PathQuery,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ReachabilityOracle for FnReachability<F>
where
    F: Fn(Vec3, Vec3) -> PathQuery,
{
    #[inline]
    fn query(&self, from: Vec3, to: Vec3) -> PathQuery {
        (self.f)(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_query_has_no_corners() {
        let q = PathQuery::unreachable();
        assert!(!q.reachable);
        assert!(q.corners.is_empty());
    }

    #[test]
    fn fn_reachability_forwards_endpoints() {
        let oracle = FnReachability::new(|from, to| PathQuery::complete(vec![from, to]));
        let q = oracle.query(Vec3::ZERO, Vec3::ONE);
        assert!(q.reachable);
        assert_eq!(q.corners, vec![Vec3::ZERO, Vec3::ONE]);
    }
}
