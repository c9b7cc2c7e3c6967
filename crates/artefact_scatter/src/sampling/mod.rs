//! Candidate sampling for the placement search.
//!
//! A [`CandidateSampling`] strategy proposes one raw map coordinate per attempt. The
//! placement engine draws candidates one at a time, so every attempt is independent of
//! the previous ones.
use mint::Vector2;
use rand::RngCore;

pub mod uniform_random;

pub use uniform_random::UniformRandomSampling;

/// Trait for per-attempt candidate sampling over a map of the given extent.
///
/// Implementations return a coordinate in `[0, extent.x) x [0, extent.y)`.
pub trait CandidateSampling: Send + Sync {
    fn sample(&self, map_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vector2<f32>;
}

/// Uniform float in `[0, 1]` from one `u32` draw.
///
/// `u32::MAX` rounds up to exactly `1.0` in `f32`, so callers that need a half-open range
/// clamp with [`next_down`].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Largest representable `f32` strictly below `val`.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() || val == f32::NEG_INFINITY {
        val
    } else if val == f32::INFINITY {
        f32::MAX
    } else if val == 0.0 {
        -f32::from_bits(1)
    } else if val > 0.0 {
        f32::from_bits(val.to_bits() - 1)
    } else {
        f32::from_bits(val.to_bits() + 1)
    }
}
