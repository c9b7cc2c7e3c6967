//! Uniform random candidate sampling.
use mint::Vector2;
use rand::RngCore;

use crate::sampling::{next_down, rand01, CandidateSampling};

/// Uniform i.i.d. sampling over the map rectangle `[0, width) x [0, length)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRandomSampling;

impl UniformRandomSampling {
    pub fn new() -> Self {
        Self
    }
}

impl CandidateSampling for UniformRandomSampling {
    fn sample(&self, map_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vector2<f32> {
        let w = map_extent.x.max(0.0);
        let l = map_extent.y.max(0.0);

        // Two draws per candidate, x first, so seeded runs stay reproducible.
        let u = rand01(rng);
        let v = rand01(rng);

        let x = if w > 0.0 {
            (u * w).clamp(0.0, next_down(w))
        } else {
            0.0
        };
        let y = if l > 0.0 {
            (v * l).clamp(0.0, next_down(l))
        } else {
            0.0
        };

        Vector2 { x, y }
    }
}
