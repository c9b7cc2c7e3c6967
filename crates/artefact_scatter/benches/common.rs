#![allow(dead_code)]

use std::time::Duration;

use artefact_scatter::prelude::{Heightfield, NavGrid, NavGridSettings};
use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Rolling hills with a flooded ring near the border.
pub fn hills(samples: usize, cell_size: f32) -> Heightfield {
    let last = (samples - 1) as f32;
    Heightfield::from_fn(samples, samples, cell_size, |ix, iz| {
        let u = ix as f32 / last;
        let v = iz as f32 / last;
        let ridge = (u * 9.0).sin() * (v * 7.0).cos();
        let rim = (u.min(1.0 - u).min(v).min(1.0 - v) * 10.0).min(1.0);
        rim * (12.0 + 8.0 * ridge)
    })
    .expect("valid heightfield")
}

pub fn nav_grid(heightfield: &Heightfield) -> NavGrid {
    NavGrid::from_heightfield(
        heightfield,
        NavGridSettings::default().with_min_walkable_height(1.0),
    )
}
