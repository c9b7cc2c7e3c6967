#![forbid(unsafe_code)]

use std::path::PathBuf;

use artefact_scatter::prelude::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Raw height of the sea floor; the island rises from here.
pub const SEA_LEVEL: f32 = 2.0;
/// Raw height of the highest island peak.
pub const PEAK_HEIGHT: f32 = 30.0;

/// Installs a formatting subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Path of the bundled catalog with the six classic artefact types.
pub fn catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/artefacts.ron")
}

/// Generates a hilly island: value noise over a coarse lattice with a radial falloff
/// towards the shore.
pub fn island_heightfield(samples: usize, cell_size: f32, seed: u64) -> Result<Heightfield> {
    const LATTICE: usize = 9;

    let mut rng = StdRng::seed_from_u64(seed);
    let lattice: Vec<f32> = (0..LATTICE * LATTICE)
        .map(|_| (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32)
        .collect();
    let at = |x: usize, z: usize| lattice[z.min(LATTICE - 1) * LATTICE + x.min(LATTICE - 1)];
    let smooth = |t: f32| t * t * (3.0 - 2.0 * t);

    let last = (samples.max(2) - 1) as f32;
    Heightfield::from_fn(samples, samples, cell_size, |ix, iz| {
        let u = ix as f32 / last;
        let v = iz as f32 / last;

        let gx = u * (LATTICE - 1) as f32;
        let gz = v * (LATTICE - 1) as f32;
        let (x0, z0) = (gx.floor() as usize, gz.floor() as usize);
        let (tx, tz) = (smooth(gx.fract()), smooth(gz.fract()));
        let top = at(x0, z0) + (at(x0 + 1, z0) - at(x0, z0)) * tx;
        let bottom = at(x0, z0 + 1) + (at(x0 + 1, z0 + 1) - at(x0, z0 + 1)) * tx;
        let noise = top + (bottom - top) * tz;

        let from_centre = Vec2::new(u - 0.5, v - 0.5).length() * 2.0;
        let falloff = (1.0 - from_centre * from_centre).clamp(0.0, 1.0);

        SEA_LEVEL + (PEAK_HEIGHT - SEA_LEVEL) * falloff * (0.35 + 0.65 * noise)
    })
}

/// Logs one line per report, plus the placements of complete ones at debug level.
pub fn log_reports(reports: &[PlacementReport]) {
    for report in reports {
        info!(
            "{:<20} {}/{} placed | {} attempts | misses {} | rules {} | unreachable {} | {:?}",
            report.artefact_id,
            report.placed_count,
            report.target_count,
            report.attempt_count,
            report.stats.probe_misses,
            report.stats.rule_rejections,
            report.stats.unreachable,
            report.termination,
        );
        for placement in &report.placements {
            let corners = placement.path.as_ref().map_or(0, Vec::len);
            debug!(
                "  at ({:.1}, {:.1}, {:.1}) via {} corner(s)",
                placement.position.x,
                placement.position.y,
                placement.position.z,
                corners
            );
        }
    }
}
