use std::time::Duration;

use artefact_scatter::prelude::*;
use artefact_scatter_examples::{
    catalog_path, init_tracing, island_heightfield, log_reports, SEA_LEVEL,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const INITIAL_BUDGET: usize = 25;
const MAX_BUDGET: usize = 1_600;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let specs = ArtefactCatalog::load(catalog_path())?.to_specs()?;

    let heightfield = island_heightfield(97, 1.5, 11)?;
    let terrain = SurfaceTerrain::new(&heightfield, heightfield.height_range());
    let nav = NavGrid::from_heightfield(
        &heightfield,
        NavGridSettings::default()
            .with_max_step(1.5)
            .with_min_walkable_height(SEA_LEVEL + 0.5),
    );

    let centre = heightfield.columns() / 2;
    let spawn = heightfield
        .sample_position(centre, centre)
        .ok_or_else(|| anyhow::anyhow!("island centre has no terrain"))?;

    let base = PlacementConfig::new(heightfield.extent())
        .with_reference_point(spawn)
        .with_paths(false)
        .with_spec_time_limit(Duration::from_millis(500));

    // First pass with a tight budget; only rejections and warnings are collected.
    let mut sink = FilterSink::new(
        VecSink::new(),
        [PlacementEventKind::CandidateRejected, PlacementEventKind::Warning],
    );
    let mut rng = StdRng::seed_from_u64(3);
    let first = place_all(
        &specs,
        &base.clone().with_attempt_budget(INITIAL_BUDGET),
        &terrain,
        &nav,
        &mut rng,
        Some(&mut sink),
    )?;
    let events = sink.into_inner();
    println!(
        "first pass: {} rejected candidates, {} warnings",
        events.count(PlacementEventKind::CandidateRejected),
        events.count(PlacementEventKind::Warning),
    );
    log_reports(&first);

    // Retry each under-placed type alone, doubling its budget each round.
    let mut finals = Vec::with_capacity(first.len());
    for (spec, report) in specs.iter().zip(first) {
        let mut report = report;
        let mut budget = INITIAL_BUDGET;
        while report.is_under_placed() && budget < MAX_BUDGET {
            budget *= 2;
            let config = base.clone().with_attempt_budget(budget);
            report = place_artefact(spec, &config, &terrain, &nav, &mut rng)?;
        }
        if report.is_under_placed() {
            println!(
                "'{}' still short by {} at budget {budget}",
                report.artefact_id,
                report.shortfall()
            );
        }
        finals.push(report);
    }
    log_reports(&finals);
    Ok(())
}
