use artefact_scatter::prelude::*;
use artefact_scatter_examples::{
    catalog_path, init_tracing, island_heightfield, log_reports, SEA_LEVEL,
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog = ArtefactCatalog::load(catalog_path())?;
    let specs = catalog.to_specs()?;

    let heightfield = island_heightfield(129, 1.0, 7)?;
    let terrain = SurfaceTerrain::new(&heightfield, heightfield.height_range());
    let nav = NavGrid::from_heightfield(
        &heightfield,
        NavGridSettings::default()
            .with_max_slope_deg(40.0)
            .with_min_walkable_height(SEA_LEVEL + 0.5),
    );

    let centre = heightfield.columns() / 2;
    let spawn = heightfield
        .sample_position(centre, centre)
        .ok_or_else(|| anyhow::anyhow!("island centre has no terrain"))?;

    let config = PlacementConfig::new(heightfield.extent()).with_reference_point(spawn);
    let runner = PlacementRunner::new(config)
        .with_terrain(&terrain)
        .with_reachability(&nav);

    let reports = runner.run_seeded(&specs, 42)?;
    log_reports(&reports);

    let placed: usize = reports.iter().map(|r| r.placed_count).sum();
    let wanted: usize = reports.iter().map(|r| r.target_count).sum();
    println!("placed {placed} of {wanted} artefacts");
    Ok(())
}
