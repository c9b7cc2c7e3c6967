mod common;

use std::hint::black_box;

use artefact_scatter::prelude::{
    place_all, ArtefactSpec, FnReachability, PathQuery, PlacementConfig, SurfaceTerrain,
};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn specs() -> Vec<ArtefactSpec> {
    vec![
        ArtefactSpec::new("Health Potion", 8)
            .with_min_height(0.35)
            .with_max_height(0.55),
        ArtefactSpec::new("Treasure Chest", 4)
            .with_min_height(0.75)
            .with_max_slope(10.0),
        ArtefactSpec::new("Poison Trap", 6).with_min_slope(35.0),
        ArtefactSpec::new("Weapon (Sword)", 12).with_min_height(0.2),
    ]
}

fn bench_rules_only(c: &mut Criterion) {
    let heightfield = common::hills(257, 1.0);
    let terrain = SurfaceTerrain::new(&heightfield, heightfield.height_range());
    let reach = FnReachability::new(|from, to| PathQuery::complete(vec![from, to]));
    let specs = specs();
    let total: usize = specs.iter().map(|s| s.target_count).sum();

    let mut group = c.benchmark_group("placement_rules_only");
    group.throughput(common::elements_throughput(total));
    for budget in [100usize, 1_000] {
        let config = PlacementConfig::new(heightfield.extent())
            .with_reference_point(Vec3::new(128.0, 20.0, 128.0))
            .with_attempt_budget(budget);
        group.bench_function(format!("budget_{budget}"), |b| {
            b.iter_batched(
                || StdRng::seed_from_u64(0xA57EFAC7),
                |mut rng| {
                    let reports =
                        place_all(&specs, &config, &terrain, &reach, &mut rng, None).expect("run");
                    black_box(reports)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_with_navigation(c: &mut Criterion) {
    let heightfield = common::hills(129, 1.0);
    let terrain = SurfaceTerrain::new(&heightfield, heightfield.height_range());
    let nav = common::nav_grid(&heightfield);
    let spawn = heightfield
        .sample_position(64, 64)
        .expect("centre sample");
    let specs = specs();
    let config = PlacementConfig::new(heightfield.extent()).with_reference_point(spawn);

    let mut group = c.benchmark_group("placement_with_navigation");
    group.sample_size(10);
    group.bench_function("hills_129", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(7),
            |mut rng| {
                let reports =
                    place_all(&specs, &config, &terrain, &nav, &mut rng, None).expect("run");
                black_box(reports)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = bench_rules_only, bench_with_navigation
}
criterion_main!(benches);
