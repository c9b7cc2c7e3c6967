//! Placement engine: runs the constrained search for each artefact spec.
//!
//! Specs are processed one after another in input order. Each gets a fresh attempt counter
//! bounded by [`PlacementConfig::attempt_budget`]; a spec that runs out of attempts simply
//! reports fewer placements than requested.
use std::collections::HashSet;
use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use mint::Vector2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::navigation::ReachabilityOracle;
use crate::placement::cancel::CancelToken;
use crate::placement::events::{EventSink, PlacementEvent, PlacementEventKind};
use crate::placement::report::{Placement, PlacementReport, Rejection, Termination};
use crate::placement::seed::seed_for_artefact;
use crate::placement::{satisfies_rules, ArtefactId, ArtefactSpec, DEFAULT_ATTEMPT_BUDGET};
use crate::sampling::{CandidateSampling, UniformRandomSampling};
use crate::terrain::TerrainOracle;

/// Configuration for a placement run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Map size along world X and Z; candidates fall in `[0, x) x [0, y)`.
    pub map_extent: Vec2,
    /// Start point every placement must be reachable from.
    pub reference_point: Option<Vec3>,
    /// Maximum attempts per artefact spec.
    pub attempt_budget: usize,
    /// Keep the validating route on each placement.
    pub produce_paths: bool,
    /// Optional wall-clock ceiling per artefact spec.
    pub spec_time_limit: Option<Duration>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            map_extent: Vec2::ZERO,
            reference_point: None,
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
            produce_paths: true,
            spec_time_limit: None,
        }
    }
}

impl PlacementConfig {
    /// Creates a new [`PlacementConfig`] for a map of the given extent.
    pub fn new(map_extent: Vec2) -> Self {
        Self {
            map_extent,
            ..Default::default()
        }
    }

    /// Sets the point every placement must be reachable from.
    pub fn with_reference_point(mut self, reference_point: Vec3) -> Self {
        self.reference_point = Some(reference_point);
        self
    }

    /// Sets the maximum attempts per artefact spec.
    pub fn with_attempt_budget(mut self, attempt_budget: usize) -> Self {
        self.attempt_budget = attempt_budget;
        self
    }

    /// Sets whether placements keep the corners of their validating route.
    pub fn with_paths(mut self, produce_paths: bool) -> Self {
        self.produce_paths = produce_paths;
        self
    }

    /// Sets the wall-clock ceiling per artefact spec.
    pub fn with_spec_time_limit(mut self, limit: Duration) -> Self {
        self.spec_time_limit = Some(limit);
        self
    }

    /// Validates the configuration, returning an error if a run cannot start.
    pub fn validate(&self) -> Result<()> {
        if !(self.map_extent.x > 0.0 && self.map_extent.y > 0.0) || !self.map_extent.is_finite() {
            return Err(Error::InvalidConfig(
                "map_extent must be finite and > 0 in both components".into(),
            ));
        }
        match self.reference_point {
            None => Err(Error::MissingCollaborator {
                what: "reference point",
            }),
            Some(p) if !p.is_finite() => Err(Error::InvalidConfig(
                "reference_point must be finite".into(),
            )),
            Some(_) => Ok(()),
        }
    }
}

/// Builder-style entry point that holds the collaborators for repeated runs.
///
/// Missing collaborators are reported when a run starts, before any candidate is sampled.
pub struct PlacementRunner<'a> {
    /// Run configuration applied to this runner.
    pub config: PlacementConfig,
    terrain: Option<&'a dyn TerrainOracle>,
    reachability: Option<&'a dyn ReachabilityOracle>,
    sampling: Box<dyn CandidateSampling>,
    cancel: Option<CancelToken>,
}

impl<'a> PlacementRunner<'a> {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            terrain: None,
            reachability: None,
            sampling: Box::new(UniformRandomSampling),
            cancel: None,
        }
    }

    /// Sets the terrain oracle.
    pub fn with_terrain(mut self, terrain: &'a dyn TerrainOracle) -> Self {
        self.terrain = Some(terrain);
        self
    }

    /// Sets the reachability oracle.
    pub fn with_reachability(mut self, reachability: &'a dyn ReachabilityOracle) -> Self {
        self.reachability = Some(reachability);
        self
    }

    /// Replaces the default uniform candidate sampling.
    pub fn with_sampling<S: CandidateSampling + 'static>(mut self, sampling: S) -> Self {
        self.sampling = Box::new(sampling);
        self
    }

    /// Sets the token checked once per attempt.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    /// Runs all specs with one shared RNG.
    pub fn run(
        &self,
        specs: &[ArtefactSpec],
        rng: &mut impl RngCore,
    ) -> Result<Vec<PlacementReport>> {
        let ctx = self.context(specs)?;
        Ok(run_specs(specs, &ctx, RngSource::Shared(rng), &mut ()))
    }

    pub fn run_with_events(
        &self,
        specs: &[ArtefactSpec],
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<PlacementReport>> {
        let ctx = self.context(specs)?;
        Ok(run_specs(specs, &ctx, RngSource::Shared(rng), sink))
    }

    /// Runs all specs, each with its own RNG seeded from `base_seed` and its index.
    ///
    /// A spec's report then depends only on its own index, not on the specs before it.
    pub fn run_seeded(
        &self,
        specs: &[ArtefactSpec],
        base_seed: u64,
    ) -> Result<Vec<PlacementReport>> {
        let ctx = self.context(specs)?;
        Ok(run_specs(specs, &ctx, RngSource::PerArtefact(base_seed), &mut ()))
    }

    pub fn run_seeded_with_events(
        &self,
        specs: &[ArtefactSpec],
        base_seed: u64,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<PlacementReport>> {
        let ctx = self.context(specs)?;
        Ok(run_specs(specs, &ctx, RngSource::PerArtefact(base_seed), sink))
    }

    fn context(&self, specs: &[ArtefactSpec]) -> Result<EngineContext<'_>> {
        let terrain = self.terrain.ok_or(Error::MissingCollaborator {
            what: "terrain oracle",
        })?;
        let reachability = self.reachability.ok_or(Error::MissingCollaborator {
            what: "reachability oracle",
        })?;
        EngineContext::prepare(
            &self.config,
            terrain,
            reachability,
            self.sampling.as_ref(),
            self.cancel.as_ref(),
            specs,
        )
    }
}

/// Places every spec in order and returns one report per spec.
///
/// Fails before sampling anything if the configuration or a spec is invalid.
pub fn place_all<R: RngCore>(
    specs: &[ArtefactSpec],
    config: &PlacementConfig,
    terrain: &dyn TerrainOracle,
    reachability: &dyn ReachabilityOracle,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<Vec<PlacementReport>> {
    let sampling = UniformRandomSampling;
    let ctx = EngineContext::prepare(config, terrain, reachability, &sampling, None, specs)?;
    let reports = match sink {
        Some(s) => run_specs(specs, &ctx, RngSource::Shared(rng), s),
        None => run_specs(specs, &ctx, RngSource::Shared(rng), &mut ()),
    };
    Ok(reports)
}

/// Runs the search for a single spec.
pub fn place_artefact<R: RngCore>(
    spec: &ArtefactSpec,
    config: &PlacementConfig,
    terrain: &dyn TerrainOracle,
    reachability: &dyn ReachabilityOracle,
    rng: &mut R,
) -> Result<PlacementReport> {
    let sampling = UniformRandomSampling;
    let specs = std::slice::from_ref(spec);
    let ctx = EngineContext::prepare(config, terrain, reachability, &sampling, None, specs)?;
    Ok(place_spec_internal(spec, 0, &ctx, rng, &mut ()))
}

struct EngineContext<'a> {
    config: &'a PlacementConfig,
    reference_point: Vec3,
    terrain: &'a dyn TerrainOracle,
    reachability: &'a dyn ReachabilityOracle,
    sampling: &'a dyn CandidateSampling,
    cancel: Option<&'a CancelToken>,
}

impl<'a> EngineContext<'a> {
    fn prepare(
        config: &'a PlacementConfig,
        terrain: &'a dyn TerrainOracle,
        reachability: &'a dyn ReachabilityOracle,
        sampling: &'a dyn CandidateSampling,
        cancel: Option<&'a CancelToken>,
        specs: &[ArtefactSpec],
    ) -> Result<Self> {
        config.validate()?;
        for spec in specs {
            spec.validate()?;
        }
        let reference_point = config.reference_point.ok_or(Error::MissingCollaborator {
            what: "reference point",
        })?;
        Ok(Self {
            config,
            reference_point,
            terrain,
            reachability,
            sampling,
            cancel,
        })
    }
}

enum RngSource<'r> {
    Shared(&'r mut dyn RngCore),
    PerArtefact(u64),
}

fn run_specs(
    specs: &[ArtefactSpec],
    ctx: &EngineContext<'_>,
    mut rng: RngSource<'_>,
    sink: &mut dyn EventSink,
) -> Vec<PlacementReport> {
    if sink.wants(PlacementEventKind::RunStarted) {
        sink.send(PlacementEvent::RunStarted {
            config: ctx.config.clone(),
            artefact_count: specs.len(),
        });
    }

    if specs.is_empty() {
        warn!("Placement run has no artefact specs.");
        emit_warning(sink, "run".into(), "Placement run has no artefact specs".into());
    }
    warn_on_suspicious_specs(specs, sink);

    info!(
        "Placement run: {} artefact type(s) | budget {} per type | map {}x{}.",
        specs.len(),
        ctx.config.attempt_budget,
        ctx.config.map_extent.x,
        ctx.config.map_extent.y,
    );

    let mut reports = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        let report = match &mut rng {
            RngSource::Shared(shared) => place_spec_internal(spec, index, ctx, &mut **shared, sink),
            RngSource::PerArtefact(base_seed) => {
                let mut own = StdRng::seed_from_u64(seed_for_artefact(*base_seed, index));
                place_spec_internal(spec, index, ctx, &mut own, sink)
            }
        };
        reports.push(report);
    }

    if sink.wants(PlacementEventKind::RunFinished) {
        sink.send(PlacementEvent::RunFinished {
            reports: reports.clone(),
        });
    }

    reports
}

fn place_spec_internal(
    spec: &ArtefactSpec,
    index: usize,
    ctx: &EngineContext<'_>,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> PlacementReport {
    let budget = ctx.config.attempt_budget;
    let extent: Vector2<f32> = ctx.config.map_extent.into();
    let started = Instant::now();
    let mut report = PlacementReport::new(spec);

    if sink.wants(PlacementEventKind::ArtefactStarted) {
        sink.send(PlacementEvent::ArtefactStarted {
            index,
            id: spec.id.clone(),
            target_count: spec.target_count,
            attempt_budget: budget,
        });
    }

    report.termination = loop {
        if report.placed_count >= spec.target_count {
            break Termination::TargetReached;
        }
        // Cancellation takes precedence over an exhausted budget.
        if ctx.cancel.is_some_and(CancelToken::is_cancelled) {
            break Termination::Cancelled;
        }
        if report.attempt_count >= budget {
            break Termination::BudgetExhausted;
        }
        if ctx
            .config
            .spec_time_limit
            .is_some_and(|limit| started.elapsed() >= limit)
        {
            break Termination::TimedOut;
        }

        report.attempt_count += 1;
        let attempt = report.attempt_count;
        let candidate = Vec2::from(ctx.sampling.sample(extent, rng));
        let rejection = Attempt {
            index,
            id: &spec.id,
            attempt,
            candidate,
        };

        let Some(sample) = ctx.terrain.evaluate(candidate) else {
            rejection.record(&mut report, sink, Rejection::ProbeMiss);
            continue;
        };

        report.stats.rules_evaluated += 1;
        if !satisfies_rules(&spec.rules, sample.normalized_height, sample.slope_deg) {
            rejection.record(&mut report, sink, Rejection::RuleRejection);
            continue;
        }

        report.stats.reachability_queries += 1;
        let query = ctx.reachability.query(ctx.reference_point, sample.point);
        if !query.reachable {
            rejection.record(&mut report, sink, Rejection::Unreachable);
            continue;
        }

        let placement = Placement {
            artefact_id: spec.id.clone(),
            position: sample.point,
            path: ctx.config.produce_paths.then_some(query.corners),
        };
        debug!(
            "Artefact '{}': placed #{} at ({:.2}, {:.2}, {:.2}) on attempt {}.",
            spec.id,
            report.placed_count + 1,
            sample.point.x,
            sample.point.y,
            sample.point.z,
            attempt,
        );
        if sink.wants(PlacementEventKind::PlacementMade) {
            sink.send(PlacementEvent::PlacementMade {
                index,
                id: spec.id.clone(),
                attempt,
                placement: placement.clone(),
            });
        }
        report.push(placement);
    };

    log_outcome(&report, started.elapsed());

    if sink.wants(PlacementEventKind::ArtefactFinished) {
        sink.send(PlacementEvent::ArtefactFinished {
            index,
            id: spec.id.clone(),
            report: report.clone(),
        });
    }

    report
}

/// Identifies the current attempt for rejection bookkeeping.
struct Attempt<'s> {
    index: usize,
    id: &'s ArtefactId,
    attempt: usize,
    candidate: Vec2,
}

impl Attempt<'_> {
    fn record(&self, report: &mut PlacementReport, sink: &mut dyn EventSink, reason: Rejection) {
        report.stats.record(reason);
        if sink.wants(PlacementEventKind::CandidateRejected) {
            sink.send(PlacementEvent::CandidateRejected {
                index: self.index,
                id: self.id.clone(),
                attempt: self.attempt,
                candidate: self.candidate,
                reason,
            });
        }
    }
}

fn log_outcome(report: &PlacementReport, elapsed: Duration) {
    let stats = &report.stats;
    match report.termination {
        Termination::TargetReached => info!(
            "Artefact '{}': placed {}/{} in {} attempts ({:?}).",
            report.artefact_id,
            report.placed_count,
            report.target_count,
            report.attempt_count,
            elapsed,
        ),
        Termination::BudgetExhausted => warn!(
            "Artefact '{}' under-placed: {}/{} after {} attempts | misses: {}, rules: {}, unreachable: {}.",
            report.artefact_id,
            report.placed_count,
            report.target_count,
            report.attempt_count,
            stats.probe_misses,
            stats.rule_rejections,
            stats.unreachable,
        ),
        Termination::Cancelled => warn!(
            "Artefact '{}': cancelled after {} attempts with {}/{} placed.",
            report.artefact_id, report.attempt_count, report.placed_count, report.target_count,
        ),
        Termination::TimedOut => warn!(
            "Artefact '{}': time limit reached after {} attempts ({:?}) with {}/{} placed.",
            report.artefact_id,
            report.attempt_count,
            elapsed,
            report.placed_count,
            report.target_count,
        ),
    }
}

fn emit_warning(sink: &mut dyn EventSink, context: String, message: String) {
    if sink.wants(PlacementEventKind::Warning) {
        sink.send(PlacementEvent::Warning { context, message });
    }
}

fn warn_on_suspicious_specs(specs: &[ArtefactSpec], sink: &mut dyn EventSink) {
    let mut seen: HashSet<&str> = HashSet::with_capacity(specs.len());
    for spec in specs {
        for band in spec.rules.inverted_bands() {
            warn!(
                "Artefact '{}' has min {band} above max {band}; no candidate can pass.",
                spec.id
            );
            emit_warning(
                sink,
                format!("artefact:{}", spec.id),
                format!("Inverted {band} band; no candidate can pass"),
            );
        }
        if !seen.insert(spec.id.as_str()) {
            warn!("Artefact id '{}' appears more than once in the run.", spec.id);
            emit_warning(
                sink,
                format!("artefact:{}", spec.id),
                "Duplicate artefact id; reports will be ambiguous".into(),
            );
        }
    }
}
