//! Event types and sinks for observing placement runs.
//!
//! This module defines [`PlacementEvent`] and a set of sinks to collect, forward or filter
//! events while running the engine via [`crate::placement::runner::PlacementRunner`] or
//! [`crate::placement::runner::place_all`].
use glam::Vec2;

use crate::placement::report::{Placement, PlacementReport, Rejection};
use crate::placement::runner::PlacementConfig;
use crate::placement::ArtefactId;

/// Describes events emitted by the placement engine.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PlacementEvent {
    /// Emitted once before the first artefact is processed.
    RunStarted {
        /// The run configuration used.
        config: PlacementConfig,
        /// Number of artefact specs in the run.
        artefact_count: usize,
    },

    /// Emitted once after the last artefact is processed.
    RunFinished {
        /// One report per spec, in input order.
        reports: Vec<PlacementReport>,
    },

    /// Emitted when the search for one artefact starts.
    ArtefactStarted {
        /// Position of the spec in the input.
        index: usize,
        id: ArtefactId,
        target_count: usize,
        attempt_budget: usize,
    },

    /// Emitted when the search for one artefact ends.
    ArtefactFinished {
        index: usize,
        id: ArtefactId,
        report: PlacementReport,
    },

    /// Emitted for every discarded candidate.
    CandidateRejected {
        index: usize,
        id: ArtefactId,
        /// 1-based attempt number within this artefact.
        attempt: usize,
        /// Raw map coordinate that was probed.
        candidate: Vec2,
        reason: Rejection,
    },

    /// Emitted when a candidate is accepted.
    PlacementMade {
        index: usize,
        id: ArtefactId,
        attempt: usize,
        placement: Placement,
    },

    /// Non-fatal warning generated during placement.
    Warning {
        /// Context string (e.g. artefact id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PlacementEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementEventKind {
    RunStarted,
    RunFinished,
    ArtefactStarted,
    ArtefactFinished,
    CandidateRejected,
    PlacementMade,
    Warning,
}

impl PlacementEvent {
    pub fn kind(&self) -> PlacementEventKind {
        match self {
            PlacementEvent::RunStarted { .. } => PlacementEventKind::RunStarted,
            PlacementEvent::RunFinished { .. } => PlacementEventKind::RunFinished,
            PlacementEvent::ArtefactStarted { .. } => PlacementEventKind::ArtefactStarted,
            PlacementEvent::ArtefactFinished { .. } => PlacementEventKind::ArtefactFinished,
            PlacementEvent::CandidateRejected { .. } => PlacementEventKind::CandidateRejected,
            PlacementEvent::PlacementMade { .. } => PlacementEventKind::PlacementMade,
            PlacementEvent::Warning { .. } => PlacementEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PlacementEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlacementEvent);

    /// Whether events of `kind` should be built at all. The engine skips constructing
    /// events a sink does not want.
    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlacementEvent) {}

    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PlacementEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<PlacementEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of the given kind.
    pub fn count(&self, kind: PlacementEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        self.events.push(event);
    }
}

/// Forwards only the event kinds in its allow-list to the inner sink.
pub struct FilterSink<S: EventSink> {
    inner: S,
    allowed: Vec<PlacementEventKind>,
}

impl<S: EventSink> FilterSink<S> {
    pub fn new(inner: S, allowed: impl IntoIterator<Item = PlacementEventKind>) -> Self {
        Self {
            inner,
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilterSink<S> {
    fn send(&mut self, event: PlacementEvent) {
        if self.wants(event.kind()) {
            self.inner.send(event);
        }
    }

    fn wants(&self, kind: PlacementEventKind) -> bool {
        self.allowed.contains(&kind) && self.inner.wants(kind)
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PlacementEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        let kind = event.kind();
        for sink in rest {
            if sink.wants(kind) {
                sink.send(event.clone());
            }
        }
        if last.wants(kind) {
            last.send(event);
        }
    }

    fn wants(&self, kind: PlacementEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
