//! `OutlineEngine`: owns the outline state and wires the watcher, the
//! collector and the visibility tracker together.
//!
//! The host drives it from its single event loop: forward events and
//! mutation records, call `tick` when timers may be due, and report
//! viewport changes. Results go out to subscribers as `OutlineEvent`s.

pub mod visibility;
pub mod watcher;

use std::sync::mpsc;
use std::time::Instant;

use crate::config::OutlineConfig;
use crate::dom::{DomTree, MutationRecord};
use crate::outline::{changed, collect, filter_headings, HeadingRecord};
use crate::render::layout::Geometry;

use self::visibility::{IntersectionEntry, Viewport, VisibilityTracker};
use self::watcher::{HostEvent, Watcher};

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineEvent {
    /// The canonical (unfiltered) list changed structurally
    HeadingsChanged(Vec<HeadingRecord>),
    /// A visibility batch picked this heading
    ActiveHeadingChanged(String),
    /// The filtered list after a query or list change
    FilterApplied(Vec<HeadingRecord>),
}

/// Everything the engine knows about the current document.
#[derive(Debug, Default)]
struct EngineState {
    canonical: Vec<HeadingRecord>,
    filtered: Vec<HeadingRecord>,
    query: String,
}

pub struct OutlineEngine {
    config: OutlineConfig,
    state: EngineState,
    watcher: Watcher,
    tracker: VisibilityTracker,
    listeners: Vec<mpsc::Sender<OutlineEvent>>,
}

impl OutlineEngine {
    pub fn new(config: OutlineConfig) -> Self {
        Self {
            watcher: Watcher::new(config.debounce_delay(), String::new()),
            tracker: VisibilityTracker::new(config.trigger_band, config.visibility_threshold),
            state: EngineState::default(),
            listeners: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// New receiver for outline events. Dropped receivers are forgotten on
    /// the next broadcast.
    pub fn subscribe(&mut self) -> mpsc::Receiver<OutlineEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Initial collection for a freshly loaded document.
    pub fn start(&mut self, tree: &mut DomTree, location: &str) {
        self.watcher.cancel();
        self.watcher.reset_location(location);
        self.refresh(tree, true);
    }

    /// Forward a host event (navigation or mutation notification).
    pub fn notify(&mut self, event: HostEvent, now: Instant) {
        self.watcher.notify(event, now);
    }

    /// Forward drained mutation records.
    pub fn observe_mutations(&mut self, records: &[MutationRecord], now: Instant) {
        self.watcher.observe_mutations(records, now);
    }

    pub fn refresh_pending(&self) -> bool {
        self.watcher.is_pending()
    }

    /// Run the debounced refresh if it is due. Returns whether a collection
    /// pass ran.
    pub fn tick(&mut self, now: Instant, tree: &mut DomTree, location: &str) -> bool {
        match self.watcher.poll(now, location) {
            Some(request) => {
                self.refresh(tree, request.force);
                true
            }
            None => false,
        }
    }

    /// Unconditional re-collection, requested by the presentation layer.
    /// `location` becomes the watcher's known URL, so a navigation settled
    /// here is not forced a second time on the next tick.
    pub fn force_refresh(&mut self, tree: &mut DomTree, location: &str) {
        self.watcher.cancel();
        self.watcher.reset_location(location);
        self.refresh(tree, true);
    }

    /// One collection pass. The new list always replaces the stored one so
    /// element handles stay current; subscribers hear about it only when
    /// the change detector (or `force`) says so.
    fn refresh(&mut self, tree: &mut DomTree, force: bool) -> bool {
        let headings = collect(tree, &self.config);
        let is_changed = changed(&self.state.canonical, &headings, force);

        self.state.canonical = headings;
        self.state.filtered = filter_headings(&self.state.canonical, &self.state.query);
        self.tracker.observe(&self.state.canonical);

        log::debug!(
            "Refresh (force={}): {} headings, changed={}",
            force,
            self.state.canonical.len(),
            is_changed
        );

        if is_changed {
            self.broadcast(OutlineEvent::HeadingsChanged(self.state.canonical.clone()));
            if !self.state.query.is_empty() {
                self.broadcast(OutlineEvent::FilterApplied(self.state.filtered.clone()));
            }
        }
        is_changed
    }

    /// Filter the canonical list by `query` and broadcast the result.
    pub fn apply_filter(&mut self, query: &str) -> Vec<HeadingRecord> {
        self.state.query = query.to_string();
        self.state.filtered = filter_headings(&self.state.canonical, query);
        self.broadcast(OutlineEvent::FilterApplied(self.state.filtered.clone()));
        self.state.filtered.clone()
    }

    /// Run a batch of intersection entries delivered by the host.
    pub fn deliver_intersections(&mut self, entries: &[IntersectionEntry]) -> Option<String> {
        let identifier = self.tracker.on_entries(entries)?;
        self.broadcast(OutlineEvent::ActiveHeadingChanged(identifier.clone()));
        Some(identifier)
    }

    /// Measure the observed headings against the viewport and run the batch.
    pub fn observe_viewport(&mut self, geometry: &Geometry, viewport: Viewport) -> Option<String> {
        let identifier = self.tracker.on_viewport(geometry, viewport)?;
        self.broadcast(OutlineEvent::ActiveHeadingChanged(identifier.clone()));
        Some(identifier)
    }

    pub fn headings(&self) -> &[HeadingRecord] {
        &self.state.canonical
    }

    pub fn filtered(&self) -> &[HeadingRecord] {
        &self.state.filtered
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn active(&self) -> Option<&str> {
        self.tracker.active()
    }

    pub fn locate(&self, identifier: &str) -> Option<&HeadingRecord> {
        self.state
            .canonical
            .iter()
            .find(|h| h.identifier == identifier)
    }

    /// Scroll offset that brings `identifier` to the top of the viewport.
    pub fn scroll_target(&self, identifier: &str, geometry: &Geometry) -> Option<f32> {
        let heading = self.locate(identifier)?;
        geometry.get(heading.node).map(|b| b.y.max(0.0))
    }

    fn broadcast(&mut self, event: OutlineEvent) {
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
