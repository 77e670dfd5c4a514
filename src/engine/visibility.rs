//! Visibility tracking.
//!
//! `IntersectionObserver` reproduces the browser primitive over our own
//! geometry: the root is the top `band` fraction of the viewport, and a
//! target counts as intersecting once at least `threshold` of its height is
//! inside that band. `VisibilityTracker` turns each delivered batch into at
//! most one active heading: the intersecting heading nearest to, but not
//! above, the viewport top.

use std::collections::HashMap;

use crate::dom::NodeId;
use crate::outline::HeadingRecord;
use crate::render::layout::Geometry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

/// One target's intersection state, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub intersection_ratio: f32,
    /// Top edge relative to the viewport top; negative once scrolled past
    pub top: f32,
}

pub struct IntersectionObserver {
    band: f32,
    threshold: f32,
    targets: Vec<NodeId>,
    last: HashMap<NodeId, bool>,
}

impl IntersectionObserver {
    pub fn new(band: f32, threshold: f32) -> Self {
        Self {
            band: band.clamp(0.0, 1.0),
            threshold: threshold.clamp(0.0, 1.0),
            targets: Vec::new(),
            last: HashMap::new(),
        }
    }

    /// Replace the observed set. The next delivery reports every target.
    pub fn observe(&mut self, targets: impl IntoIterator<Item = NodeId>) {
        self.targets = targets.into_iter().collect();
        self.last.clear();
    }

    pub fn disconnect(&mut self) {
        self.targets.clear();
        self.last.clear();
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    /// Entries whose intersecting state changed since the last delivery.
    /// Targets without geometry (detached elements) are skipped.
    pub fn take_entries(&mut self, geometry: &Geometry, viewport: Viewport) -> Vec<IntersectionEntry> {
        let band_bottom = viewport.height * self.band;
        let mut entries = Vec::new();

        for &target in &self.targets {
            let Some(bounds) = geometry.get(target) else {
                continue;
            };
            let top = bounds.y - viewport.scroll_y;
            let bottom = top + bounds.height;

            let ratio = if bounds.height > 0.0 {
                ((bottom.min(band_bottom) - top.max(0.0)) / bounds.height).max(0.0)
            } else if top >= 0.0 && top <= band_bottom {
                1.0
            } else {
                0.0
            };
            let is_intersecting = ratio > 0.0 && ratio >= self.threshold;

            if self.last.insert(target, is_intersecting) != Some(is_intersecting) {
                entries.push(IntersectionEntry {
                    target,
                    is_intersecting,
                    intersection_ratio: ratio,
                    top,
                });
            }
        }
        entries
    }
}

/// The intersecting entry nearest to, but not above, the viewport top.
pub fn select_active(entries: &[IntersectionEntry]) -> Option<&IntersectionEntry> {
    entries
        .iter()
        .filter(|e| e.is_intersecting && e.top >= 0.0)
        .min_by(|a, b| a.top.total_cmp(&b.top))
}

pub struct VisibilityTracker {
    observer: IntersectionObserver,
    identifiers: HashMap<NodeId, String>,
    active: Option<String>,
}

impl VisibilityTracker {
    pub fn new(band: f32, threshold: f32) -> Self {
        Self {
            observer: IntersectionObserver::new(band, threshold),
            identifiers: HashMap::new(),
            active: None,
        }
    }

    /// Drop the previous observation set and watch `headings` instead.
    pub fn observe(&mut self, headings: &[HeadingRecord]) {
        self.observer.disconnect();
        self.identifiers = headings
            .iter()
            .map(|h| (h.node, h.identifier.clone()))
            .collect();
        if !headings.is_empty() {
            self.observer.observe(headings.iter().map(|h| h.node));
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn observed(&self) -> &[NodeId] {
        self.observer.targets()
    }

    /// Run one delivered batch. Returns the identifier to report active, if
    /// any entry qualifies; otherwise the previous active heading stands.
    pub fn on_entries(&mut self, entries: &[IntersectionEntry]) -> Option<String> {
        let winner = select_active(entries)?;
        let identifier = self.identifiers.get(&winner.target)?.clone();
        if self.active.as_deref() != Some(identifier.as_str()) {
            log::debug!("Active heading: {}", identifier);
        }
        self.active = Some(identifier.clone());
        Some(identifier)
    }

    /// Measure against `geometry`/`viewport` and run the resulting batch.
    /// An empty batch is not delivered.
    pub fn on_viewport(&mut self, geometry: &Geometry, viewport: Viewport) -> Option<String> {
        let entries = self.observer.take_entries(geometry, viewport);
        if entries.is_empty() {
            return None;
        }
        self.on_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::LayoutBox;

    fn entry(target: u64, top: f32, is_intersecting: bool) -> IntersectionEntry {
        IntersectionEntry {
            target: NodeId(target),
            is_intersecting,
            intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
            top,
        }
    }

    fn heading(node: u64, id: &str) -> HeadingRecord {
        HeadingRecord {
            identifier: id.into(),
            text: id.into(),
            level: 2,
            number: "1.1".into(),
            node: NodeId(node),
        }
    }

    fn boxed(y: f32, height: f32) -> LayoutBox {
        LayoutBox {
            x: 0.0,
            y,
            width: 800.0,
            height,
        }
    }

    fn viewport(scroll_y: f32) -> Viewport {
        Viewport {
            scroll_y,
            width: 800.0,
            height: 1000.0,
        }
    }

    #[test]
    fn nearest_non_negative_top_wins() {
        let entries = [entry(1, 40.0, true), entry(2, 5.0, true), entry(3, -10.0, true)];
        assert_eq!(select_active(&entries).unwrap().target, NodeId(2));
    }

    #[test]
    fn scrolled_past_heading_is_excluded() {
        let entries = [entry(1, -10.0, true), entry(2, 3.0, false)];
        assert!(select_active(&entries).is_none());
    }

    #[test]
    fn empty_batch_keeps_previous_active() {
        let mut tracker = VisibilityTracker::new(0.2, 0.1);
        tracker.observe(&[heading(1, "intro"), heading(2, "usage")]);
        assert_eq!(tracker.on_entries(&[entry(2, 12.0, true)]).as_deref(), Some("usage"));
        assert_eq!(tracker.on_entries(&[entry(1, -50.0, true)]), None);
        assert_eq!(tracker.active(), Some("usage"));
    }

    #[test]
    fn observer_reports_band_membership() {
        let mut geometry = Geometry::default();
        geometry.insert(NodeId(1), boxed(100.0, 30.0));
        geometry.insert(NodeId(2), boxed(900.0, 30.0));
        let mut observer = IntersectionObserver::new(0.2, 0.1);
        observer.observe([NodeId(1), NodeId(2)]);

        // band is the top 200px
        let first = observer.take_entries(&geometry, viewport(0.0));
        assert_eq!(first.len(), 2);
        assert!(first[0].is_intersecting);
        assert!(!first[1].is_intersecting);

        // nothing flipped, nothing delivered
        assert!(observer.take_entries(&geometry, viewport(10.0)).is_empty());

        let scrolled = observer.take_entries(&geometry, viewport(800.0));
        assert_eq!(scrolled.len(), 2);
        let second = scrolled.iter().find(|e| e.target == NodeId(2)).unwrap();
        assert!(second.is_intersecting);
        assert_eq!(second.top, 100.0);
    }

    #[test]
    fn tracker_follows_scrolling() {
        let mut geometry = Geometry::default();
        geometry.insert(NodeId(1), boxed(0.0, 30.0));
        geometry.insert(NodeId(2), boxed(1500.0, 30.0));
        let mut tracker = VisibilityTracker::new(0.2, 0.1);
        tracker.observe(&[heading(1, "intro"), heading(2, "usage")]);

        assert_eq!(tracker.on_viewport(&geometry, viewport(0.0)).as_deref(), Some("intro"));
        // intro leaves the band, usage not yet in it
        assert_eq!(tracker.on_viewport(&geometry, viewport(400.0)), None);
        assert_eq!(tracker.active(), Some("intro"));
        assert_eq!(tracker.on_viewport(&geometry, viewport(1450.0)).as_deref(), Some("usage"));
    }

    #[test]
    fn empty_heading_list_observes_nothing() {
        let mut tracker = VisibilityTracker::new(0.2, 0.1);
        tracker.observe(&[heading(1, "a")]);
        tracker.observe(&[]);
        assert!(tracker.observed().is_empty());
    }
}
