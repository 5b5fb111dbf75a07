//! In-memory intersection observer.
//!
//! `Viewport` tracks element placements and a scrollable root rectangle, and
//! reports targets as they cross into view. Native hosts and tests drive it
//! directly; browser hosts use the DOM-backed observer instead.

use std::collections::{BTreeMap, HashMap};

use crate::element::ElementId;
use crate::intersection::{Intersection, IntersectionObserver, ObserveOptions};
use crate::layout::Rectangle;

#[derive(Debug, Clone, Copy)]
struct Target {
    options: ObserveOptions,
    /// Whether the target satisfied its threshold at the last check
    was_visible: bool,
}

/// A scrollable root with placed elements.
#[derive(Debug, Default)]
pub struct Viewport {
    bounds: Rectangle,
    placements: HashMap<ElementId, Rectangle>,
    targets: BTreeMap<ElementId, Target>,
    pending: Vec<Intersection>,
}

impl Viewport {
    /// Create a viewport covering `bounds`.
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Replace the viewport rectangle and re-check all targets.
    pub fn set_bounds(&mut self, bounds: Rectangle) {
        self.bounds = bounds;
        self.check_all();
    }

    /// Scroll so the viewport origin sits at (`x`, `y`).
    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.set_bounds(self.bounds.moved_to(x, y));
    }

    /// Scroll by a relative offset.
    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        let Rectangle { x, y, .. } = self.bounds;
        self.scroll_to(x + dx, y + dy);
    }

    /// Place (or move) an element.
    pub fn place(&mut self, id: ElementId, bounds: Rectangle) {
        self.placements.insert(id, bounds);
        self.check(id);
    }

    /// Remove an element's placement. Observation of it, if any, stays but can
    /// no longer trigger.
    pub fn remove(&mut self, id: ElementId) {
        self.placements.remove(&id);
        if let Some(target) = self.targets.get_mut(&id) {
            target.was_visible = false;
        }
    }

    /// Number of currently observed targets.
    pub fn observed_count(&self) -> usize {
        self.targets.len()
    }

    pub fn is_observing(&self, id: ElementId) -> bool {
        self.targets.contains_key(&id)
    }

    /// Drain intersections reported since the last call, in report order.
    pub fn take_intersections(&mut self) -> Vec<Intersection> {
        std::mem::take(&mut self.pending)
    }

    fn check_all(&mut self) {
        let ids: Vec<ElementId> = self.targets.keys().copied().collect();
        for id in ids {
            self.check(id);
        }
    }

    fn check(&mut self, id: ElementId) {
        let Some(target) = self.targets.get_mut(&id) else {
            return;
        };
        let Some(placement) = self.placements.get(&id) else {
            return;
        };

        let root = target.options.root_margin.apply(self.bounds);
        let ratio = placement.intersection_ratio(&root);
        let visible = target.options.is_satisfied_by(ratio);

        if visible && !target.was_visible {
            log::trace!("{} entered viewport (ratio {:.2})", id, ratio);
            self.pending.push(Intersection::new(id, ratio));
        }
        target.was_visible = visible;
    }
}

impl IntersectionObserver for Viewport {
    fn observe(&mut self, target: ElementId, options: ObserveOptions) {
        self.targets.insert(
            target,
            Target {
                options,
                was_visible: false,
            },
        );
        // Targets already in view are reported right away
        self.check(target);
    }

    fn unobserve(&mut self, target: ElementId) {
        self.targets.remove(&target);
        self.pending.retain(|hit| hit.target != target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::RootMargin;

    fn tile(y: f32) -> Rectangle {
        Rectangle::new(0.0, y, 100.0, 100.0)
    }

    #[test]
    fn test_observe_reports_visible_target_immediately() {
        let mut viewport = Viewport::new(Rectangle::new(0.0, 0.0, 100.0, 300.0));
        let id = ElementId::from_raw(1);
        viewport.place(id, tile(0.0));
        viewport.observe(id, ObserveOptions::default());

        let hits = viewport.take_intersections();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, id);
        assert!(viewport.take_intersections().is_empty());
    }

    #[test]
    fn test_scroll_reports_once_per_crossing() {
        let mut viewport = Viewport::new(Rectangle::new(0.0, 0.0, 100.0, 300.0));
        let id = ElementId::from_raw(2);
        viewport.place(id, tile(1000.0));
        viewport.observe(id, ObserveOptions::default());
        assert!(viewport.take_intersections().is_empty());

        viewport.scroll_to(0.0, 800.0);
        viewport.scroll_by(0.0, 10.0);
        assert_eq!(viewport.take_intersections().len(), 1);

        // Leaving and re-entering is a new crossing
        viewport.scroll_to(0.0, 0.0);
        viewport.scroll_to(0.0, 900.0);
        assert_eq!(viewport.take_intersections().len(), 1);
    }

    #[test]
    fn test_root_margin_triggers_early() {
        let mut viewport = Viewport::new(Rectangle::new(0.0, 0.0, 100.0, 300.0));
        let id = ElementId::from_raw(3);
        viewport.place(id, tile(400.0));

        let margin: RootMargin = "200px 0px".parse().unwrap();
        viewport.observe(id, ObserveOptions::new(margin, 0.0));
        assert_eq!(viewport.take_intersections().len(), 1);
    }

    #[test]
    fn test_unobserve_drops_pending_reports() {
        let mut viewport = Viewport::new(Rectangle::new(0.0, 0.0, 100.0, 300.0));
        let id = ElementId::from_raw(4);
        viewport.place(id, tile(0.0));
        viewport.observe(id, ObserveOptions::default());
        viewport.unobserve(id);

        assert!(viewport.take_intersections().is_empty());
        assert!(!viewport.is_observing(id));
        assert_eq!(viewport.observed_count(), 0);
    }

    #[test]
    fn test_unplaced_target_never_reports() {
        let mut viewport = Viewport::new(Rectangle::new(0.0, 0.0, 100.0, 300.0));
        let id = ElementId::from_raw(5);
        viewport.observe(id, ObserveOptions::default());
        viewport.scroll_by(0.0, 50.0);
        assert!(viewport.take_intersections().is_empty());
    }
}
