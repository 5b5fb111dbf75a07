//! Lazy-loading visibility gate.
//!
//! Turns "root element entered the viewport" into a one-shot permission to
//! start loading. The gate owns its [`Observation`]; the registration is
//! released on the first intersection, when lazy loading is turned off, when
//! the element changes, or when the gate is dropped.

use lazyimg_ui::{ElementId, ElementRef, Intersection, Observation, ObserveOptions, SharedObserver};
use serde::Serialize;

/// Whether the image may be requested yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityState {
    /// Lazy and not yet intersected
    Pending,
    /// Intersected, or not lazy
    Ready,
}

/// Initial visibility for a lazy setting.
pub fn should_defer(lazy_enabled: bool) -> VisibilityState {
    if lazy_enabled {
        VisibilityState::Pending
    } else {
        VisibilityState::Ready
    }
}

/// One-way PENDING -> READY gate driven by intersection reports.
#[derive(Debug)]
pub struct VisibilityGate {
    state: VisibilityState,
    options: ObserveOptions,
    observation: Option<Observation>,
}

impl VisibilityGate {
    pub fn new(lazy_enabled: bool, options: ObserveOptions) -> Self {
        Self {
            state: should_defer(lazy_enabled),
            options,
            observation: None,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == VisibilityState::Ready
    }

    /// The element currently registered for observation.
    pub fn observed_target(&self) -> Option<ElementId> {
        self.observation.as_ref().map(Observation::target)
    }

    /// Bring the registration in line with the gate state and the element.
    ///
    /// Skips (and retries on the next call) while the element is not attached.
    pub fn sync(&mut self, element: &ElementRef, observer: Option<&SharedObserver>) {
        if self.is_ready() {
            self.release();
            return;
        }

        let (Some(target), Some(observer)) = (element.get(), observer) else {
            if self.observation.is_some() {
                log::debug!("Root element detached, dropping observation");
                self.release();
            } else {
                log::trace!("Root element not attached yet, observation deferred");
            }
            return;
        };

        if let Some(current) = &self.observation {
            if current.target() == target && current.is_with(observer) {
                return;
            }
            log::debug!("Root element changed from {} to {}, re-observing", current.target(), target);
        }

        self.release();
        self.observation = Observation::acquire(observer, target, self.options);
    }

    /// Handle an intersection report. Returns whether the gate opened.
    pub fn on_intersection(&mut self, intersection: &Intersection) -> bool {
        if self.is_ready() {
            return false;
        }
        if self.observed_target() != Some(intersection.target) {
            log::trace!("Ignoring intersection for unobserved {}", intersection.target);
            return false;
        }

        log::debug!(
            "{} became visible (ratio {:.2}), loading allowed",
            intersection.target,
            intersection.ratio
        );
        self.state = VisibilityState::Ready;
        self.release();
        true
    }

    /// Update the lazy setting. Disabling lazy opens the gate; enabling it
    /// again never closes an open gate.
    pub fn set_lazy(&mut self, lazy_enabled: bool) {
        if !lazy_enabled && !self.is_ready() {
            log::debug!("Lazy loading disabled, loading allowed");
            self.state = VisibilityState::Ready;
            self.release();
        }
    }

    /// Drop the registration, if any.
    pub fn release(&mut self) {
        self.observation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyimg_ui::{Rectangle, Viewport};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn viewport() -> (Rc<RefCell<Viewport>>, SharedObserver) {
        let viewport = Rc::new(RefCell::new(Viewport::new(Rectangle::new(0.0, 0.0, 100.0, 100.0))));
        let shared: SharedObserver = viewport.clone();
        (viewport, shared)
    }

    #[test]
    fn test_not_lazy_is_ready_without_observation() {
        let (viewport, shared) = viewport();
        let mut gate = VisibilityGate::new(false, ObserveOptions::default());
        assert_eq!(gate.state(), VisibilityState::Ready);

        gate.sync(&ElementRef::attached(ElementId::from_raw(1)), Some(&shared));
        assert_eq!(viewport.borrow().observed_count(), 0);
    }

    #[test]
    fn test_lazy_observes_once_attached() {
        let (viewport, shared) = viewport();
        let element = ElementRef::new();
        let mut gate = VisibilityGate::new(true, ObserveOptions::default());

        gate.sync(&element, Some(&shared));
        assert_eq!(viewport.borrow().observed_count(), 0);

        let id = ElementId::from_raw(2);
        element.attach(id);
        gate.sync(&element, Some(&shared));
        assert_eq!(gate.observed_target(), Some(id));
        assert!(viewport.borrow().is_observing(id));

        // Syncing again does not re-register
        gate.sync(&element, Some(&shared));
        assert_eq!(viewport.borrow().observed_count(), 1);
    }

    #[test]
    fn test_intersection_opens_gate_and_releases() {
        let (viewport, shared) = viewport();
        let id = ElementId::from_raw(3);
        let mut gate = VisibilityGate::new(true, ObserveOptions::default());
        gate.sync(&ElementRef::attached(id), Some(&shared));

        assert!(gate.on_intersection(&Intersection::new(id, 1.0)));
        assert!(gate.is_ready());
        assert!(!viewport.borrow().is_observing(id));

        // Second report is ignored
        assert!(!gate.on_intersection(&Intersection::new(id, 1.0)));
    }

    #[test]
    fn test_foreign_intersection_is_ignored() {
        let (_viewport, shared) = viewport();
        let mut gate = VisibilityGate::new(true, ObserveOptions::default());
        gate.sync(&ElementRef::attached(ElementId::from_raw(4)), Some(&shared));

        assert!(!gate.on_intersection(&Intersection::new(ElementId::from_raw(99), 1.0)));
        assert_eq!(gate.state(), VisibilityState::Pending);
    }

    #[test]
    fn test_element_change_moves_registration() {
        let (viewport, shared) = viewport();
        let element = ElementRef::attached(ElementId::from_raw(5));
        let mut gate = VisibilityGate::new(true, ObserveOptions::default());
        gate.sync(&element, Some(&shared));

        element.attach(ElementId::from_raw(6));
        gate.sync(&element, Some(&shared));
        assert!(!viewport.borrow().is_observing(ElementId::from_raw(5)));
        assert!(viewport.borrow().is_observing(ElementId::from_raw(6)));
    }

    #[test]
    fn test_disabling_lazy_opens_gate_one_way() {
        let (viewport, shared) = viewport();
        let id = ElementId::from_raw(7);
        let mut gate = VisibilityGate::new(true, ObserveOptions::default());
        gate.sync(&ElementRef::attached(id), Some(&shared));

        gate.set_lazy(false);
        assert!(gate.is_ready());
        assert!(!viewport.borrow().is_observing(id));

        gate.set_lazy(true);
        assert!(gate.is_ready());
    }
}
