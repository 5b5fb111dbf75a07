//! Tests for viewport-gated loading.

use lazyimg_ui::{Event, Intersection, Rectangle};

use super::{image, mounted, viewport};
use crate::component::{ErrorEvent, LoadEvent};
use crate::load_state::LoadState;
use crate::props::ImageProps;
use crate::visibility::VisibilityState;

#[test]
fn test_eager_is_ready_immediately() {
    let image = image(ImageProps::new("a.jpg").lazy(false));
    assert_eq!(image.visibility(), VisibilityState::Ready);
}

#[test]
fn test_lazy_is_the_default() {
    let image = image(ImageProps::new("a.jpg"));
    assert_eq!(image.visibility(), VisibilityState::Pending);
}

#[test]
fn test_never_visible_never_loads() {
    let (viewport, shared) = viewport();
    let mut image = image(ImageProps::new("a.jpg").with_fallback("b.jpg"));
    let id = lazyimg_ui::ElementId::next();
    viewport.borrow_mut().place(id, Rectangle::new(0.0, 500.0, 50.0, 50.0));
    image.root().attach(id);
    image.mount(Some(shared));

    assert!(viewport.borrow().is_observing(id));
    assert!(viewport.borrow_mut().take_intersections().is_empty());

    assert!(image.dispatch(LoadEvent::for_source("a.jpg").into()).is_none());
    assert!(image.dispatch(ErrorEvent::for_source("a.jpg").into()).is_none());
    assert_eq!(image.load_state(), LoadState::NotStarted);
    assert_eq!(image.effective_source().url(), Some("a.jpg"));
    assert_eq!(image.pending_request(), None);

    let plan = image.render();
    assert!(!plan.show_image());
    assert!(!plan.show_loading_indicator());
}

#[test]
fn test_scrolling_into_view_opens_gate_once() {
    let (viewport, shared) = viewport();
    let mut image = image(ImageProps::new("a.jpg"));
    let id = lazyimg_ui::ElementId::next();
    viewport.borrow_mut().place(id, Rectangle::new(0.0, 150.0, 50.0, 50.0));
    image.root().attach(id);
    image.mount(Some(shared));

    viewport.borrow_mut().scroll_to(0.0, 120.0);
    let hits = viewport.borrow_mut().take_intersections();
    assert_eq!(hits.len(), 1);
    for hit in hits {
        image.dispatch(Event::Intersected(hit).into());
    }

    assert_eq!(image.visibility(), VisibilityState::Ready);
    assert!(!viewport.borrow().is_observing(id), "registration released");
    assert_eq!(image.pending_request(), Some("a.jpg"));
    assert!(image.render().show_loading_indicator());

    // Scrolling away and back produces nothing further
    viewport.borrow_mut().scroll_to(0.0, 0.0);
    viewport.borrow_mut().scroll_to(0.0, 120.0);
    assert!(viewport.borrow_mut().take_intersections().is_empty());
}

#[test]
fn test_observation_waits_for_attachment() {
    let (viewport, shared) = viewport();
    let mut image = image(ImageProps::new("a.jpg"));
    image.mount(Some(shared));
    assert_eq!(viewport.borrow().observed_count(), 0);

    let id = lazyimg_ui::ElementId::next();
    image.root().attach(id);
    image.sync();
    assert!(viewport.borrow().is_observing(id));
}

#[test]
fn test_unmount_releases_observation() {
    let (viewport, shared) = viewport();
    let mut image = image(ImageProps::new("a.jpg"));
    let id = lazyimg_ui::ElementId::next();
    image.root().attach(id);
    image.mount(Some(shared));
    assert!(viewport.borrow().is_observing(id));

    image.unmount();
    assert!(!viewport.borrow().is_observing(id));

    // Intersections after unmount are discarded
    image.dispatch(Event::Intersected(Intersection::new(id, 1.0)).into());
    assert_eq!(image.visibility(), VisibilityState::Pending);
}

#[test]
fn test_drop_releases_observation() {
    let (viewport, shared) = viewport();
    let id = lazyimg_ui::ElementId::next();
    {
        let mut image = image(ImageProps::new("a.jpg"));
        image.root().attach(id);
        image.mount(Some(shared));
        assert!(viewport.borrow().is_observing(id));
    }
    assert_eq!(viewport.borrow().observed_count(), 0);
}

#[test]
fn test_disabling_lazy_releases_gate() {
    let (viewport, shared) = viewport();
    let mut image = image(ImageProps::new("a.jpg"));
    let id = lazyimg_ui::ElementId::next();
    image.root().attach(id);
    image.mount(Some(shared));

    image.set_props(ImageProps::new("a.jpg").lazy(false));
    assert_eq!(image.visibility(), VisibilityState::Ready);
    assert!(!viewport.borrow().is_observing(id));
    assert_eq!(image.pending_request(), Some("a.jpg"));
}

#[test]
fn test_identical_source_keeps_loaded_state() {
    let mut image = mounted(ImageProps::new("a.jpg"));
    image.dispatch(LoadEvent::for_source("a.jpg").into());

    image.set_props(ImageProps::new("a.jpg").lazy(false).with_alt("updated"));
    assert_eq!(image.load_state(), LoadState::Loaded);
}

#[test]
fn test_source_change_resets_load_state() {
    let mut image = mounted(ImageProps::new("a.jpg"));
    image.dispatch(LoadEvent::for_source("a.jpg").into());

    image.set_props(ImageProps::new("b.jpg").lazy(false));
    assert_eq!(image.load_state(), LoadState::NotStarted);
    assert!(image.render().show_loading_indicator());
}
