//! Behavior tests for the image component.
//!
//! These drive `ImageComponent` through its public dispatcher, the way a host
//! would, and check the resulting states, handler messages and render plans.

mod lazy_tests;
mod overlay_tests;

use std::cell::RefCell;
use std::rc::Rc;

use lazyimg_ui::{ElementId, Rectangle, SharedObserver, Viewport};

use crate::component::{ErrorEvent, ImageComponent, LoadEvent};
use crate::props::ImageProps;
use crate::provider::ConfigProvider;

/// Handler message recorded by test components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Note {
    Load(String),
    Error(String),
}

/// A component wired to record its handler calls.
pub(crate) fn image(props: ImageProps) -> ImageComponent<Note> {
    ImageComponent::new(props, Rc::new(ConfigProvider::default()))
        .on_load(|e: LoadEvent| Note::Load(e.src.unwrap_or_default()))
        .on_error(|e: ErrorEvent| Note::Error(e.src.unwrap_or_default()))
}

/// An eager component, attached and mounted without an observer.
pub(crate) fn mounted(props: ImageProps) -> ImageComponent<Note> {
    let mut image = image(props.lazy(false));
    image.root().attach(ElementId::next());
    image.mount(None);
    image
}

/// A 100x100 viewport at the origin.
pub(crate) fn viewport() -> (Rc<RefCell<Viewport>>, SharedObserver) {
    let viewport = Rc::new(RefCell::new(Viewport::new(Rectangle::new(0.0, 0.0, 100.0, 100.0))));
    let shared: SharedObserver = viewport.clone();
    (viewport, shared)
}
