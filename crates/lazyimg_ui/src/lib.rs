//! lazyimg_ui - Event and observation plumbing for lazily loaded widgets
//!
//! This crate provides the framework-level pieces the image component builds on:
//! callback wrappers, pointer/intersection events, geometry, element handles and
//! the viewport intersection capability.

mod callback;
mod element;
mod event;
mod intersection;
mod layout;
mod viewport;

#[cfg(target_arch = "wasm32")]
mod dom;

pub use callback::{Callback, Hook};
pub use element::{ElementId, ElementRef};
pub use event::Event;
pub use intersection::{
    Intersection, IntersectionObserver, MarginParseError, MarginValue, Observation,
    ObserveOptions, RootMargin, SharedObserver,
};
pub use layout::{Point, Rectangle};
pub use viewport::Viewport;

#[cfg(target_arch = "wasm32")]
pub use dom::DomIntersectionObserver;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::callback::{Callback, Hook};
    pub use crate::element::{ElementId, ElementRef};
    pub use crate::event::Event;
    pub use crate::intersection::{
        Intersection, IntersectionObserver, Observation, ObserveOptions, RootMargin,
        SharedObserver,
    };
    pub use crate::layout::{Point, Rectangle};
    pub use crate::viewport::Viewport;
}
