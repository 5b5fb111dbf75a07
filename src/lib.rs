//! lazyimg - Resilient image component
//!
//! An image component that defers loading until its root element enters the
//! viewport, substitutes a fallback source once when loading fails, negotiates
//! formats through a source set and layers placeholder, indicators and an
//! optional hover overlay around the image.

mod component;
mod compose;
mod config;
mod constants;
mod error;
mod load_state;
mod overlay;
mod props;
mod provider;
mod scenario;
mod source;
mod visibility;

#[cfg(test)]
mod tests;

pub use component::{ErrorEvent, ImageComponent, ImageEvent, LoadEvent, Lifecycle};
pub use compose::{compose, ComposeInput, ImagePlan, Indicator, OverlayPlan, RenderPlan, SourceEntry, SourceMode};
pub use config::{ImageConfig, LogLevel, CONFIG_VERSION};
pub use error::ConfigError;
pub use load_state::{FailureOutcome, LoadState, LoadStateMachine};
pub use overlay::{OverlayController, OverlayTrigger};
pub use props::{Content, ImageProps, ObjectFit, ObjectPosition, Shape, SourceAlternative, SourceSet};
pub use provider::{ConfigProvider, DefaultIcons, IconSet, Locale, Localizer};
pub use scenario::{DemoMessage, Frame, Scenario, ScenarioImage, ScenarioReport};
pub use source::{is_redundant, resolve, EffectiveSource, RewriteHook, SourceResolver};
pub use visibility::{should_defer, VisibilityGate, VisibilityState};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
