//! The image component.
//!
//! `ImageComponent` ties the visibility gate, source resolver, load state
//! machine and overlay controller together. Hosts feed it [`ImageEvent`]s through
//! [`ImageComponent::dispatch`] and draw whatever [`ImageComponent::render`]
//! returns. Every derived value is recomputed inside these explicit calls, so a
//! source change and its load-state reset are never observed separately.

use std::fmt;
use std::rc::Rc;

use lazyimg_ui::{Callback, ElementRef, Event, SharedObserver};
use serde::{Deserialize, Serialize};

use crate::compose::{compose, ComposeInput, RenderPlan};
use crate::load_state::{FailureOutcome, LoadState, LoadStateMachine};
use crate::overlay::OverlayController;
use crate::props::ImageProps;
use crate::provider::ConfigProvider;
use crate::source::{EffectiveSource, RewriteHook, SourceResolver};
use crate::visibility::{VisibilityGate, VisibilityState};

/// Success notification from the rendering agent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadEvent {
    /// URL that finished loading; `None` when the agent doesn't report it
    pub src: Option<String>,
    /// Decoded size in pixels, when known
    pub natural_size: Option<(u32, u32)>,
}

impl LoadEvent {
    pub fn for_source(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            natural_size: None,
        }
    }

    pub fn with_natural_size(mut self, width: u32, height: u32) -> Self {
        self.natural_size = Some((width, height));
        self
    }
}

/// Failure notification from the rendering agent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// URL that failed; `None` when the agent doesn't report it
    pub src: Option<String>,
    pub reason: Option<String>,
}

impl ErrorEvent {
    pub fn for_source(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Everything an image component reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageEvent {
    /// Pointer or intersection event on the root element
    Ui(Event),
    /// The current source finished loading
    Loaded(LoadEvent),
    /// The current source failed to load
    Failed(ErrorEvent),
    /// A preview or alternate representation of the image became available
    PreviewResolved { url: String },
}

impl From<Event> for ImageEvent {
    fn from(event: Event) -> Self {
        ImageEvent::Ui(event)
    }
}

impl From<LoadEvent> for ImageEvent {
    fn from(event: LoadEvent) -> Self {
        ImageEvent::Loaded(event)
    }
}

impl From<ErrorEvent> for ImageEvent {
    fn from(event: ErrorEvent) -> Self {
        ImageEvent::Failed(event)
    }
}

/// Where the component is in its host's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Created,
    Mounted,
    Unmounted,
}

/// An image with lazy loading, fallback substitution and an optional overlay.
///
/// # Type Parameters
///
/// - `M`: The message type produced by the `on_load` / `on_error` handlers
pub struct ImageComponent<M> {
    root: ElementRef,
    props: ImageProps,
    provider: Rc<ConfigProvider>,
    /// Per-component override of the provider's `replace_image_src`
    rewrite_hook: Option<RewriteHook>,
    resolver: SourceResolver,
    loader: LoadStateMachine,
    gate: VisibilityGate,
    overlay: OverlayController,
    observer: Option<SharedObserver>,
    lifecycle: Lifecycle,
    on_load: Callback<LoadEvent, M>,
    on_error: Callback<ErrorEvent, M>,
}

impl<M> ImageComponent<M> {
    /// Create a component. Nothing is observed or requested until [`mount`](Self::mount).
    pub fn new(props: ImageProps, provider: Rc<ConfigProvider>) -> Self {
        let config = provider.config();
        let lazy = props.lazy.unwrap_or(config.lazy_by_default);
        let trigger = props.overlay_trigger.unwrap_or(config.default_overlay_trigger);
        let gate = VisibilityGate::new(lazy, config.observe_options());

        let mut resolver = SourceResolver::new();
        let source = resolver
            .update(&props, provider.replace_image_src())
            .unwrap_or_default();
        log::debug!(
            "🖼️ Created image {} (lazy: {}, overlay: {:?})",
            source,
            lazy,
            trigger
        );
        let loader = LoadStateMachine::new(source, props.fallback_source.clone());

        Self {
            root: ElementRef::new(),
            props,
            provider,
            rewrite_hook: None,
            resolver,
            loader,
            gate,
            overlay: OverlayController::new(trigger),
            observer: None,
            lifecycle: Lifecycle::Created,
            on_load: Callback::none(),
            on_error: Callback::none(),
        }
    }

    /// Set the handler fired when the current source loads.
    pub fn on_load<F>(mut self, f: F) -> Self
    where
        F: Fn(LoadEvent) -> M + 'static,
    {
        self.on_load = Callback::new(f);
        self
    }

    /// Set the handler fired once per failed load attempt.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(ErrorEvent) -> M + 'static,
    {
        self.on_error = Callback::new(f);
        self
    }

    /// The stable root element handle. Hosts attach the root node's id to it.
    pub fn root(&self) -> &ElementRef {
        &self.root
    }

    pub fn props(&self) -> &ImageProps {
        &self.props
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn visibility(&self) -> VisibilityState {
        self.gate.state()
    }

    pub fn load_state(&self) -> LoadState {
        self.loader.state()
    }

    pub fn effective_source(&self) -> &EffectiveSource {
        self.loader.source()
    }

    pub fn is_on_fallback(&self) -> bool {
        self.loader.is_on_fallback()
    }

    pub fn overlay_visible(&self) -> bool {
        self.props.overlay_content.is_some() && self.overlay.is_visible()
    }

    /// Whether the host should deliver pointer enter/leave events.
    pub fn wires_pointer_events(&self) -> bool {
        self.props.overlay_content.is_some() && self.overlay.wires_pointer_events()
    }

    /// Whether there is anything to request: the effective source, or the
    /// source set while the fallback is not in use.
    pub fn is_requestable(&self) -> bool {
        !self.loader.source().is_empty()
            || (!self.loader.is_on_fallback() && !self.props.source_alternatives.is_empty())
    }

    /// The URL the rendering agent should currently be loading, if any.
    ///
    /// Without a plain source this is the first source-set alternative.
    pub fn pending_request(&self) -> Option<&str> {
        if !self.is_mounted() || !self.gate.is_ready() || self.loader.state() != LoadState::NotStarted {
            return None;
        }
        self.loader.source().url().or_else(|| {
            self.is_requestable()
                .then(|| self.props.source_alternatives.iter().next())
                .flatten()
                .map(|alt| alt.url.as_str())
        })
    }

    /// Attach to the host. `observer` provides viewport intersection for lazy images.
    pub fn mount(&mut self, observer: Option<SharedObserver>) {
        if self.lifecycle == Lifecycle::Unmounted {
            log::warn!("🖼️ Remounting unmounted image {}", self.loader.source());
        }
        if observer.is_none() && !self.gate.is_ready() {
            log::warn!("🖼️ Lazy image {} mounted without an intersection observer", self.loader.source());
        }
        self.observer = observer;
        self.lifecycle = Lifecycle::Mounted;
        self.sync();
    }

    /// Detach from the host. Releases the observation; later events are discarded.
    pub fn unmount(&mut self) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        log::debug!("🖼️ Unmounting image {} ({:?})", self.loader.source(), self.loader.state());
        self.gate.release();
        self.observer = None;
        self.lifecycle = Lifecycle::Unmounted;
    }

    /// Replace the props, re-deriving everything that depends on them.
    pub fn set_props(&mut self, props: ImageProps) {
        if props == self.props {
            return;
        }
        let config = self.provider.config();
        self.gate.set_lazy(props.lazy.unwrap_or(config.lazy_by_default));
        self.overlay
            .set_trigger(props.overlay_trigger.unwrap_or(config.default_overlay_trigger));
        self.loader.set_fallback(props.fallback_source.clone());
        self.props = props;
        self.resolve_source();
        self.sync();
    }

    /// Override (or with `None`, stop overriding) the provider's rewrite hook.
    pub fn set_rewrite_hook(&mut self, hook: Option<RewriteHook>) {
        self.rewrite_hook = hook;
        self.resolve_source();
        self.sync();
    }

    /// Re-run the observation bookkeeping, e.g. after the root element was attached.
    pub fn sync(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.gate.sync(&self.root, self.observer.as_ref());
        if self.gate.is_ready() && self.is_requestable() {
            self.loader.mark_requested();
        }
    }

    /// Handle one event. Returns the message produced by `on_load`/`on_error`, if any.
    pub fn dispatch(&mut self, event: ImageEvent) -> Option<M> {
        if !self.is_mounted() {
            log::debug!("Discarding {:?} for image in state {:?}", event, self.lifecycle);
            return None;
        }

        match event {
            ImageEvent::Ui(event) => {
                self.on_ui_event(event);
                None
            }
            ImageEvent::Loaded(event) => self.on_loaded(event),
            ImageEvent::Failed(event) => self.on_failed(event),
            ImageEvent::PreviewResolved { url } => {
                if self.loader.clear_error(EffectiveSource::new(url)) {
                    self.sync();
                }
                None
            }
        }
    }

    /// Compose what to draw right now.
    pub fn render(&self) -> RenderPlan {
        compose(&ComposeInput {
            props: &self.props,
            provider: &self.provider,
            visibility: self.gate.state(),
            load_state: self.loader.state(),
            source: self.loader.source(),
            on_fallback: self.loader.is_on_fallback(),
            overlay_visible: self.overlay_visible(),
        })
    }

    fn resolve_source(&mut self) {
        let hook = self
            .rewrite_hook
            .as_ref()
            .or_else(|| self.provider.replace_image_src());
        if let Some(next) = self.resolver.update(&self.props, hook) {
            self.loader.set_source(next);
        }
    }

    fn on_ui_event(&mut self, event: Event) {
        match event {
            Event::Intersected(intersection) => {
                if self.gate.on_intersection(&intersection) {
                    self.sync();
                }
            }
            pointer => {
                if self.props.overlay_content.is_some() && self.overlay.on_event(&pointer) {
                    log::trace!("Overlay visible: {}", self.overlay.is_visible());
                }
            }
        }
    }

    /// Whether a load/error notification for `src` concerns the current request.
    fn accepts(&self, src: Option<&str>) -> bool {
        if !self.gate.is_ready() {
            log::debug!("Discarding notification for {} before it became visible", self.loader.source());
            return false;
        }
        if !self.is_requestable() {
            log::debug!("Discarding notification for an image without source");
            return false;
        }
        let Some(src) = src else {
            return true;
        };
        let current = self.loader.source().matches(src)
            || (!self.loader.is_on_fallback()
                && self.props.source_alternatives.iter().any(|alt| alt.url == src));
        if !current {
            log::debug!("Discarding stale notification for {} (current: {})", src, self.loader.source());
        }
        current
    }

    fn on_loaded(&mut self, event: LoadEvent) -> Option<M> {
        if !self.accepts(event.src.as_deref()) {
            return None;
        }
        let elapsed = self.loader.elapsed();
        if !self.loader.on_loaded() {
            return None;
        }
        match elapsed {
            Some(elapsed) => log::info!("🖼️ Loaded {} in {:?}", self.loader.source(), elapsed),
            None => log::info!("🖼️ Loaded {}", self.loader.source()),
        }
        self.on_load.call(event)
    }

    fn on_failed(&mut self, event: ErrorEvent) -> Option<M> {
        if !self.accepts(event.src.as_deref()) {
            return None;
        }
        let reason = event.reason.as_deref().unwrap_or("unknown reason");
        match self.loader.on_failed() {
            FailureOutcome::Ignored => return None,
            FailureOutcome::Substituted { failed } => {
                log::warn!(
                    "🖼️ Failed to load {} ({}), falling back to {}",
                    failed,
                    reason,
                    self.loader.source()
                );
                self.sync();
            }
            FailureOutcome::Terminal => {
                log::error!("🖼️ Failed to load {} ({})", self.loader.source(), reason);
            }
        }
        self.on_error.call(event)
    }
}

impl<M> fmt::Debug for ImageComponent<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageComponent")
            .field("root", &self.root)
            .field("lifecycle", &self.lifecycle)
            .field("source", self.loader.source())
            .field("load_state", &self.loader.state())
            .field("visibility", &self.gate.state())
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}
