//! Presentation composer.
//!
//! A pure function from the component's state slices to a [`RenderPlan`]: which
//! layers to draw and with what. Layers, bottom to top: placeholder, gallery
//! decoration, image, loading indicator, error indicator, overlay.

use serde::Serialize;

use crate::constants::{KEY_GALLERY, KEY_LOAD_FAILED, KEY_LOADING};
use crate::load_state::LoadState;
use crate::props::{Content, ImageProps, ObjectFit, ObjectPosition, Shape};
use crate::provider::ConfigProvider;
use crate::source::EffectiveSource;
use crate::visibility::VisibilityState;

/// One `<source>`-like entry of a multi-source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    /// MIME type; `None` for the plain URL entry
    pub media_type: Option<String>,
    pub url: String,
}

/// How the image element names its source(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SourceMode {
    /// A single URL
    Single { url: String },
    /// Format alternatives in order, then the plain URL if there is one
    Multi { sources: Vec<SourceEntry> },
}

/// The image layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePlan {
    pub source_mode: SourceMode,
    pub alt: Option<String>,
    pub fit: Option<ObjectFit>,
    pub position: Option<ObjectPosition>,
    pub shape: Option<Shape>,
}

/// A loading/error indicator layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub content: Content,
    /// Localized label
    pub label: String,
}

/// The overlay layer. Always mounted when configured; `visible` only hides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayPlan {
    pub content: Content,
    pub visible: bool,
}

/// What to draw for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub effective_url: Option<String>,
    pub placeholder: Option<Content>,
    pub gallery_decoration: Option<Indicator>,
    pub image: Option<ImagePlan>,
    pub loading_indicator: Option<Indicator>,
    pub error_indicator: Option<Indicator>,
    pub overlay: Option<OverlayPlan>,
}

impl RenderPlan {
    pub fn show_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    pub fn show_gallery_decoration(&self) -> bool {
        self.gallery_decoration.is_some()
    }

    pub fn show_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn source_mode(&self) -> Option<&SourceMode> {
        self.image.as_ref().map(|image| &image.source_mode)
    }

    pub fn show_loading_indicator(&self) -> bool {
        self.loading_indicator.is_some()
    }

    pub fn show_error_indicator(&self) -> bool {
        self.error_indicator.is_some()
    }

    /// Whether the overlay is configured and currently visible.
    pub fn overlay_visible(&self) -> bool {
        self.overlay.as_ref().is_some_and(|overlay| overlay.visible)
    }
}

/// Everything the composer reads.
#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    pub props: &'a ImageProps,
    pub provider: &'a ConfigProvider,
    pub visibility: VisibilityState,
    pub load_state: LoadState,
    pub source: &'a EffectiveSource,
    /// The fallback replaced the primary source
    pub on_fallback: bool,
    pub overlay_visible: bool,
}

/// Compose the render plan.
pub fn compose(input: &ComposeInput<'_>) -> RenderPlan {
    let ComposeInput {
        props,
        provider,
        visibility,
        load_state,
        source,
        on_fallback,
        overlay_visible,
    } = *input;
    let icons = provider.icons();

    let errored = load_state == LoadState::Errored;
    let image = (visibility == VisibilityState::Ready && !errored)
        .then(|| source_mode(props, source, on_fallback))
        .flatten()
        .map(|source_mode| ImagePlan {
            source_mode,
            alt: props.alt.clone(),
            fit: props.fit,
            position: props.position,
            shape: props.shape,
        });

    let loading_indicator = (image.is_some() && load_state != LoadState::Loaded).then(|| Indicator {
        content: props.loading_content.clone().unwrap_or_else(|| icons.loading()),
        label: provider.t(KEY_LOADING),
    });

    let error_indicator = errored.then(|| Indicator {
        content: props.error_content.clone().unwrap_or_else(|| icons.error()),
        label: provider.t(KEY_LOAD_FAILED),
    });

    let gallery_decoration = props.gallery.then(|| Indicator {
        content: icons.gallery(),
        label: provider.t(KEY_GALLERY),
    });

    let overlay = props.overlay_content.clone().map(|content| OverlayPlan {
        content,
        visible: overlay_visible,
    });

    RenderPlan {
        effective_url: source.url().map(str::to_string),
        placeholder: props.placeholder_content.clone(),
        gallery_decoration,
        image,
        loading_indicator,
        error_indicator,
        overlay,
    }
}

/// Source mode for the image layer, or `None` when there is nothing to request.
///
/// The source set belongs to the primary source, so once the fallback has been
/// substituted the image is a plain single URL. A source set without a plain
/// URL has no trailing single entry.
fn source_mode(props: &ImageProps, source: &EffectiveSource, on_fallback: bool) -> Option<SourceMode> {
    let url = source.url().map(str::to_string);
    if props.source_alternatives.is_empty() || on_fallback {
        return url.map(|url| SourceMode::Single { url });
    }

    let sources = props
        .source_alternatives
        .iter()
        .map(|alt| SourceEntry {
            media_type: Some(alt.media_type.clone()),
            url: alt.url.clone(),
        })
        .chain(url.map(|url| SourceEntry {
            media_type: None,
            url,
        }))
        .collect();
    Some(SourceMode::Multi { sources })
}
