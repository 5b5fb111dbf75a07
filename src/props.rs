//! Image component properties.
//!
//! Props are plain data: they can be compared, cloned and loaded from JSON.
//! Handlers (`on_load`, `on_error`) and the source rewrite hook live on the
//! component itself since they are code, not data.

use serde::{Deserialize, Serialize};

use crate::overlay::OverlayTrigger;

/// Opaque renderable content (markup, icon name, label...).
///
/// The component never inspects content, it only decides *whether* and *where*
/// it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content(String);

impl Content {
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Content {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for Content {
    fn from(content: String) -> Self {
        Self(content)
    }
}

/// One format alternative in a source set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAlternative {
    /// MIME type, e.g. `image/webp`
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
}

/// Ordered MIME type -> URL mapping used for format negotiation.
///
/// Order is significant (the rendering agent picks the first supported type),
/// so this is a list rather than a map, serialized as `[{"type", "url"}, ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceSet(Vec<SourceAlternative>);

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(media type, url)` pairs, keeping their order.
    pub fn from_pairs<I, T, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        let mut set = Self::new();
        for (media_type, url) in pairs {
            set.insert(media_type, url);
        }
        set
    }

    /// Add an alternative. Re-inserting a media type replaces its URL in place.
    pub fn insert(&mut self, media_type: impl Into<String>, url: impl Into<String>) {
        let media_type = media_type.into();
        let url = url.into();
        match self.0.iter_mut().find(|alt| alt.media_type == media_type) {
            Some(existing) => existing.url = url,
            None => self.0.push(SourceAlternative { media_type, url }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceAlternative> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Media types the image crate does not recognize.
    pub fn unknown_media_types(&self) -> Vec<&str> {
        self.0
            .iter()
            .map(|alt| alt.media_type.as_str())
            .filter(|mime| image::ImageFormat::from_mime_type(mime).is_none())
            .collect()
    }
}

/// How the image fills its box (CSS `object-fit`), passed through opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFit {
    #[default]
    Fill,
    Contain,
    Cover,
    None,
    ScaleDown,
}

/// Where the image sits in its box (CSS `object-position`), passed through opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectPosition {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

/// Outline of the image frame, passed through opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Square,
    Rounded,
    Circle,
}

/// Properties of one image component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProps {
    /// Primary URL; required unless `source_alternatives` is given
    pub source: Option<String>,
    /// Format alternatives, tried by the rendering agent before `source`
    pub source_alternatives: SourceSet,
    /// URL substituted once after the primary source fails
    pub fallback_source: Option<String>,
    /// Defer loading until visible; `None` uses the configured default
    pub lazy: Option<bool>,
    /// Overlay policy; `None` uses the configured default
    pub overlay_trigger: Option<OverlayTrigger>,
    pub overlay_content: Option<Content>,
    pub placeholder_content: Option<Content>,
    pub loading_content: Option<Content>,
    pub error_content: Option<Content>,
    /// Mark the image as the cover of a gallery
    pub gallery: bool,
    pub alt: Option<String>,
    pub fit: Option<ObjectFit>,
    pub position: Option<ObjectPosition>,
    pub shape: Option<Shape>,
}

impl ImageProps {
    /// Props for a single source URL.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_source = Some(fallback.into());
        self
    }

    pub fn with_alternative(mut self, media_type: impl Into<String>, url: impl Into<String>) -> Self {
        self.source_alternatives.insert(media_type, url);
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }

    pub fn with_overlay(mut self, content: impl Into<Content>, trigger: OverlayTrigger) -> Self {
        self.overlay_content = Some(content.into());
        self.overlay_trigger = Some(trigger);
        self
    }

    pub fn with_placeholder(mut self, content: impl Into<Content>) -> Self {
        self.placeholder_content = Some(content.into());
        self
    }

    pub fn with_loading(mut self, content: impl Into<Content>) -> Self {
        self.loading_content = Some(content.into());
        self
    }

    pub fn with_error(mut self, content: impl Into<Content>) -> Self {
        self.error_content = Some(content.into());
        self
    }

    pub fn gallery(mut self, gallery: bool) -> Self {
        self.gallery = gallery;
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Fallback URL, ignoring empty strings.
    pub fn usable_fallback(&self) -> Option<&str> {
        self.fallback_source.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_set_keeps_insertion_order() {
        let set = SourceSet::from_pairs([("image/webp", "a.webp"), ("image/png", "a.png")]);
        let types: Vec<_> = set.iter().map(|alt| alt.media_type.as_str()).collect();
        assert_eq!(types, vec!["image/webp", "image/png"]);
    }

    #[test]
    fn test_source_set_insert_replaces_in_place() {
        let mut set = SourceSet::from_pairs([("image/webp", "a.webp"), ("image/png", "a.png")]);
        set.insert("image/webp", "b.webp");
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().map(|alt| alt.url.as_str()), Some("b.webp"));
    }

    #[test]
    fn test_unknown_media_types() {
        let set = SourceSet::from_pairs([("image/webp", "a.webp"), ("image/x-made-up", "a.xmu")]);
        assert_eq!(set.unknown_media_types(), vec!["image/x-made-up"]);
    }

    #[test]
    fn test_props_from_json() {
        let json = r#"{
            "source": "a.jpg",
            "source_alternatives": [
                {"type": "image/webp", "url": "a.webp"},
                {"type": "image/png", "url": "a.png"}
            ],
            "fallback_source": "fallback.png",
            "lazy": false,
            "overlay_trigger": "hover",
            "fit": "scale-down"
        }"#;
        let props: ImageProps = serde_json::from_str(json).unwrap();
        assert_eq!(props.source.as_deref(), Some("a.jpg"));
        assert_eq!(props.source_alternatives.len(), 2);
        assert_eq!(props.lazy, Some(false));
        assert_eq!(props.overlay_trigger, Some(OverlayTrigger::Hover));
        assert_eq!(props.fit, Some(ObjectFit::ScaleDown));
        assert!(!props.gallery);
    }

    #[test]
    fn test_empty_fallback_is_unusable() {
        let props = ImageProps::new("a.jpg").with_fallback("");
        assert_eq!(props.usable_fallback(), None);
    }
}
