//! Effective source resolution.
//!
//! Computes the single URL an image should request from its props and an
//! optional rewrite hook. Resolution is pure; [`SourceResolver`] only remembers
//! the inputs of the last resolution so unchanged inputs are not re-resolved.

use std::fmt;

use lazyimg_ui::Hook;
use serde::Serialize;

use crate::props::ImageProps;

/// Externally supplied source rewrite, called with the full property set.
pub type RewriteHook = Hook<ImageProps, String>;

/// The URL currently requested, or none.
///
/// Empty strings are normalized to none so "no source" has one representation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct EffectiveSource(Option<String>);

impl EffectiveSource {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        if url.is_empty() { Self(None) } else { Self(Some(url)) }
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn url(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Whether `url` names this source.
    pub fn matches(&self, url: &str) -> bool {
        self.url() == Some(url)
    }
}

impl From<Option<String>> for EffectiveSource {
    fn from(url: Option<String>) -> Self {
        url.map(Self::new).unwrap_or_default()
    }
}

impl fmt::Display for EffectiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url().unwrap_or("<none>"))
    }
}

/// Resolve the effective source.
///
/// With a hook, the hook's result wins; otherwise the raw source is used verbatim.
pub fn resolve(raw: Option<&str>, hook: Option<&RewriteHook>, props: &ImageProps) -> EffectiveSource {
    match hook {
        Some(hook) => EffectiveSource::new(hook.call(props)),
        None => raw.map(EffectiveSource::new).unwrap_or_default(),
    }
}

/// Whether moving from `current` to `next` would be a redundant reload.
pub fn is_redundant(current: &EffectiveSource, next: &EffectiveSource) -> bool {
    !next.is_empty() && current == next
}

/// Inputs of the last resolution.
#[derive(Debug)]
struct ResolveInputs {
    raw: Option<String>,
    hook: Option<RewriteHook>,
    /// Only tracked when a hook depends on them
    props: Option<ImageProps>,
}

impl ResolveInputs {
    fn capture(props: &ImageProps, hook: Option<&RewriteHook>) -> Self {
        Self {
            raw: props.source.clone(),
            hook: hook.cloned(),
            props: hook.map(|_| props.clone()),
        }
    }

    fn matches(&self, props: &ImageProps, hook: Option<&RewriteHook>) -> bool {
        let same_hook = match (&self.hook, hook) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same(b),
            _ => false,
        };
        same_hook
            && self.raw == props.source
            && self.props.as_ref().is_none_or(|last| last == props)
    }
}

/// Re-resolves only when the raw source, hook identity, or (with a hook) the
/// property bag changed.
#[derive(Debug, Default)]
pub struct SourceResolver {
    last: Option<ResolveInputs>,
}

impl SourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve if inputs changed since the last call; `None` means unchanged.
    pub fn update(&mut self, props: &ImageProps, hook: Option<&RewriteHook>) -> Option<EffectiveSource> {
        if self
            .last
            .as_ref()
            .is_some_and(|last| last.matches(props, hook))
        {
            return None;
        }

        let unknown = props.source_alternatives.unknown_media_types();
        if !unknown.is_empty() {
            log::warn!("🖼️ Source set has unrecognized media types: {:?}", unknown);
        }

        self.last = Some(ResolveInputs::capture(props, hook));
        let source = resolve(props.source.as_deref(), hook, props);
        log::trace!("Resolved effective source: {}", source);
        Some(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_raw_without_hook() {
        let props = ImageProps::new("a.jpg");
        assert_eq!(resolve(Some("a.jpg"), None, &props), EffectiveSource::new("a.jpg"));
        assert!(resolve(None, None, &props).is_empty());
        assert!(resolve(Some(""), None, &props).is_empty());
    }

    #[test]
    fn test_resolve_prefers_hook() {
        let hook: RewriteHook = Hook::new(|p: &ImageProps| {
            format!("https://cdn.example/{}", p.source.as_deref().unwrap_or_default())
        });
        let props = ImageProps::new("a.jpg");
        assert_eq!(
            resolve(Some("a.jpg"), Some(&hook), &props).url(),
            Some("https://cdn.example/a.jpg")
        );
    }

    #[test]
    fn test_redundant_only_for_equal_non_empty() {
        let a = EffectiveSource::new("a.jpg");
        assert!(is_redundant(&a, &a.clone()));
        assert!(!is_redundant(&a, &EffectiveSource::new("b.jpg")));
        assert!(!is_redundant(&EffectiveSource::none(), &EffectiveSource::none()));
    }

    #[test]
    fn test_resolver_skips_unchanged_inputs() {
        let mut resolver = SourceResolver::new();
        let props = ImageProps::new("a.jpg");
        assert_eq!(resolver.update(&props, None), Some(EffectiveSource::new("a.jpg")));
        assert_eq!(resolver.update(&props, None), None);

        // Without a hook, unrelated props don't matter
        let relabeled = props.clone().with_alt("a cat");
        assert_eq!(resolver.update(&relabeled, None), None);

        let moved = ImageProps::new("b.jpg");
        assert_eq!(resolver.update(&moved, None), Some(EffectiveSource::new("b.jpg")));
    }

    #[test]
    fn test_resolver_tracks_hook_identity_and_props() {
        let mut resolver = SourceResolver::new();
        let hook: RewriteHook = Hook::new(|p: &ImageProps| {
            format!("{}?alt={}", p.source.as_deref().unwrap_or_default(), p.alt.as_deref().unwrap_or_default())
        });
        let props = ImageProps::new("a.jpg");

        assert!(resolver.update(&props, Some(&hook)).is_some());
        assert!(resolver.update(&props, Some(&hook.clone())).is_none());

        // With a hook, the whole bag is an input
        let relabeled = props.clone().with_alt("x");
        assert_eq!(
            resolver.update(&relabeled, Some(&hook)).and_then(|s| s.url().map(str::to_owned)),
            Some("a.jpg?alt=x".to_string())
        );

        // A different hook identity re-resolves even with equal behavior
        let other: RewriteHook = Hook::new(|p: &ImageProps| p.source.clone().unwrap_or_default());
        assert!(resolver.update(&relabeled, Some(&other)).is_some());
        assert!(resolver.update(&relabeled, None).is_some());
    }
}
