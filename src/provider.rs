//! Shared configuration provider.
//!
//! One `ConfigProvider` is shared (via `Rc`) by every image component of a host.
//! It carries the loaded [`ImageConfig`] and the external collaborators the
//! component consumes but does not own: localized text lookup, the icon set for
//! indicators, and the optional `replace_image_src` hook.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::config::ImageConfig;
use crate::constants::DEFAULT_MESSAGES;
use crate::props::Content;
use crate::source::RewriteHook;

/// Localized text lookup.
pub trait Localizer {
    /// Text for `key`. Unknown keys should return something displayable.
    fn t(&self, key: &str) -> String;
}

/// Built-in English messages plus configured overrides.
#[derive(Debug, Clone, Default)]
pub struct Locale {
    overrides: BTreeMap<String, String>,
}

impl Locale {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl Localizer for Locale {
    fn t(&self, key: &str) -> String {
        if let Some(text) = self.overrides.get(key) {
            return text.clone();
        }
        DEFAULT_MESSAGES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| (*text).to_string())
            .unwrap_or_else(|| {
                log::warn!("Missing localized message for '{}'", key);
                key.to_string()
            })
    }
}

/// Icons for the component's built-in decorations.
pub trait IconSet {
    fn loading(&self) -> Content;
    fn error(&self) -> Content;
    fn gallery(&self) -> Content;
}

/// Named icons, resolved by the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIcons;

impl IconSet for DefaultIcons {
    fn loading(&self) -> Content {
        Content::new("icon:spinner")
    }

    fn error(&self) -> Content {
        Content::new("icon:image-broken")
    }

    fn gallery(&self) -> Content {
        Content::new("icon:gallery")
    }
}

/// Configuration and collaborators shared by image components.
pub struct ConfigProvider {
    config: ImageConfig,
    localizer: Rc<dyn Localizer>,
    icons: Rc<dyn IconSet>,
    replace_image_src: Option<RewriteHook>,
}

impl ConfigProvider {
    /// Provider with the built-in locale (plus `config.locale` overrides) and icons.
    pub fn new(config: ImageConfig) -> Self {
        let localizer = Rc::new(Locale::new(config.locale.clone()));
        Self {
            config,
            localizer,
            icons: Rc::new(DefaultIcons),
            replace_image_src: None,
        }
    }

    pub fn with_localizer(mut self, localizer: Rc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    pub fn with_icons(mut self, icons: Rc<dyn IconSet>) -> Self {
        self.icons = icons;
        self
    }

    /// Rewrite every component's source through `hook`.
    pub fn with_replace_image_src(mut self, hook: RewriteHook) -> Self {
        self.replace_image_src = Some(hook);
        self
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn t(&self, key: &str) -> String {
        self.localizer.t(key)
    }

    pub fn icons(&self) -> &dyn IconSet {
        self.icons.as_ref()
    }

    pub fn replace_image_src(&self) -> Option<&RewriteHook> {
        self.replace_image_src.as_ref()
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new(ImageConfig::default())
    }
}

impl fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("config", &self.config)
            .field("replace_image_src", &self.replace_image_src.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{KEY_LOAD_FAILED, KEY_LOADING};

    #[test]
    fn test_builtin_messages() {
        let provider = ConfigProvider::default();
        assert_eq!(provider.t(KEY_LOADING), "Loading");
        assert_eq!(provider.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_config_overrides_win() {
        let mut config = ImageConfig::default();
        config
            .locale
            .insert(KEY_LOAD_FAILED.to_string(), "Échec du chargement".to_string());
        let provider = ConfigProvider::new(config);
        assert_eq!(provider.t(KEY_LOAD_FAILED), "Échec du chargement");
        assert_eq!(provider.t(KEY_LOADING), "Loading");
    }

    #[test]
    fn test_custom_collaborators() {
        struct Upper;
        impl Localizer for Upper {
            fn t(&self, key: &str) -> String {
                key.to_uppercase()
            }
        }

        let provider = ConfigProvider::default().with_localizer(Rc::new(Upper));
        assert_eq!(provider.t("a.b"), "A.B");
        assert_eq!(provider.icons().error(), Content::new("icon:image-broken"));
        assert!(provider.replace_image_src().is_none());
    }
}
