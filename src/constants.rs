//! Centralized constants for lazyimg

// =============================================================================
// Loading policy
// =============================================================================

/// Whether images defer loading until visible when `lazy` is not set.
pub const DEFAULT_LAZY: bool = true;

/// Default visible ratio for lazy loading (any overlap).
pub const DEFAULT_THRESHOLD: f32 = 0.0;

// =============================================================================
// Localization keys
// =============================================================================

/// Label for the loading indicator.
pub const KEY_LOADING: &str = "image.loading";

/// Label for the error indicator.
pub const KEY_LOAD_FAILED: &str = "image.load_failed";

/// Label for the gallery decoration.
pub const KEY_GALLERY: &str = "image.gallery";

/// Built-in English messages, overridable through configuration.
pub const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    (KEY_LOADING, "Loading"),
    (KEY_LOAD_FAILED, "Image failed to load"),
    (KEY_GALLERY, "Gallery"),
];

// =============================================================================
// Demo host
// =============================================================================

/// Network settle rounds per frame (primary attempt, fallback attempt, slack).
pub const MAX_SETTLE_ROUNDS: usize = 3;
