//! Overlay layer visibility.
//!
//! The overlay (e.g. a "preview" mask on gallery thumbnails) is either always
//! visible or only visible while the pointer hovers the root container. Overlay
//! content stays mounted in both modes; this only tracks visibility.

use lazyimg_ui::Event;
use serde::{Deserialize, Serialize};

/// When the overlay layer is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayTrigger {
    /// Permanently visible; pointer events are not wired
    #[default]
    Always,
    /// Visible only between pointer enter and pointer leave
    Hover,
}

/// Tracks overlay visibility for one component.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayController {
    trigger: OverlayTrigger,
    visible: bool,
}

impl OverlayController {
    pub fn new(trigger: OverlayTrigger) -> Self {
        Self {
            trigger,
            visible: trigger == OverlayTrigger::Always,
        }
    }

    pub fn trigger(&self) -> OverlayTrigger {
        self.trigger
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the host should route pointer enter/leave to this controller.
    pub fn wires_pointer_events(&self) -> bool {
        self.trigger == OverlayTrigger::Hover
    }

    /// Set visibility. Ignored unless hover-gated. Returns whether it changed.
    pub fn toggle(&mut self, visible: bool) -> bool {
        if !self.wires_pointer_events() || self.visible == visible {
            return false;
        }
        self.visible = visible;
        true
    }

    /// Apply a pointer event. Returns whether visibility changed.
    pub fn on_event(&mut self, event: &Event) -> bool {
        match event {
            Event::PointerEntered => self.toggle(true),
            Event::PointerLeft => self.toggle(false),
            _ => false,
        }
    }

    /// Switch policy. Hover mode starts hidden; always mode is visible.
    pub fn set_trigger(&mut self, trigger: OverlayTrigger) {
        if self.trigger != trigger {
            *self = Self::new(trigger);
        }
    }
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new(OverlayTrigger::default())
    }
}
