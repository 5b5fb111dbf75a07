use crate::intersection::Intersection;

/// Events that widgets can respond to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer entered the widget's root container.
    PointerEntered,
    /// Pointer left the widget's root container.
    PointerLeft,
    /// An observed element crossed its intersection threshold.
    Intersected(Intersection),
}

impl Event {
    /// Whether this is a pointer enter/leave event.
    pub fn is_pointer(&self) -> bool {
        matches!(self, Event::PointerEntered | Event::PointerLeft)
    }
}

impl From<Intersection> for Event {
    fn from(intersection: Intersection) -> Self {
        Event::Intersected(intersection)
    }
}
