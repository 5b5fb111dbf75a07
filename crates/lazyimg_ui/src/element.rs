//! Element identities and the stable root handle exposed to callers

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a node in the host's visual tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an id assigned by the host.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stable, shareable reference to a component's root node.
///
/// The handle exists before the node does: hosts attach an [`ElementId`] once
/// the node is created and detach it when the node goes away. Clones share the
/// same slot, so a handle given out early observes later attachment.
#[derive(Clone, Default)]
pub struct ElementRef {
    slot: Rc<Cell<Option<ElementId>>>,
}

impl ElementRef {
    /// Create an unattached reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reference already attached to `id`.
    pub fn attached(id: ElementId) -> Self {
        let element = Self::new();
        element.attach(id);
        element
    }

    pub fn attach(&self, id: ElementId) {
        self.slot.set(Some(id));
    }

    pub fn detach(&self) {
        self.slot.set(None);
    }

    /// The attached node, if any.
    pub fn get(&self) -> Option<ElementId> {
        self.slot.get()
    }

    pub fn is_attached(&self) -> bool {
        self.get().is_some()
    }

    /// Whether both handles share the same slot.
    pub fn same(&self, other: &ElementRef) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementRef").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = ElementId::next();
        let b = ElementId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_clones_share_attachment() {
        let root = ElementRef::new();
        let handle = root.clone();
        assert!(!handle.is_attached());

        let id = ElementId::from_raw(7);
        root.attach(id);
        assert_eq!(handle.get(), Some(id));
        assert!(handle.same(&root));

        root.detach();
        assert_eq!(handle.get(), None);
    }
}
