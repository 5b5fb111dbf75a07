//! DOM-backed intersection observer (WASM only)
//!
//! Wraps `window.IntersectionObserver`. The browser invokes the JS callback on
//! its own schedule, so reports are queued and the host drains them with
//! [`DomIntersectionObserver::take_intersections`] from its dispatch loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserverEntry, IntersectionObserverInit};

use crate::element::ElementId;
use crate::intersection::{Intersection, IntersectionObserver, ObserveOptions};

type EntriesCallback = Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>;

struct ActiveObserver {
    observer: web_sys::IntersectionObserver,
    /// Closure stored to prevent deallocation
    _callback: EntriesCallback,
}

/// Intersection capability backed by the browser.
#[derive(Default)]
pub struct DomIntersectionObserver {
    /// DOM nodes the host has bound to element ids
    elements: HashMap<ElementId, Element>,
    /// One native observer per target, since options are per target
    active: HashMap<ElementId, ActiveObserver>,
    /// Reports queued by the JS callbacks
    queue: Rc<RefCell<Vec<Intersection>>>,
}

impl DomIntersectionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a DOM node with an element id so it can be observed.
    pub fn bind(&mut self, id: ElementId, element: Element) {
        self.elements.insert(id, element);
    }

    /// Forget a DOM node, disconnecting any observer on it.
    pub fn unbind(&mut self, id: ElementId) {
        self.unobserve(id);
        self.elements.remove(&id);
    }

    /// Drain reports queued since the last call.
    pub fn take_intersections(&mut self) -> Vec<Intersection> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

impl IntersectionObserver for DomIntersectionObserver {
    fn observe(&mut self, target: ElementId, options: ObserveOptions) {
        let Some(element) = self.elements.get(&target) else {
            log::warn!("Cannot observe {}: no DOM node bound", target);
            return;
        };

        let queue = Rc::clone(&self.queue);
        let callback: EntriesCallback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let ratio = entry.intersection_ratio() as f32;
                    if entry.is_intersecting() && ratio >= options.threshold {
                        queue.borrow_mut().push(Intersection::new(target, ratio));
                    }
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin.to_string());
        init.set_threshold(&JsValue::from_f64(f64::from(options.threshold)));

        match web_sys::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        ) {
            Ok(observer) => {
                observer.observe(element);
                if let Some(previous) = self.active.insert(
                    target,
                    ActiveObserver {
                        observer,
                        _callback: callback,
                    },
                ) {
                    previous.observer.disconnect();
                }
            }
            Err(e) => log::error!("Failed to create IntersectionObserver: {:?}", e),
        }
    }

    fn unobserve(&mut self, target: ElementId) {
        if let Some(active) = self.active.remove(&target) {
            active.observer.disconnect();
        }
    }
}
