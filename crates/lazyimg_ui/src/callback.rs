//! Callback abstractions for component event handlers
//!
//! Components expose optional handlers (`on_load`, `on_error`, ...) that turn an
//! event payload into an application message. `Callback<T, M>` wraps that
//! `Option<Box<dyn Fn(T) -> M>>` pattern so components don't repeat it.
//!
//! `Hook<A, R>` is the other shape: a shared, externally supplied function whose
//! *identity* matters. Components re-run derived computations when a hook is
//! swapped for a different one, so hooks compare by pointer, not by behavior.
//!
//! # Examples
//!
//! ```
//! use lazyimg_ui::{Callback, Hook};
//!
//! let on_change: Callback<u32, String> = Callback::new(|n| format!("changed to {n}"));
//! assert_eq!(on_change.call(3).as_deref(), Some("changed to 3"));
//!
//! let hook: Hook<str, usize> = Hook::new(|s: &str| s.len());
//! let same = hook.clone();
//! assert!(hook.same(&same));
//! assert_eq!(hook.call("abc"), 3);
//! ```

use std::fmt;
use std::rc::Rc;

/// An optional event handler producing a message.
///
/// # Type Parameters
///
/// - `T`: The event payload passed to the handler
/// - `M`: The message type returned by the handler
pub struct Callback<T, M> {
    f: Option<Box<dyn Fn(T) -> M>>,
}

impl<T, M> Callback<T, M> {
    /// Create a new callback from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(T) -> M + 'static,
    {
        Self {
            f: Some(Box::new(f)),
        }
    }

    /// Create an empty callback (no handler).
    pub fn none() -> Self {
        Self { f: None }
    }

    /// Call the callback with a value, if it exists.
    ///
    /// Returns `Some(message)` if a handler is set, `None` otherwise.
    pub fn call(&self, value: T) -> Option<M> {
        self.f.as_ref().map(|f| f(value))
    }

    /// Check if the callback is set.
    pub fn is_some(&self) -> bool {
        self.f.is_some()
    }

    /// Check if the callback is not set.
    pub fn is_none(&self) -> bool {
        self.f.is_none()
    }
}

impl<T, M> Default for Callback<T, M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T, M> fmt::Debug for Callback<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("set", &self.is_some())
            .finish()
    }
}

/// A shared function compared by identity.
///
/// Cloning a hook yields the *same* hook; wrapping the same closure twice with
/// [`Hook::new`] yields two different hooks.
pub struct Hook<A: ?Sized, R> {
    f: Rc<dyn Fn(&A) -> R>,
}

impl<A: ?Sized, R> Hook<A, R> {
    /// Wrap a function in a new hook identity.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&A) -> R + 'static,
    {
        Self { f: Rc::new(f) }
    }

    /// Invoke the hook.
    pub fn call(&self, arg: &A) -> R {
        (self.f)(arg)
    }

    /// Whether both handles point at the same hook.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl<A: ?Sized, R> Clone for Hook<A, R> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<A: ?Sized, R> fmt::Debug for Hook<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("ptr", &Rc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_none_returns_none() {
        let cb: Callback<i32, i32> = Callback::none();
        assert!(cb.is_none());
        assert_eq!(cb.call(5), None);
    }

    #[test]
    fn test_callback_maps_value() {
        let cb = Callback::new(|v: i32| v * 2);
        assert!(cb.is_some());
        assert_eq!(cb.call(21), Some(42));
    }

    #[test]
    fn test_hook_identity() {
        let a: Hook<str, String> = Hook::new(|s: &str| s.to_uppercase());
        let b: Hook<str, String> = Hook::new(|s: &str| s.to_uppercase());
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b), "separately wrapped closures are different hooks");
        assert_eq!(a.call("x"), b.call("x"));
    }
}
