//! Viewport intersection capability.
//!
//! Widgets that defer work until they are on screen register their root element
//! with an [`IntersectionObserver`]. Registrations are owned: an [`Observation`]
//! unobserves its target when dropped, so a widget that goes away can never leak
//! a registration.
//!
//! The capability reports intersections as [`Intersection`] values which the host
//! feeds back into its dispatch loop as [`crate::Event::Intersected`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::element::ElementId;
use crate::layout::Rectangle;

/// Errors produced when parsing a CSS-like root margin.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarginParseError {
    /// No values were given
    #[error("root margin is empty")]
    Empty,

    /// More than four values were given
    #[error("root margin takes 1 to 4 values, found {count}")]
    TooManyValues {
        /// Number of values found
        count: usize,
    },

    /// A value was not `<number>px`, `<number>%` or `0`
    #[error("invalid margin value '{value}': expected pixels (e.g. 10px) or a percentage (e.g. 5%)")]
    InvalidValue {
        /// The offending token
        value: String,
    },
}

/// One edge of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    /// Absolute offset in pixels
    Px(f32),
    /// Offset relative to the root's extent along the same axis
    Percent(f32),
}

impl MarginValue {
    /// Resolve to pixels against the root extent (width for left/right, height for top/bottom).
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            MarginValue::Px(px) => px,
            MarginValue::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl FromStr for MarginValue {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MarginParseError::InvalidValue {
            value: s.to_string(),
        };
        let number = |digits: &str| digits.parse::<f32>().ok().filter(|v| v.is_finite());

        if let Some(digits) = s.strip_suffix("px") {
            number(digits).map(MarginValue::Px).ok_or_else(invalid)
        } else if let Some(digits) = s.strip_suffix('%') {
            number(digits).map(MarginValue::Percent).ok_or_else(invalid)
        } else if number(s) == Some(0.0) {
            Ok(MarginValue::Px(0.0))
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginValue::Px(px) => write!(f, "{}px", px),
            MarginValue::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

/// Margin grown around the viewport before testing intersection.
///
/// Parsed from CSS shorthand: `"200px"`, `"10px 20px"`, `"1px 2px 3px"` or
/// `"1px 2px 3px 4px"` (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin::uniform(MarginValue::Px(0.0));

    pub const fn uniform(value: MarginValue) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Grow `root` by this margin.
    pub fn apply(&self, root: Rectangle) -> Rectangle {
        root.expand(
            self.top.resolve(root.height),
            self.right.resolve(root.width),
            self.bottom.resolve(root.height),
            self.left.resolve(root.width),
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for RootMargin {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(str::parse::<MarginValue>)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [] => Err(MarginParseError::Empty),
            [all] => Ok(Self::uniform(*all)),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(MarginParseError::TooManyValues {
                count: values.len(),
            }),
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl Serialize for RootMargin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RootMargin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How a target is observed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObserveOptions {
    pub root_margin: RootMargin,
    /// Visible ratio that must be reached; `0.0` means any overlap.
    pub threshold: f32,
}

impl ObserveOptions {
    pub fn new(root_margin: RootMargin, threshold: f32) -> Self {
        Self {
            root_margin,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Whether a visible ratio counts as "entered the viewport".
    pub fn is_satisfied_by(&self, ratio: f32) -> bool {
        if self.threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }
}

/// A target crossing into its visible threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub target: ElementId,
    pub ratio: f32,
}

impl Intersection {
    pub fn new(target: ElementId, ratio: f32) -> Self {
        Self { target, ratio }
    }
}

/// The "tell me when this element enters the viewport" capability.
///
/// Implementations report each target at most once per crossing; callers wanting
/// one-shot semantics unobserve after the first report.
pub trait IntersectionObserver {
    /// Start observing `target`.
    fn observe(&mut self, target: ElementId, options: ObserveOptions);

    /// Stop observing `target`. Unknown targets are ignored.
    fn unobserve(&mut self, target: ElementId);
}

/// Observer shared between the host and the widgets it creates.
pub type SharedObserver = Rc<RefCell<dyn IntersectionObserver>>;

/// An owned observation registration, released on drop.
pub struct Observation {
    observer: SharedObserver,
    target: ElementId,
}

impl Observation {
    /// Register `target` with `observer`.
    ///
    /// Returns `None` if the observer is busy (already mutably borrowed), in
    /// which case the caller should retry on its next pass.
    pub fn acquire(
        observer: &SharedObserver,
        target: ElementId,
        options: ObserveOptions,
    ) -> Option<Self> {
        match observer.try_borrow_mut() {
            Ok(mut obs) => obs.observe(target, options),
            Err(_) => {
                log::warn!("Intersection observer busy, deferring observation of {}", target);
                return None;
            }
        }
        log::trace!("Observing {} (margin {})", target, options.root_margin);
        Some(Self {
            observer: Rc::clone(observer),
            target,
        })
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Whether this registration was made with `observer`.
    pub fn is_with(&self, observer: &SharedObserver) -> bool {
        Rc::ptr_eq(&self.observer, observer)
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        match self.observer.try_borrow_mut() {
            Ok(mut obs) => {
                obs.unobserve(self.target);
                log::trace!("Released observation of {}", self.target);
            }
            Err(_) => log::warn!(
                "Intersection observer busy, could not unobserve {}",
                self.target
            ),
        }
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
