//! Image load state machine.
//!
//! Owns the effective source together with its load state so the two can never
//! be observed out of step: every accepted source change resets the state in
//! the same call.
//!
//! ```text
//!               source change
//!      ┌─────────────────────────────┐
//!      ▼                             │
//! NOT_STARTED ──loaded──▶ LOADED ────┤
//!      │                             │
//!      ├──failed, fallback unused──▶ NOT_STARTED (fallback source)
//!      │
//!      └──failed──▶ ERRORED ─────────┘
//!                     │
//!                     └──preview resolved──▶ NOT_STARTED
//! ```

use std::time::Duration;

use serde::Serialize;
use web_time::Instant;

use crate::source::{is_redundant, EffectiveSource};

/// Progress of the current effective source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    NotStarted,
    Loaded,
    Errored,
}

/// Result of a failure notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Not accepted in the current state
    Ignored,
    /// The fallback replaced the failed source and is now pending
    Substituted { failed: EffectiveSource },
    /// No fallback left; the error is durable
    Terminal,
}

impl FailureOutcome {
    /// Whether the notification counted as a failure (and should be reported).
    pub fn is_failure(&self) -> bool {
        !matches!(self, FailureOutcome::Ignored)
    }
}

/// Source + load state for one image.
#[derive(Debug, Clone)]
pub struct LoadStateMachine {
    source: EffectiveSource,
    state: LoadState,
    fallback: Option<String>,
    /// Whether `source` is the substituted fallback
    on_fallback: bool,
    /// When the current source became eligible for loading
    requested_at: Option<Instant>,
}

impl LoadStateMachine {
    pub fn new(source: EffectiveSource, fallback: Option<String>) -> Self {
        Self {
            source,
            state: LoadState::NotStarted,
            fallback: fallback.filter(|url| !url.is_empty()),
            on_fallback: false,
            requested_at: None,
        }
    }

    pub fn source(&self) -> &EffectiveSource {
        &self.source
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn is_on_fallback(&self) -> bool {
        self.on_fallback
    }

    /// Replace the source and restart loading.
    ///
    /// Returns `false` (and changes nothing) when `next` equals the current
    /// non-empty source.
    pub fn set_source(&mut self, next: EffectiveSource) -> bool {
        if is_redundant(&self.source, &next) {
            log::trace!("Source {} unchanged, keeping {:?}", next, self.state);
            return false;
        }
        log::debug!("🖼️ Source changed {} -> {}", self.source, next);
        self.source = next;
        self.on_fallback = false;
        self.reset();
        true
    }

    /// Replace the configured fallback.
    ///
    /// While the fallback is being shown, a new fallback URL is treated as an
    /// ordinary source change. Returns whether the source changed.
    pub fn set_fallback(&mut self, fallback: Option<String>) -> bool {
        let fallback = fallback.filter(|url| !url.is_empty());
        if self.fallback == fallback {
            return false;
        }
        self.fallback = fallback;

        match (&self.fallback, self.on_fallback) {
            (Some(url), true) if !self.source.matches(url) => {
                let next = EffectiveSource::new(url.clone());
                log::debug!("🖼️ Fallback changed while displayed, switching to {}", next);
                self.source = next;
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Record that the current request may now start.
    pub fn mark_requested(&mut self) {
        if self.state == LoadState::NotStarted && self.requested_at.is_none() {
            self.requested_at = Some(Instant::now());
        }
    }

    /// Time since the current source became requestable.
    pub fn elapsed(&self) -> Option<Duration> {
        self.requested_at.map(|at| at.elapsed())
    }

    /// Success notification. Returns whether it was accepted.
    pub fn on_loaded(&mut self) -> bool {
        if self.state != LoadState::NotStarted {
            log::debug!("Ignoring load notification in state {:?}", self.state);
            return false;
        }
        self.state = LoadState::Loaded;
        true
    }

    /// Failure notification.
    ///
    /// The first failure with a usable fallback substitutes the fallback and
    /// goes straight back to NOT_STARTED; any later failure is terminal.
    pub fn on_failed(&mut self) -> FailureOutcome {
        if self.state != LoadState::NotStarted {
            log::debug!("Ignoring failure notification in state {:?}", self.state);
            return FailureOutcome::Ignored;
        }

        match self.fallback.clone() {
            Some(fallback) if !self.on_fallback => {
                let failed = std::mem::replace(&mut self.source, EffectiveSource::new(fallback));
                self.on_fallback = true;
                self.reset();
                FailureOutcome::Substituted { failed }
            }
            _ => {
                self.state = LoadState::Errored;
                self.requested_at = None;
                FailureOutcome::Terminal
            }
        }
    }

    /// A preview/alternate representation became available.
    ///
    /// Only meaningful while ERRORED: retries with `preview` (or the current
    /// source when `preview` is empty or identical). Returns whether it retried.
    pub fn clear_error(&mut self, preview: EffectiveSource) -> bool {
        if self.state != LoadState::Errored {
            return false;
        }
        if !preview.is_empty() && preview != self.source {
            log::debug!("🖼️ Preview resolved, retrying with {}", preview);
            self.source = preview;
            self.on_fallback = false;
        } else {
            log::debug!("🖼️ Preview resolved, retrying {}", self.source);
        }
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.state = LoadState::NotStarted;
        self.requested_at = None;
    }
}
