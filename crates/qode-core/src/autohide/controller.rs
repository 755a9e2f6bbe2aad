//! Organism Layer: Per-surface auto-hide controller
//!
//! Owns the extractor, engine and visibility latch for one scrollable
//! surface. Presentation code calls `on_sample` for every scroll tick and
//! reads `is_visible` to drive its show/hide animation.

use serde::Serialize;

use super::engine::{AutoHidingEngine, Decision};
use super::event::ScrollEvent;
use super::extractor::ScrollSignalExtractor;
use super::policy::PolicyConfig;
use super::visibility::{VisibilityState, VisibilityStateHolder, VisibilityTransition};
use crate::Result;

const SOURCE_CHANGED_REASON: &str = "Scroll source changed";

/// Result of feeding one sample through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub event: ScrollEvent,
    pub decision: Decision,
    pub transition: Option<VisibilityTransition>,
}

/// Snapshot of controller internals for diagnostics overlays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoHideDebugInfo {
    pub accumulated_distance: i64,
    pub last_scroll_position: Option<i64>,
    pub last_update_time: Option<i64>,
    pub is_visible: bool,
    pub config: PolicyConfig,
}

/// Extractor, engine and latch for one scrollable surface
#[derive(Debug)]
pub struct AutoHideController<X: ScrollSignalExtractor> {
    extractor: X,
    engine: AutoHidingEngine,
    visibility: VisibilityStateHolder,
    source: Option<String>,
    last_update_time: Option<i64>,
}

impl<X: ScrollSignalExtractor> AutoHideController<X> {
    pub fn new(extractor: X, config: PolicyConfig) -> Result<Self> {
        Ok(Self {
            extractor,
            engine: AutoHidingEngine::new(config)?,
            visibility: VisibilityStateHolder::new(),
            source: None,
            last_update_time: None,
        })
    }

    /// Sample the container and apply the resulting decision
    pub fn on_sample(&mut self, snapshot: &X::Snapshot, timestamp: i64) -> Step {
        let event = self.extractor.sample(snapshot, timestamp);
        self.on_event(event)
    }

    /// Apply an already-normalized event
    pub fn on_event(&mut self, event: ScrollEvent) -> Step {
        let timestamp = event.timestamp();
        let decision = self.engine.evaluate(&event);
        let transition = self.visibility.update(&decision, timestamp);
        self.last_update_time = Some(timestamp);
        Step {
            event,
            decision,
            transition,
        }
    }

    /// Switch to a different scroll source
    ///
    /// A new key clears the extractor and the accumulator and forces the
    /// element visible. Re-announcing the current key does nothing.
    pub fn set_source(&mut self, key: &str, timestamp: i64) -> Option<VisibilityTransition> {
        if self.source.as_deref() == Some(key) {
            return None;
        }
        tracing::debug!(
            from = self.source.as_deref().unwrap_or("<none>"),
            to = key,
            "Auto-hide scroll source changed"
        );
        self.source = Some(key.to_string());
        self.reset(SOURCE_CHANGED_REASON, timestamp)
    }

    /// Clear all per-surface state and force visible
    pub fn reset(&mut self, reason: &str, timestamp: i64) -> Option<VisibilityTransition> {
        self.extractor.reset();
        self.engine.reset();
        self.last_update_time = Some(timestamp);
        self.visibility.reset(reason, timestamp)
    }

    /// Register an observer on visibility flips
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&VisibilityState) + Send + 'static,
    {
        self.visibility.subscribe(observer);
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn state(&self) -> &VisibilityState {
        self.visibility.state()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn engine(&self) -> &AutoHidingEngine {
        &self.engine
    }

    pub fn debug_info(&self) -> AutoHideDebugInfo {
        AutoHideDebugInfo {
            accumulated_distance: self.engine.accumulated_distance(),
            last_scroll_position: self.extractor.last_position(),
            last_update_time: self.last_update_time,
            is_visible: self.visibility.is_visible(),
            config: *self.engine.config(),
        }
    }
}
