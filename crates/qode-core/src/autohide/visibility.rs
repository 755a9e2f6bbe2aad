//! Molecular Layer: Visibility latch
//!
//! Latches engine decisions into a Visible/Hidden state. `Maintain` never
//! changes anything and repeating the current decision is a no-op, so
//! observers only hear about actual flips.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::engine::Decision;

const INITIAL_REASON: &str = "Initial state";

/// Latched visibility of the auto-hiding element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VisibilityState {
    Visible { reason: String, timestamp: i64 },
    Hidden { reason: String, timestamp: i64 },
}

impl VisibilityState {
    #[inline]
    pub fn is_visible(&self) -> bool {
        matches!(self, VisibilityState::Visible { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            VisibilityState::Visible { reason, .. } | VisibilityState::Hidden { reason, .. } => {
                reason
            }
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            VisibilityState::Visible { timestamp, .. }
            | VisibilityState::Hidden { timestamp, .. } => *timestamp,
        }
    }
}

/// Marker for a Visible/Hidden flip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityTransition {
    pub from_visible: bool,
    pub to_visible: bool,
    pub reason: String,
    pub timestamp: i64,
}

type Observer = Box<dyn FnMut(&VisibilityState) + Send>;

/// Visible/Hidden latch for one scrollable surface
pub struct VisibilityStateHolder {
    state: VisibilityState,
    observers: Vec<Observer>,
}

impl fmt::Debug for VisibilityStateHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityStateHolder")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for VisibilityStateHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityStateHolder {
    /// Start visible with reason "Initial state"
    pub fn new() -> Self {
        Self {
            state: VisibilityState::Visible {
                reason: INITIAL_REASON.to_string(),
                timestamp: 0,
            },
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Register an observer called on every Visible/Hidden flip
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&VisibilityState) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Apply a decision; returns the transition if the state flipped
    pub fn update(&mut self, decision: &Decision, timestamp: i64) -> Option<VisibilityTransition> {
        let target = match decision {
            Decision::Show(_) => true,
            Decision::Hide(_) => false,
            Decision::Maintain(_) => return None,
        };
        if target == self.is_visible() {
            return None;
        }
        Some(self.transition_to(target, decision.reason(), timestamp))
    }

    /// Force visible, e.g. when the observed scroll source changes
    ///
    /// The state is always replaced; observers are notified only if the
    /// element was hidden.
    pub fn reset(&mut self, reason: &str, timestamp: i64) -> Option<VisibilityTransition> {
        if self.is_visible() {
            self.state = VisibilityState::Visible {
                reason: reason.to_string(),
                timestamp,
            };
            None
        } else {
            Some(self.transition_to(true, reason, timestamp))
        }
    }

    fn transition_to(&mut self, visible: bool, reason: &str, timestamp: i64) -> VisibilityTransition {
        let from_visible = self.is_visible();
        self.state = if visible {
            VisibilityState::Visible {
                reason: reason.to_string(),
                timestamp,
            }
        } else {
            VisibilityState::Hidden {
                reason: reason.to_string(),
                timestamp,
            }
        };

        tracing::debug!(
            visible,
            reason,
            timestamp,
            "Auto-hide visibility changed"
        );

        for observer in &mut self.observers {
            observer(&self.state);
        }

        VisibilityTransition {
            from_visible,
            to_visible: visible,
            reason: reason.to_string(),
            timestamp,
        }
    }
}
