//! Atomic Layer: Normalized scroll events
//!
//! Positions and deltas are in pixels, timestamps in milliseconds and
//! velocity in pixels per millisecond. A positive delta means the content
//! moved toward its end ("down").

use serde::{Deserialize, Serialize};

/// One normalized scroll sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrollEvent {
    /// Container is scrolled to its origin (or has no content)
    AtTop { timestamp: i64 },
    /// No net movement since the previous sample
    Idle { position: i64, timestamp: i64 },
    /// Net movement since the previous sample
    Scrolling {
        position: i64,
        delta: i64,
        timestamp: i64,
        velocity: f64,
    },
}

impl ScrollEvent {
    /// Build a `Scrolling` event, deriving velocity from the elapsed time
    ///
    /// Velocity is `0.0` when `elapsed_ms` is zero or negative.
    pub fn scrolling(position: i64, delta: i64, timestamp: i64, elapsed_ms: i64) -> Self {
        let velocity = if elapsed_ms > 0 {
            delta as f64 / elapsed_ms as f64
        } else {
            0.0
        };
        ScrollEvent::Scrolling {
            position,
            delta,
            timestamp,
            velocity,
        }
    }

    #[inline]
    pub fn timestamp(&self) -> i64 {
        match *self {
            ScrollEvent::AtTop { timestamp }
            | ScrollEvent::Idle { timestamp, .. }
            | ScrollEvent::Scrolling { timestamp, .. } => timestamp,
        }
    }

    /// Scroll position carried by the event (`0` for `AtTop`)
    #[inline]
    pub fn position(&self) -> i64 {
        match *self {
            ScrollEvent::AtTop { .. } => 0,
            ScrollEvent::Idle { position, .. } | ScrollEvent::Scrolling { position, .. } => {
                position
            }
        }
    }

    #[inline]
    pub fn delta(&self) -> i64 {
        match *self {
            ScrollEvent::Scrolling { delta, .. } => delta,
            _ => 0,
        }
    }

    /// Short label used in logs and trace output
    pub fn label(&self) -> &'static str {
        match self {
            ScrollEvent::AtTop { .. } => "at_top",
            ScrollEvent::Idle { .. } => "idle",
            ScrollEvent::Scrolling { .. } => "scrolling",
        }
    }
}
