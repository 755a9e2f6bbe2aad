//! Scroll-driven auto-hiding for floating navigation chrome
//!
//! Turns raw scroll-container samples into a show/hide latch for a bottom bar
//! (or any element that should get out of the way while content scrolls).
//!
//! # Architecture
//!
//! ## Atomic Layer
//! - `event` - Normalized scroll events
//! - `policy` - Policy configuration, thresholds and presets
//! - `extractor` - Container snapshot to `ScrollEvent` normalization
//!
//! ## Molecular Layer
//! - `engine` - Decision engine evaluating events against a policy
//! - `visibility` - Visible/Hidden latch with change notifications
//!
//! ## Organism Layer
//! - `controller` - One extractor, engine and latch per scrollable surface
//!
//! # Usage
//!
//! ```ignore
//! use qode_core::autohide::{AutoHideController, ListExtractor, ListSnapshot, PolicyConfig};
//!
//! let mut controller = AutoHideController::new(ListExtractor::default(), PolicyConfig::default())?;
//!
//! // Every frame / scroll notification
//! let snapshot = ListSnapshot {
//!     first_visible_item_index: 4,
//!     first_visible_item_scroll_offset: 12,
//!     total_items_count: 80,
//! };
//! controller.on_sample(&snapshot, now_ms);
//!
//! if controller.is_visible() {
//!     // animate the bar in
//! }
//! ```

// Atomic Layer
pub mod event;
pub mod extractor;
pub mod policy;

// Molecular Layer
pub mod engine;
pub mod visibility;

// Organism Layer
pub mod controller;

pub use controller::{AutoHideController, AutoHideDebugInfo, Step};
pub use engine::{AutoHidingEngine, Decision};
pub use event::ScrollEvent;
pub use extractor::{
    GridExtractor, GridSnapshot, ListExtractor, ListSnapshot, OffsetExtractor, OffsetSnapshot,
    ScrollSignalExtractor,
};
pub use policy::{Behavior, PolicyConfig, Sensitivity, Thresholds};
pub use visibility::{VisibilityState, VisibilityStateHolder, VisibilityTransition};
