//! Atomic Layer: Scroll signal extraction
//!
//! Converts a scroll container's instantaneous state into a `ScrollEvent`.
//! Each container shape gets its own extractor; they all share the same
//! `SampleTracker` state machine and differ only in how a snapshot maps to
//! a single pixel position.

use serde::{Deserialize, Serialize};

use super::event::ScrollEvent;

/// Row height assumed for index-virtualized containers (px)
pub const DEFAULT_ROW_HEIGHT: i64 = 100;

/// Normalizes container snapshots into scroll events
pub trait ScrollSignalExtractor {
    /// Raw container state sampled by the presentation layer
    type Snapshot;

    /// Produce exactly one event for this sample
    fn sample(&mut self, snapshot: &Self::Snapshot, timestamp: i64) -> ScrollEvent;

    /// Forget the previous sample (next sample is treated as the first)
    fn reset(&mut self);

    /// Last recorded position, if any
    fn last_position(&self) -> Option<i64>;
}

/// Previous-sample bookkeeping shared by all extractors
#[derive(Debug, Clone, Default)]
pub struct SampleTracker {
    last_position: i64,
    last_timestamp: i64,
    initialized: bool,
}

impl SampleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample
    ///
    /// `has_content == false` or `position <= 0` is treated as being at the
    /// top, which also resets the tracker.
    pub fn observe(&mut self, position: i64, timestamp: i64, has_content: bool) -> ScrollEvent {
        if !has_content || position <= 0 {
            self.reset();
            return ScrollEvent::AtTop { timestamp };
        }

        if !self.initialized {
            self.record(position, timestamp);
            self.initialized = true;
            return ScrollEvent::Idle {
                position,
                timestamp,
            };
        }

        let delta = position - self.last_position;
        let elapsed = timestamp - self.last_timestamp;
        self.record(position, timestamp);

        if delta != 0 {
            ScrollEvent::scrolling(position, delta, timestamp, elapsed)
        } else {
            ScrollEvent::Idle {
                position,
                timestamp,
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_position = 0;
        self.last_timestamp = 0;
        self.initialized = false;
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn last_position(&self) -> Option<i64> {
        self.initialized.then_some(self.last_position)
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.initialized.then_some(self.last_timestamp)
    }

    fn record(&mut self, position: i64, timestamp: i64) {
        self.last_position = position;
        self.last_timestamp = timestamp;
    }
}

/// Saturating index conversion; a wrapped cast would read as "at top"
#[inline]
fn index_to_i64(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

// ───────────────────────────────────────── plain scroll ──────

/// State of a plain (non-virtualized) scroll container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetSnapshot {
    /// Current pixel offset
    pub offset: i64,
    /// Maximum scrollable offset; `0` means nothing to scroll
    #[serde(default = "default_max_offset")]
    pub max_offset: i64,
}

fn default_max_offset() -> i64 {
    i64::MAX
}

/// Extractor for plain scroll containers
#[derive(Debug, Clone, Default)]
pub struct OffsetExtractor {
    tracker: SampleTracker,
}

impl OffsetExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScrollSignalExtractor for OffsetExtractor {
    type Snapshot = OffsetSnapshot;

    fn sample(&mut self, snapshot: &OffsetSnapshot, timestamp: i64) -> ScrollEvent {
        self.tracker
            .observe(snapshot.offset, timestamp, snapshot.max_offset > 0)
    }

    fn reset(&mut self) {
        self.tracker.reset();
    }

    fn last_position(&self) -> Option<i64> {
        self.tracker.last_position()
    }
}

// ───────────────────────────────────────── lazy list ─────────

/// State of an index-virtualized list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub first_visible_item_index: usize,
    pub first_visible_item_scroll_offset: i64,
    #[serde(default = "default_total_items")]
    pub total_items_count: usize,
}

fn default_total_items() -> usize {
    usize::MAX
}

/// Extractor for index-virtualized lists
///
/// Position is approximated as `index * row_height + item_offset`, assuming
/// uniform row height.
#[derive(Debug, Clone)]
pub struct ListExtractor {
    row_height: i64,
    tracker: SampleTracker,
}

impl Default for ListExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT)
    }
}

impl ListExtractor {
    pub fn new(row_height: i64) -> Self {
        Self {
            row_height: row_height.max(1),
            tracker: SampleTracker::new(),
        }
    }

    pub fn row_height(&self) -> i64 {
        self.row_height
    }

    /// Approximate pixel position of a snapshot
    pub fn position_of(&self, snapshot: &ListSnapshot) -> i64 {
        index_to_i64(snapshot.first_visible_item_index)
            .saturating_mul(self.row_height)
            .saturating_add(snapshot.first_visible_item_scroll_offset)
    }
}

impl ScrollSignalExtractor for ListExtractor {
    type Snapshot = ListSnapshot;

    fn sample(&mut self, snapshot: &ListSnapshot, timestamp: i64) -> ScrollEvent {
        let position = self.position_of(snapshot);
        self.tracker
            .observe(position, timestamp, snapshot.total_items_count > 0)
    }

    fn reset(&mut self) {
        self.tracker.reset();
    }

    fn last_position(&self) -> Option<i64> {
        self.tracker.last_position()
    }
}

// ───────────────────────────────────────── lazy grid ─────────

/// State of an index-virtualized grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub first_visible_item_index: usize,
    pub first_visible_item_scroll_offset: i64,
    #[serde(default = "default_total_items")]
    pub total_items_count: usize,
}

/// Extractor for fixed-column grids
///
/// Items in the same row share a vertical position, so the row index is
/// `index / columns`.
#[derive(Debug, Clone)]
pub struct GridExtractor {
    columns: usize,
    row_height: i64,
    tracker: SampleTracker,
}

impl GridExtractor {
    pub fn new(columns: usize, row_height: i64) -> Self {
        Self {
            columns: columns.max(1),
            row_height: row_height.max(1),
            tracker: SampleTracker::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn position_of(&self, snapshot: &GridSnapshot) -> i64 {
        let row = index_to_i64(snapshot.first_visible_item_index / self.columns);
        row.saturating_mul(self.row_height)
            .saturating_add(snapshot.first_visible_item_scroll_offset)
    }
}

impl ScrollSignalExtractor for GridExtractor {
    type Snapshot = GridSnapshot;

    fn sample(&mut self, snapshot: &GridSnapshot, timestamp: i64) -> ScrollEvent {
        let position = self.position_of(snapshot);
        self.tracker
            .observe(position, timestamp, snapshot.total_items_count > 0)
    }

    fn reset(&mut self) {
        self.tracker.reset();
    }

    fn last_position(&self) -> Option<i64> {
        self.tracker.last_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(index: usize, offset: i64) -> ListSnapshot {
        ListSnapshot {
            first_visible_item_index: index,
            first_visible_item_scroll_offset: offset,
            total_items_count: 50,
        }
    }

    #[test]
    fn test_first_sample_is_idle() {
        let mut tracker = SampleTracker::new();
        assert_eq!(
            tracker.observe(900, 0, true),
            ScrollEvent::Idle {
                position: 900,
                timestamp: 0
            }
        );
        assert!(tracker.is_initialized());
    }

    #[test]
    fn test_delta_and_velocity() {
        let mut tracker = SampleTracker::new();
        tracker.observe(200, 100, true);
        match tracker.observe(260, 110, true) {
            ScrollEvent::Scrolling {
                position,
                delta,
                velocity,
                timestamp,
            } => {
                assert_eq!(position, 260);
                assert_eq!(delta, 60);
                assert_eq!(timestamp, 110);
                assert!((velocity - 6.0).abs() < 1e-9);
            }
            other => panic!("expected scrolling, got {:?}", other),
        }
        assert_eq!(tracker.last_position(), Some(260));
        assert_eq!(tracker.last_timestamp(), Some(110));
    }

    #[test]
    fn test_no_movement_is_idle() {
        let mut tracker = SampleTracker::new();
        tracker.observe(200, 0, true);
        assert_eq!(
            tracker.observe(200, 16, true),
            ScrollEvent::Idle {
                position: 200,
                timestamp: 16
            }
        );
    }

    #[test]
    fn test_non_increasing_time_gives_zero_velocity() {
        let mut tracker = SampleTracker::new();
        tracker.observe(200, 50, true);
        match tracker.observe(150, 50, true) {
            ScrollEvent::Scrolling {
                delta, velocity, ..
            } => {
                assert_eq!(delta, -50);
                assert_eq!(velocity, 0.0);
            }
            other => panic!("expected scrolling, got {:?}", other),
        }
        match tracker.observe(100, 40, true) {
            ScrollEvent::Scrolling { velocity, .. } => assert_eq!(velocity, 0.0),
            other => panic!("expected scrolling, got {:?}", other),
        }
    }

    #[test]
    fn test_top_resets_tracker() {
        let mut tracker = SampleTracker::new();
        tracker.observe(500, 0, true);
        assert_eq!(tracker.observe(-3, 10, true), ScrollEvent::AtTop { timestamp: 10 });
        assert!(!tracker.is_initialized());
        assert_eq!(tracker.last_position(), None);

        // Next sample after the reset is a fresh first sample
        assert!(matches!(
            tracker.observe(800, 20, true),
            ScrollEvent::Idle { position: 800, .. }
        ));
    }

    #[test]
    fn test_list_position_mapping() {
        let extractor = ListExtractor::new(80);
        assert_eq!(extractor.position_of(&list(3, 25)), 265);
    }

    #[test]
    fn test_list_top_detection_ignores_history() {
        let mut extractor = ListExtractor::default();
        extractor.sample(&list(10, 40), 0);
        extractor.sample(&list(12, 0), 16);
        assert_eq!(extractor.sample(&list(0, 0), 32), ScrollEvent::AtTop { timestamp: 32 });

        let mut fresh = ListExtractor::default();
        assert_eq!(fresh.sample(&list(0, 0), 0), ScrollEvent::AtTop { timestamp: 0 });
    }

    #[test]
    fn test_list_without_items_is_at_top() {
        let mut extractor = ListExtractor::default();
        let empty = ListSnapshot {
            first_visible_item_index: 4,
            first_visible_item_scroll_offset: 10,
            total_items_count: 0,
        };
        assert_eq!(extractor.sample(&empty, 5), ScrollEvent::AtTop { timestamp: 5 });
    }

    #[test]
    fn test_offset_extractor() {
        let mut extractor = OffsetExtractor::new();
        let snap = |offset| OffsetSnapshot {
            offset,
            max_offset: 2_000,
        };
        assert!(matches!(extractor.sample(&snap(300), 0), ScrollEvent::Idle { .. }));
        assert_eq!(extractor.sample(&snap(340), 8).delta(), 40);
        assert_eq!(extractor.last_position(), Some(340));

        extractor.reset();
        assert_eq!(extractor.last_position(), None);

        let nothing = OffsetSnapshot {
            offset: 340,
            max_offset: 0,
        };
        assert!(matches!(extractor.sample(&nothing, 16), ScrollEvent::AtTop { .. }));
    }

    #[test]
    fn test_grid_rows() {
        let mut extractor = GridExtractor::new(3, 120);
        let snap = |index, offset| GridSnapshot {
            first_visible_item_index: index,
            first_visible_item_scroll_offset: offset,
            total_items_count: 90,
        };
        // Items 6..=8 share row 2
        assert_eq!(extractor.position_of(&snap(6, 10)), 250);
        assert_eq!(extractor.position_of(&snap(8, 10)), 250);

        extractor.sample(&snap(6, 10), 0);
        assert_eq!(extractor.sample(&snap(9, 10), 20).delta(), 120);
    }

    #[test]
    fn test_huge_indices_saturate() {
        let list = ListExtractor::new(100);
        let snap = ListSnapshot {
            first_visible_item_index: usize::MAX,
            first_visible_item_scroll_offset: 0,
            total_items_count: usize::MAX,
        };
        assert_eq!(list.position_of(&snap), i64::MAX);

        let grid = GridExtractor::new(1, 100);
        let grid_snap = GridSnapshot {
            first_visible_item_index: usize::MAX,
            first_visible_item_scroll_offset: 0,
            total_items_count: usize::MAX,
        };
        assert_eq!(grid.position_of(&grid_snap), i64::MAX);

        let mut extractor = ListExtractor::new(100);
        assert!(matches!(extractor.sample(&snap, 0), ScrollEvent::Idle { .. }));
    }

    #[test]
    fn test_degenerate_geometry_is_clamped() {
        assert_eq!(ListExtractor::new(0).row_height(), 1);
        assert_eq!(GridExtractor::new(0, 50).columns(), 1);
    }
}
