//! Atomic Layer: Auto-hide policy configuration
//!
//! A `PolicyConfig` is immutable once handed to the engine. It is also the
//! `[autohide]` section of the application config file.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Multiplier applied to the hide-accumulation distance
///
/// Higher means more downward travel before hiding: `Low` hides soonest,
/// `High` latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// 0.5x distance
    Low,
    /// 1.0x distance
    #[default]
    Medium,
    /// 1.5x distance
    High,
}

impl Sensitivity {
    #[inline]
    pub fn multiplier(self) -> f64 {
        match self {
            Sensitivity::Low => 0.5,
            Sensitivity::Medium => 1.0,
            Sensitivity::High => 1.5,
        }
    }
}

/// Decision strategy used for downward/upward scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Hide on the first downward pixel
    Immediate,
    /// Hide after a sustained downward travel
    #[default]
    Accumulative,
    /// Hide/show when scroll speed crosses a threshold
    VelocityBased,
}

impl Behavior {
    pub fn as_str(self) -> &'static str {
        match self {
            Behavior::Immediate => "immediate",
            Behavior::Accumulative => "accumulative",
            Behavior::VelocityBased => "velocity_based",
        }
    }
}

/// Distance and speed thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Never hide while the position is at or below this value (px)
    #[serde(default = "default_always_visible_band")]
    pub always_visible_band: i64,
    /// Downward travel that triggers a hide, before sensitivity scaling (px)
    #[serde(default = "default_hide_accumulation_distance")]
    pub hide_accumulation_distance: i64,
    /// Single upward delta larger than this forces a show (px)
    #[serde(default = "default_show_on_scroll_up_distance")]
    pub show_on_scroll_up_distance: i64,
    /// Speed that triggers hide/show in velocity mode (px/ms)
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            always_visible_band: default_always_visible_band(),
            hide_accumulation_distance: default_hide_accumulation_distance(),
            show_on_scroll_up_distance: default_show_on_scroll_up_distance(),
            velocity_threshold: default_velocity_threshold(),
        }
    }
}

fn default_always_visible_band() -> i64 {
    50
}

fn default_hide_accumulation_distance() -> i64 {
    150
}

fn default_show_on_scroll_up_distance() -> i64 {
    8
}

fn default_velocity_threshold() -> f64 {
    1.5
}

/// Complete auto-hide policy
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub sensitivity: Sensitivity,
    #[serde(default)]
    pub behavior: Behavior,
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl PolicyConfig {
    /// Hides as soon as the content moves down
    pub fn responsive() -> Self {
        Self {
            behavior: Behavior::Immediate,
            ..Default::default()
        }
    }

    /// Tolerates long downward drags before hiding
    pub fn relaxed() -> Self {
        Self {
            sensitivity: Sensitivity::High,
            behavior: Behavior::Accumulative,
            thresholds: Thresholds {
                always_visible_band: 120,
                show_on_scroll_up_distance: 16,
                ..Default::default()
            },
        }
    }

    /// Reacts to flings rather than distance
    pub fn fling() -> Self {
        Self {
            behavior: Behavior::VelocityBased,
            ..Default::default()
        }
    }

    /// Hide distance after sensitivity scaling
    #[inline]
    pub fn hide_threshold(&self) -> f64 {
        self.thresholds.hide_accumulation_distance as f64 * self.sensitivity.multiplier()
    }

    /// Reject configurations that cannot be evaluated meaningfully
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        let distances = [
            ("always_visible_band", t.always_visible_band),
            ("hide_accumulation_distance", t.hide_accumulation_distance),
            ("show_on_scroll_up_distance", t.show_on_scroll_up_distance),
        ];
        for (name, value) in distances {
            if value < 0 {
                return Err(Error::InvalidPolicy(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
        }
        if !t.velocity_threshold.is_finite() || t.velocity_threshold < 0.0 {
            return Err(Error::InvalidPolicy(format!(
                "velocity_threshold must be a finite non-negative number (got {})",
                t.velocity_threshold
            )));
        }
        Ok(())
    }
}
