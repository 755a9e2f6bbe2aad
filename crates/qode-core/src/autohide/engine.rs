//! Molecular Layer: Auto-hide decision engine
//!
//! Evaluates normalized scroll events against a `PolicyConfig`. The engine
//! knows nothing about the current visibility; its only state is the
//! downward distance accumulated since the last show.

use serde::{Deserialize, Serialize};

use super::event::ScrollEvent;
use super::policy::{Behavior, PolicyConfig};
use crate::Result;

/// Outcome of evaluating one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Show(String),
    Hide(String),
    Maintain(String),
}

impl Decision {
    pub fn reason(&self) -> &str {
        match self {
            Decision::Show(reason) | Decision::Hide(reason) | Decision::Maintain(reason) => reason,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Show(_) => "show",
            Decision::Hide(_) => "hide",
            Decision::Maintain(_) => "maintain",
        }
    }

    #[inline]
    pub fn is_maintain(&self) -> bool {
        matches!(self, Decision::Maintain(_))
    }
}

/// Scroll-direction decision engine for one scrollable surface
#[derive(Debug, Clone)]
pub struct AutoHidingEngine {
    config: PolicyConfig,
    accumulated_downward_distance: i64,
}

impl AutoHidingEngine {
    /// Create an engine, rejecting invalid policies
    pub fn new(config: PolicyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            accumulated_downward_distance: 0,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: PolicyConfig::default(),
            accumulated_downward_distance: 0,
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    #[inline]
    pub fn accumulated_distance(&self) -> i64 {
        self.accumulated_downward_distance
    }

    /// Clear the accumulator
    pub fn reset(&mut self) {
        self.accumulated_downward_distance = 0;
    }

    /// Evaluate one event
    pub fn evaluate(&mut self, event: &ScrollEvent) -> Decision {
        let decision = match *event {
            ScrollEvent::AtTop { .. } => self.show("At top of content"),
            ScrollEvent::Idle { .. } => Decision::Maintain("Content not scrolling".to_string()),
            ScrollEvent::Scrolling {
                position,
                delta,
                velocity,
                ..
            } => {
                // The always-visible band wins over every behavior
                if position <= self.config.thresholds.always_visible_band {
                    self.show("Near top threshold")
                } else {
                    match self.config.behavior {
                        Behavior::Immediate => self.evaluate_immediate(delta),
                        Behavior::Accumulative => self.evaluate_accumulative(delta),
                        Behavior::VelocityBased => self.evaluate_velocity(delta, velocity),
                    }
                }
            }
        };

        tracing::trace!(
            event = event.label(),
            position = event.position(),
            delta = event.delta(),
            decision = decision.label(),
            reason = decision.reason(),
            accumulated = self.accumulated_downward_distance,
            "Auto-hide decision"
        );

        decision
    }

    fn evaluate_immediate(&mut self, delta: i64) -> Decision {
        if delta > 0 {
            Decision::Hide("Scrolling down".to_string())
        } else if self.is_deliberate_upward(delta) {
            self.show("Scrolling up")
        } else {
            Decision::Maintain("Upward scroll within deadband".to_string())
        }
    }

    fn evaluate_accumulative(&mut self, delta: i64) -> Decision {
        if delta > 0 {
            self.accumulated_downward_distance =
                self.accumulated_downward_distance.saturating_add(delta);
            // Hide keeps the accumulator; only a show clears it
            if self.accumulated_downward_distance as f64 >= self.config.hide_threshold() {
                Decision::Hide(format!(
                    "Accumulated {}px downward",
                    self.accumulated_downward_distance
                ))
            } else {
                Decision::Maintain(format!(
                    "Accumulating downward scroll ({}px)",
                    self.accumulated_downward_distance
                ))
            }
        } else if self.is_deliberate_upward(delta) {
            self.show("Scrolling up")
        } else {
            Decision::Maintain("Upward scroll within deadband".to_string())
        }
    }

    fn evaluate_velocity(&mut self, delta: i64, velocity: f64) -> Decision {
        let threshold = self.config.thresholds.velocity_threshold;
        if velocity > threshold {
            Decision::Hide("Fast downward scroll".to_string())
        } else if velocity < -threshold && self.is_deliberate_upward(delta) {
            self.show("Fast upward scroll")
        } else {
            Decision::Maintain("Scroll speed below threshold".to_string())
        }
    }

    #[inline]
    fn is_deliberate_upward(&self, delta: i64) -> bool {
        delta < -self.config.thresholds.show_on_scroll_up_distance
    }

    fn show(&mut self, reason: &str) -> Decision {
        self.accumulated_downward_distance = 0;
        Decision::Show(reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autohide::policy::{Sensitivity, Thresholds};

    fn scrolling(position: i64, delta: i64, timestamp: i64, velocity: f64) -> ScrollEvent {
        ScrollEvent::Scrolling {
            position,
            delta,
            timestamp,
            velocity,
        }
    }

    fn policy(behavior: Behavior) -> PolicyConfig {
        PolicyConfig {
            sensitivity: Sensitivity::Medium,
            behavior,
            thresholds: Thresholds {
                always_visible_band: 50,
                hide_accumulation_distance: 150,
                show_on_scroll_up_distance: 8,
                velocity_threshold: 20.0,
            },
        }
    }

    fn engine(behavior: Behavior) -> AutoHidingEngine {
        AutoHidingEngine::new(policy(behavior)).unwrap()
    }

    const ALL_BEHAVIORS: [Behavior; 3] = [
        Behavior::Immediate,
        Behavior::Accumulative,
        Behavior::VelocityBased,
    ];

    #[test]
    fn test_accumulative_scenario() {
        let mut engine = engine(Behavior::Accumulative);

        let first = engine.evaluate(&scrolling(200, 60, 0, 0.0));
        assert!(first.is_maintain());
        assert_eq!(engine.accumulated_distance(), 60);

        let second = engine.evaluate(&scrolling(260, 60, 10, 6.0));
        assert!(second.is_maintain());
        assert_eq!(engine.accumulated_distance(), 120);

        let third = engine.evaluate(&scrolling(320, 60, 20, 6.0));
        assert!(matches!(third, Decision::Hide(_)));
        assert_eq!(engine.accumulated_distance(), 180);
    }

    #[test]
    fn test_accumulative_hide_keeps_accumulator() {
        let mut engine = engine(Behavior::Accumulative);
        engine.evaluate(&scrolling(400, 200, 0, 0.0));
        assert_eq!(engine.accumulated_distance(), 200);
        // Small upward jitter neither shows nor clears
        let decision = engine.evaluate(&scrolling(395, -5, 16, -0.3));
        assert!(decision.is_maintain());
        assert_eq!(engine.accumulated_distance(), 200);
        // Further downward scroll keeps hiding
        assert!(matches!(
            engine.evaluate(&scrolling(405, 10, 32, 0.6)),
            Decision::Hide(_)
        ));
    }

    #[test]
    fn test_accumulative_never_hides_before_threshold() {
        for sensitivity in [Sensitivity::Low, Sensitivity::Medium, Sensitivity::High] {
            let config = PolicyConfig {
                sensitivity,
                ..policy(Behavior::Accumulative)
            };
            let threshold = config.hide_threshold();
            let mut engine = AutoHidingEngine::new(config).unwrap();
            let mut position = 100;
            let mut total = 0;
            loop {
                position += 7;
                total += 7;
                let decision = engine.evaluate(&scrolling(position, 7, 0, 0.0));
                if (total as f64) < threshold {
                    assert!(decision.is_maintain(), "{:?} hid at {}", sensitivity, total);
                } else {
                    assert!(matches!(decision, Decision::Hide(_)), "{:?}", sensitivity);
                    break;
                }
            }
        }
    }

    #[test]
    fn test_upward_scroll_shows_and_resets() {
        let mut engine = engine(Behavior::Accumulative);
        engine.evaluate(&scrolling(300, 100, 0, 0.0));
        let decision = engine.evaluate(&scrolling(290, -10, 16, -0.6));
        assert_eq!(decision, Decision::Show("Scrolling up".to_string()));
        assert_eq!(engine.accumulated_distance(), 0);
    }

    #[test]
    fn test_immediate() {
        let mut engine = engine(Behavior::Immediate);
        assert!(matches!(
            engine.evaluate(&scrolling(300, 1, 0, 0.1)),
            Decision::Hide(_)
        ));
        assert!(engine.evaluate(&scrolling(292, -8, 16, -0.5)).is_maintain());
        assert!(matches!(
            engine.evaluate(&scrolling(283, -9, 32, -0.6)),
            Decision::Show(_)
        ));
        // Accumulator untouched by immediate hides
        assert_eq!(engine.accumulated_distance(), 0);
    }

    #[test]
    fn test_velocity_scenario() {
        let mut engine = engine(Behavior::VelocityBased);
        assert!(matches!(
            engine.evaluate(&scrolling(500, 100, 0, 25.0)),
            Decision::Hide(_)
        ));
        assert!(matches!(
            engine.evaluate(&scrolling(450, -50, 2, -25.0)),
            Decision::Show(_)
        ));
        assert_eq!(engine.accumulated_distance(), 0);
    }

    #[test]
    fn test_velocity_below_threshold_maintains() {
        let mut engine = engine(Behavior::VelocityBased);
        assert!(engine.evaluate(&scrolling(500, 100, 0, 19.0)).is_maintain());
        assert!(engine.evaluate(&scrolling(400, -100, 10, -19.0)).is_maintain());
    }

    #[test]
    fn test_upward_deadband_all_behaviors() {
        for behavior in ALL_BEHAVIORS {
            let mut engine = engine(behavior);
            for delta in -8..=0 {
                // Fast enough to pass the velocity rule in velocity mode
                let decision = engine.evaluate(&scrolling(1_000, delta, 0, -100.0));
                assert!(
                    !matches!(decision, Decision::Show(_)),
                    "{:?} showed for delta {}",
                    behavior,
                    delta
                );
            }
        }
    }

    #[test]
    fn test_always_visible_band_dominates() {
        for behavior in ALL_BEHAVIORS {
            let mut engine = engine(behavior);
            for (position, delta, velocity) in
                [(50, 40, 100.0), (1, 1, 0.0), (30, -2, -1.0), (50, 500, 500.0)]
            {
                engine.evaluate(&scrolling(2_000, 300, 0, 100.0));
                let decision = engine.evaluate(&scrolling(position, delta, 0, velocity));
                assert_eq!(
                    decision,
                    Decision::Show("Near top threshold".to_string()),
                    "{:?}",
                    behavior
                );
                assert_eq!(engine.accumulated_distance(), 0);
            }
        }
    }

    #[test]
    fn test_at_top_resets() {
        for behavior in ALL_BEHAVIORS {
            let mut engine = engine(behavior);
            engine.evaluate(&scrolling(400, 100, 0, 1.0));
            let decision = engine.evaluate(&ScrollEvent::AtTop { timestamp: 5 });
            assert_eq!(decision, Decision::Show("At top of content".to_string()));
            assert_eq!(engine.accumulated_distance(), 0);
        }
    }

    #[test]
    fn test_idle_maintains_without_state_change() {
        let mut engine = engine(Behavior::Accumulative);
        engine.evaluate(&scrolling(400, 90, 0, 1.0));
        let decision = engine.evaluate(&ScrollEvent::Idle {
            position: 400,
            timestamp: 16,
        });
        assert_eq!(decision, Decision::Maintain("Content not scrolling".to_string()));
        assert_eq!(engine.accumulated_distance(), 90);
    }

    #[test]
    fn test_rejects_invalid_policy() {
        let mut config = policy(Behavior::Immediate);
        config.thresholds.always_visible_band = -10;
        assert!(AutoHidingEngine::new(config).is_err());
    }

    #[test]
    fn test_decision_serde() {
        let json = serde_json::to_string(&Decision::Hide("Scrolling down".into())).unwrap();
        assert_eq!(json, r#"{"action":"hide","reason":"Scrolling down"}"#);
    }
}
