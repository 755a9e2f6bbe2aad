//! JSON-lines scroll traces
//!
//! Each non-empty line is either a container sample (snapshot fields plus an
//! optional `"t"` timestamp in milliseconds) or a source switch such as
//! `{"source": "search-tab"}`. Lines starting with `#` are comments.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use qode_core::autohide::{AutoHideController, ScrollSignalExtractor, Step, VisibilityTransition};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TraceLine<S> {
    Source {
        source: String,
        #[serde(default)]
        t: Option<i64>,
    },
    Sample {
        #[serde(default)]
        t: Option<i64>,
        #[serde(flatten)]
        snapshot: S,
    },
}

/// Parse one line; `None` for blanks and comments
pub fn parse_line<S: DeserializeOwned>(line: &str) -> Result<Option<TraceLine<S>>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let parsed = serde_json::from_str(line).with_context(|| format!("invalid trace line: {}", line))?;
    Ok(Some(parsed))
}

/// What happened for one trace line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output {
    Source {
        key: String,
        timestamp: i64,
        transition: Option<VisibilityTransition>,
    },
    Step {
        #[serde(flatten)]
        step: Step,
        visible: bool,
    },
}

impl Output {
    pub fn transition(&self) -> Option<&VisibilityTransition> {
        match self {
            Output::Source { transition, .. } => transition.as_ref(),
            Output::Step { step, .. } => step.transition.as_ref(),
        }
    }

    /// Single human-readable line
    pub fn render(&self) -> String {
        match self {
            Output::Source {
                key,
                timestamp,
                transition,
            } => {
                let marker = if transition.is_some() { "  [shown]" } else { "" };
                format!("{:>8}ms  source -> {}{}", timestamp, key, marker)
            }
            Output::Step { step, visible } => {
                let marker = match &step.transition {
                    Some(t) if t.to_visible => "  [shown]",
                    Some(_) => "  [hidden]",
                    None => "",
                };
                format!(
                    "{:>8}ms  {:<9} pos={:<7} delta={:<6} {:<8} visible={:<5} {}{}",
                    step.event.timestamp(),
                    step.event.label(),
                    step.event.position(),
                    step.event.delta(),
                    step.decision.label(),
                    visible,
                    step.decision.reason(),
                    marker
                )
            }
        }
    }
}

/// Feeds trace lines through one controller
pub struct TraceRunner<X: ScrollSignalExtractor> {
    controller: AutoHideController<X>,
    clock: fn() -> i64,
}

impl<X> TraceRunner<X>
where
    X: ScrollSignalExtractor,
    X::Snapshot: DeserializeOwned,
{
    pub fn new(controller: AutoHideController<X>) -> Self {
        Self {
            controller,
            clock: wall_clock_ms,
        }
    }

    /// Replace the clock used for lines without `"t"`
    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn controller(&self) -> &AutoHideController<X> {
        &self.controller
    }

    /// Process one raw line
    pub fn feed(&mut self, line: &str) -> Result<Option<Output>> {
        let Some(parsed) = parse_line::<X::Snapshot>(line)? else {
            return Ok(None);
        };

        let output = match parsed {
            TraceLine::Source { source, t } => {
                let timestamp = t.unwrap_or_else(self.clock);
                let transition = self.controller.set_source(&source, timestamp);
                Output::Source {
                    key: source,
                    timestamp,
                    transition,
                }
            }
            TraceLine::Sample { t, snapshot } => {
                let timestamp = t.unwrap_or_else(self.clock);
                let step = self.controller.on_sample(&snapshot, timestamp);
                Output::Step {
                    step,
                    visible: self.controller.is_visible(),
                }
            }
        };
        Ok(Some(output))
    }
}

pub fn wall_clock_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
