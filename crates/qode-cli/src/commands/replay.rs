use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use qode_core::AppConfig;

use super::AnyRunner;
use crate::Container;

pub async fn run(config: &AppConfig, file: &Path, container: Container, json: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read trace {}", file.display()))?;

    let mut runner = AnyRunner::new(config, container)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    replay(&mut runner, &content, json, &mut out)
}

/// Replay every line of a trace, failing on the first malformed line
pub fn replay<W: Write>(runner: &mut AnyRunner, content: &str, json: bool, out: &mut W) -> Result<()> {
    let mut steps = 0usize;
    let mut transitions = 0usize;

    for (index, line) in content.lines().enumerate() {
        let output = runner
            .feed(line)
            .with_context(|| format!("line {}", index + 1))?;
        let Some(output) = output else {
            continue;
        };

        steps += 1;
        if output.transition().is_some() {
            transitions += 1;
        }

        if json {
            writeln!(out, "{}", serde_json::to_string(&output)?)?;
        } else {
            writeln!(out, "{}", output.render())?;
        }
    }

    let info = runner.debug_info();
    tracing::info!(steps, transitions, visible = info.is_visible, "Replay finished");

    if json {
        writeln!(out, "{}", serde_json::to_string(&info)?)?;
    } else {
        writeln!(out)?;
        writeln!(out, "Steps: {}  Visibility changes: {}", steps, transitions)?;
        writeln!(
            out,
            "Final: visible={} accumulated={}px last_position={} behavior={}",
            info.is_visible,
            info.accumulated_distance,
            info.last_scroll_position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            info.config.behavior.as_str()
        )?;
    }

    Ok(())
}
