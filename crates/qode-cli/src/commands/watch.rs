use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use qode_core::AppConfig;

use super::AnyRunner;
use crate::Container;

pub async fn run(config: &AppConfig, container: Container, json: bool, verbose: bool) -> Result<()> {
    let mut runner = AnyRunner::new(config, container)?;
    let reader = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();

    tracing::info!(container = ?container, "Watching stdin for scroll samples (Ctrl+C to stop)");

    tokio::select! {
        result = drive(reader, &mut runner, json, verbose, &mut out) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }

    let info = runner.debug_info();
    tracing::info!(
        visible = info.is_visible,
        accumulated = info.accumulated_distance,
        "Watch stopped"
    );
    Ok(())
}

/// Pump lines from `reader` through the runner until EOF
///
/// Lines are read on a separate task and handed over a channel; malformed
/// lines are logged and skipped.
pub async fn drive<R, W>(
    reader: R,
    runner: &mut AnyRunner,
    json: bool,
    verbose: bool,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write,
{
    let (tx, mut rx) = mpsc::channel::<String>(64);

    let reader_task = tokio::spawn(async move {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if tx.send(line).await.is_err() {
                break;
            }
        }
        Ok::<_, std::io::Error>(())
    });

    while let Some(line) = rx.recv().await {
        let output = match runner.feed(&line) {
            Ok(Some(output)) => output,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping trace line");
                continue;
            }
        };

        if !verbose && output.transition().is_none() {
            continue;
        }

        if json {
            writeln!(out, "{}", serde_json::to_string(&output)?)?;
        } else {
            writeln!(out, "{}", output.render())?;
        }
        out.flush()?;
    }

    reader_task.await??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &[u8] = br#"{"t": 0, "offset": 300}
{"t": 16, "offset": 400}
garbage
{"t": 32, "offset": 500}
{"t": 48, "offset": 480}
"#;

    #[tokio::test]
    async fn test_drive_prints_transitions_only() {
        let mut runner = AnyRunner::new(&AppConfig::default(), Container::Offset).unwrap();
        let mut out = Vec::new();
        drive(INPUT, &mut runner, false, false, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "{}", text);
        assert!(lines[0].ends_with("[hidden]"));
        assert!(lines[1].ends_with("[shown]"));
    }

    #[tokio::test]
    async fn test_drive_verbose_json() {
        let mut runner = AnyRunner::new(&AppConfig::default(), Container::Offset).unwrap();
        let mut out = Vec::new();
        drive(INPUT, &mut runner, true, true, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        // Four valid samples, the garbage line is skipped
        assert_eq!(text.lines().count(), 4);
        for line in text.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["type"], "step");
        }
    }
}
