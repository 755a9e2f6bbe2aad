pub mod config;
pub mod replay;
pub mod watch;

use anyhow::Result;
use serde::de::DeserializeOwned;

use qode_core::autohide::{
    AutoHideController, AutoHideDebugInfo, GridExtractor, ListExtractor, OffsetExtractor,
    ScrollSignalExtractor,
};
use qode_core::AppConfig;

use crate::trace::{Output, TraceRunner};
use crate::Container;

/// Runner variants for each container shape
pub enum AnyRunner {
    Offset(TraceRunner<OffsetExtractor>),
    List(TraceRunner<ListExtractor>),
    Grid(TraceRunner<GridExtractor>),
}

impl AnyRunner {
    /// Build a runner for the container using the configured policy
    pub fn new(config: &AppConfig, container: Container) -> Result<Self> {
        let runner = match container {
            Container::Offset => AnyRunner::Offset(runner(OffsetExtractor::new(), config)?),
            Container::List => AnyRunner::List(runner(config.extractor.list_extractor(), config)?),
            Container::Grid => AnyRunner::Grid(runner(config.extractor.grid_extractor(), config)?),
        };
        Ok(runner)
    }

    pub fn feed(&mut self, line: &str) -> Result<Option<Output>> {
        match self {
            AnyRunner::Offset(r) => r.feed(line),
            AnyRunner::List(r) => r.feed(line),
            AnyRunner::Grid(r) => r.feed(line),
        }
    }

    pub fn debug_info(&self) -> AutoHideDebugInfo {
        match self {
            AnyRunner::Offset(r) => r.controller().debug_info(),
            AnyRunner::List(r) => r.controller().debug_info(),
            AnyRunner::Grid(r) => r.controller().debug_info(),
        }
    }
}

fn runner<X>(extractor: X, config: &AppConfig) -> Result<TraceRunner<X>>
where
    X: ScrollSignalExtractor,
    X::Snapshot: DeserializeOwned,
{
    let controller = AutoHideController::new(extractor, config.autohide)?;
    Ok(TraceRunner::new(controller))
}
