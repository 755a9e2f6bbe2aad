pub mod autohide;
pub mod config;
pub mod error;

pub use autohide::{
    AutoHideController, AutoHidingEngine, Behavior, Decision, PolicyConfig, ScrollEvent,
    Sensitivity, Thresholds, VisibilityState, VisibilityStateHolder,
};
pub use config::{AppConfig, ExtractorConfig};
pub use error::{Error, Result};
