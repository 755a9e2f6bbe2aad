use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::autohide::extractor::{GridExtractor, ListExtractor, DEFAULT_ROW_HEIGHT};
use crate::autohide::PolicyConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub autohide: PolicyConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Geometry assumptions for index-virtualized containers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Uniform row height used to turn item indices into pixels
    #[serde(default = "default_row_height")]
    pub row_height: i64,
    /// Column count for grid containers
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            grid_columns: default_grid_columns(),
        }
    }
}

impl ExtractorConfig {
    pub fn list_extractor(&self) -> ListExtractor {
        ListExtractor::new(self.row_height)
    }

    pub fn grid_extractor(&self) -> GridExtractor {
        GridExtractor::new(self.grid_columns, self.row_height)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_row_height() -> i64 {
    DEFAULT_ROW_HEIGHT
}

fn default_grid_columns() -> usize {
    2
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.autohide.validate()?;
        if self.extractor.row_height <= 0 {
            return Err(crate::Error::Config(format!(
                "extractor.row_height must be positive (got {})",
                self.extractor.row_height
            )));
        }
        if self.extractor.grid_columns == 0 {
            return Err(crate::Error::Config(
                "extractor.grid_columns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/qode/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("qode")
            .join("config.toml")
    }
}
