use std::path::Path;

use anyhow::{bail, Result};

use qode_core::AppConfig;

use crate::ConfigAction;

/// Only `show` reads the file, so `path` and `init` work on a broken config
pub fn run(action: ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => show(&AppConfig::load_from(config_path)?),
        ConfigAction::Path => path(config_path),
        ConfigAction::Init { force } => init(config_path, force),
    }
}

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

pub fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    AppConfig::default().save_to(config_path)?;
    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}
