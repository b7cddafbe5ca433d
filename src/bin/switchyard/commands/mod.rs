//! Command implementations

pub mod config;
pub mod detect;
pub mod replay;

use std::path::PathBuf;

use anyhow::{Context, Result};

use switchyard::util::config::{global_config_path, load_config, project_config_path, Config};

/// Settings files consulted by every command. There is no global file when
/// the home directory cannot be determined.
pub fn settings_paths() -> Result<(Option<PathBuf>, PathBuf)> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    Ok((global_config_path(), project_config_path(&cwd)))
}

/// Load the merged settings for the current directory.
pub fn load_settings() -> Result<Config> {
    let (global, project) = settings_paths()?;
    Ok(match global {
        Some(global) => load_config(&global, &project),
        None => Config::load_or_default(&project),
    })
}

/// The configured default framework followed by `extra`, without duplicates.
pub fn framework_names(config: &Config, extra: &[String]) -> Vec<String> {
    let mut names = vec![config.default_framework().to_string()];
    for name in extra {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}
