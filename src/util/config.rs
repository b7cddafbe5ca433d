//! Settings file support for switchyard.
//!
//! Switchyard reads settings from two locations:
//! - Global: `~/.switchyard/config.toml` - User-wide defaults
//! - Project: `.switchyard/config.toml` - Project-specific overrides
//!
//! Project settings take precedence over global settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Framework bundles bind to when their header names none.
pub const DEFAULT_FRAMEWORK: &str = "Weex";

/// Switchyard settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Runtime settings
    pub runtime: RuntimeSettings,

    /// Initial host environment, handed to every instance's config as `env`
    pub environment: Map<String, Value>,
}

/// Runtime dispatch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Fallback framework name
    pub default_framework: Option<String>,

    /// Expose deprecated method names such as `callJS` (default: true)
    pub legacy_aliases: Option<bool>,
}

impl Config {
    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load settings with fallback to defaults if the file doesn't exist or
    /// can't be read.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Environment keys are merged one by one.
    pub fn merge(&mut self, other: Config) {
        if other.runtime.default_framework.is_some() {
            self.runtime.default_framework = other.runtime.default_framework;
        }
        if other.runtime.legacy_aliases.is_some() {
            self.runtime.legacy_aliases = other.runtime.legacy_aliases;
        }
        self.environment.extend(other.environment);
    }

    /// Effective fallback framework name.
    pub fn default_framework(&self) -> &str {
        self.runtime
            .default_framework
            .as_deref()
            .unwrap_or(DEFAULT_FRAMEWORK)
    }

    /// Whether deprecated method names are exposed.
    pub fn legacy_aliases(&self) -> bool {
        self.runtime.legacy_aliases.unwrap_or(true)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Load merged settings from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.switchyard/config.toml)
/// 2. Global config (~/.switchyard/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global switchyard config directory (~/.switchyard).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".switchyard"))
}

/// Get the global config path (~/.switchyard/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.switchyard/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".switchyard").join("config.toml")
}
