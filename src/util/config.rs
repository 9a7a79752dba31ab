//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `<home>/config.toml` - user-wide defaults
//! - Project: `.anchorage/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config; command-line
//! `-s`/`-o` flags take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Anchorage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default build settings (os, arch, compiler, build_type).
    pub settings: BTreeMap<String, String>,

    /// Default option values, by option name.
    pub options: BTreeMap<String, String>,

    /// Host package installation.
    pub install: InstallConfig,

    /// Source acquisition.
    pub source: SourceConfig,

    /// Filesystem locations.
    pub paths: PathsConfig,

    /// Variables added to every build tool's environment.
    pub env: BTreeMap<String, String>,
}

/// Host package installation settings.
///
/// Unset keys fall through to the next config file and finally default to
/// `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Install build requirements at all
    pub enabled: Option<bool>,

    /// Prefix installer commands with `sudo`
    pub sudo: Option<bool>,

    /// Refresh the package index before installing
    pub update: Option<bool>,
}

impl InstallConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn sudo(&self) -> bool {
        self.sudo.unwrap_or(true)
    }

    pub fn update(&self) -> bool {
        self.update.unwrap_or(true)
    }
}

/// Source acquisition settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// History depth for clones; `0` fetches full history
    pub depth: Option<u32>,
}

/// Filesystem locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of source checkouts and staged packages
    pub work_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
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
    pub fn merge(&mut self, other: Config) {
        self.settings.extend(other.settings);
        self.options.extend(other.options);
        self.env.extend(other.env);

        // Install settings
        if other.install.enabled.is_some() {
            self.install.enabled = other.install.enabled;
        }
        if other.install.sudo.is_some() {
            self.install.sudo = other.install.sudo;
        }
        if other.install.update.is_some() {
            self.install.update = other.install.update;
        }

        if other.source.depth.is_some() {
            self.source.depth = other.source.depth;
        }
        if other.paths.work_dir.is_some() {
            self.paths.work_dir = other.paths.work_dir;
        }
    }

    /// Clone depth, defaulting to a shallow single-commit fetch.
    pub fn source_depth(&self) -> u32 {
        self.source.depth.unwrap_or(1)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.anchorage/config.toml)
/// 2. Global config (<home>/config.toml)
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
