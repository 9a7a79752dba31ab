//! Global context: working directory, home directory and config locations.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};

use crate::util::config::{load_config, Config};

/// Project directories for Anchorage
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "anchorage", "anchorage"));

/// Global context containing configuration paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Anchorage data
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext {
            cwd,
            home: default_home(),
        })
    }

    /// Create a GlobalContext rooted at explicit directories.
    pub fn with_dirs(cwd: PathBuf, home: PathBuf) -> Self {
        GlobalContext { cwd, home }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Global configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Project-local anchorage directory.
    pub fn project_dir(&self) -> PathBuf {
        self.cwd.join(".anchorage")
    }

    /// Project configuration file.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_dir().join("config.toml")
    }

    /// Default root of checkouts and staged packages.
    pub fn default_work_dir(&self) -> PathBuf {
        self.project_dir().join("work")
    }

    /// Merged global and project configuration.
    pub fn load_config(&self) -> Config {
        load_config(&self.config_path(), &self.project_config_path())
    }
}

/// `ANCHORAGE_HOME`, else the platform config directory.
fn default_home() -> PathBuf {
    if let Some(home) = std::env::var_os("ANCHORAGE_HOME").filter(|h| !h.is_empty()) {
        return PathBuf::from(home);
    }

    if let Some(dirs) = PROJECT_DIRS.as_ref() {
        return dirs.config_dir().to_path_buf();
    }

    BaseDirs::new()
        .map(|b| b.home_dir().join(".anchorage"))
        .unwrap_or_else(|| PathBuf::from(".anchorage"))
}
