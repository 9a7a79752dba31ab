//! Resolving a recipe, settings and options into one build session.
//!
//! Precedence, highest first: command line `-s`/`-o`, project config,
//! global config, recipe defaults (settings default to the host machine).

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::context::{Layout, RecipeContext};
use crate::core::options::OptionValues;
use crate::core::recipe::Recipe;
use crate::core::settings::{BuildSettings, PlatformCaps};
use crate::util::config::Config;
use crate::util::env::BuildEnv;
use crate::util::process::ProcessExecutor;
use crate::util::GlobalContext;

/// Variables copied from the invoking environment into every build tool's
/// environment.
pub const CAPTURED_ENV: &[&str] = &["CC", "CXX", "CFLAGS", "CXXFLAGS", "CPPFLAGS", "LDFLAGS"];

/// Options for opening a session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Recipe file; the built-in libostree recipe when `None`.
    pub recipe_path: Option<PathBuf>,

    /// Work directory override.
    pub work_dir: Option<PathBuf>,

    /// `-s key=value` overrides, in command line order.
    pub settings: Vec<(String, String)>,

    /// `-o name=value` overrides, in command line order.
    pub options: Vec<(String, String)>,
}

/// A recipe with everything resolved for one invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub recipe: Recipe,
    pub settings: BuildSettings,
    pub options: OptionValues,
    pub config: Config,
    pub package_id: String,
    pub work_dir: PathBuf,
    pub layout: Layout,
    pub env: BuildEnv,
}

impl Session {
    /// Resolve a session from the command line and configuration.
    pub fn open(gctx: &GlobalContext, opts: &SessionOptions) -> Result<Self> {
        let recipe = match &opts.recipe_path {
            Some(path) => Recipe::load(&gctx.cwd().join(path))?,
            None => Recipe::libostree().context("built-in recipe is invalid")?,
        };

        let config = gctx.load_config();
        Self::resolve(gctx, recipe, config, opts)
    }

    /// Resolve a session for an already loaded recipe and config.
    pub fn resolve(
        gctx: &GlobalContext,
        recipe: Recipe,
        config: Config,
        opts: &SessionOptions,
    ) -> Result<Self> {
        let mut settings = BuildSettings::host();
        for (key, value) in &config.settings {
            settings
                .set(key, value)
                .with_context(|| "invalid setting in config.toml")?;
        }
        for (key, value) in &opts.settings {
            settings.set(key, value)?;
        }

        let mut options = recipe.default_options();
        for (name, value) in &config.options {
            if !recipe.options.contains_key(name) {
                tracing::debug!("ignoring config option `{}`: not declared by {}", name, recipe.name());
                continue;
            }
            options
                .set(&recipe.options, name, value)
                .with_context(|| "invalid option in config.toml")?;
        }
        for (name, value) in &opts.options {
            options.set(&recipe.options, name, value)?;
        }

        let work_dir = opts
            .work_dir
            .clone()
            .or_else(|| config.paths.work_dir.clone())
            .map(|dir| gctx.cwd().join(dir))
            .unwrap_or_else(|| gctx.default_work_dir());

        let package_id = recipe.package_id(&settings, &options);
        let layout = Layout::new(&work_dir, &recipe, &package_id);

        let mut env = BuildEnv::capture(CAPTURED_ENV.iter().copied());
        for (key, value) in &config.env {
            env.set(key.as_str(), value.as_str());
        }

        tracing::debug!(
            "session for {} {}: id {}, work dir {}",
            recipe.name(),
            recipe.version(),
            package_id,
            work_dir.display()
        );

        Ok(Session {
            recipe,
            settings,
            options,
            config,
            package_id,
            work_dir,
            layout,
            env,
        })
    }

    pub fn caps(&self) -> PlatformCaps {
        PlatformCaps::new(&self.settings, &self.recipe.platform.native_build_os)
    }

    /// A fresh context for running hooks through `executor`.
    pub fn context<'a>(&'a self, executor: &'a dyn ProcessExecutor) -> RecipeContext<'a> {
        RecipeContext::new(
            &self.recipe,
            self.settings.clone(),
            self.options.clone(),
            self.layout.clone(),
            self.env.clone(),
            executor,
        )
    }
}

/// Parse a `key=value` command line argument.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected `key=value`, got `{}`", s)),
    }
}
