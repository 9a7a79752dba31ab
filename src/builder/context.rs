//! Recipe context - everything one lifecycle hook needs.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::error::RecipeError;
use crate::core::options::OptionValues;
use crate::core::recipe::Recipe;
use crate::core::settings::{BuildSettings, PlatformCaps};
use crate::util::env::BuildEnv;
use crate::util::process::{ProcessBuilder, ProcessExecutor, ProcessOutput};

/// Lines of stderr kept in tool failure reports.
const STDERR_TAIL_LINES: usize = 40;

/// Where a recipe's trees live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory the upstream repository is cloned under.
    pub source_root: PathBuf,

    /// The checkout itself (`<source_root>/<subfolder>`).
    pub source_dir: PathBuf,

    /// Staging root the package is installed into.
    pub package_dir: PathBuf,
}

impl Layout {
    /// Layout under a work directory:
    ///
    /// ```text
    /// <work>/source/<name>-<version>/<subfolder>
    /// <work>/package/<package_id>
    /// ```
    pub fn new(work_dir: &Path, recipe: &Recipe, package_id: &str) -> Self {
        let source_root = work_dir
            .join("source")
            .join(format!("{}-{}", recipe.name(), recipe.version()));
        let source_dir = source_root.join(&recipe.source.subfolder);
        let package_dir = work_dir.join("package").join(package_id);

        Layout {
            source_root,
            source_dir,
            package_dir,
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
}

/// Something the user should know that is not an error, such as a target
/// platform the library cannot be built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Context for running one recipe with resolved settings and options.
pub struct RecipeContext<'a> {
    pub recipe: &'a Recipe,
    pub settings: BuildSettings,
    pub options: OptionValues,
    pub caps: PlatformCaps,
    pub layout: Layout,

    /// Environment handed to every build tool.
    pub env: BuildEnv,

    executor: &'a dyn ProcessExecutor,
    notices: Vec<Notice>,
}

impl fmt::Debug for RecipeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeContext")
            .field("recipe", &self.recipe.name())
            .field("settings", &self.settings)
            .field("options", &self.options)
            .field("caps", &self.caps)
            .field("layout", &self.layout)
            .field("env", &self.env)
            .field("notices", &self.notices)
            .finish()
    }
}

impl<'a> RecipeContext<'a> {
    /// Create a context. Platform capabilities are derived here, once.
    pub fn new(
        recipe: &'a Recipe,
        settings: BuildSettings,
        options: OptionValues,
        layout: Layout,
        env: BuildEnv,
        executor: &'a dyn ProcessExecutor,
    ) -> Self {
        let caps = PlatformCaps::new(&settings, &recipe.platform.native_build_os);

        RecipeContext {
            recipe,
            settings,
            options,
            caps,
            layout,
            env,
            executor,
            notices: Vec::new(),
        }
    }

    pub fn executor(&self) -> &'a dyn ProcessExecutor {
        self.executor
    }

    /// Record an informational notice. Notices are shown by the caller.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("notice: {}", message);
        self.notices.push(Notice {
            level: NoticeLevel::Info,
            message,
        });
    }

    /// Record a warning notice.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("warning notice: {}", message);
        self.notices.push(Notice {
            level: NoticeLevel::Warn,
            message,
        });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand the recorded notices to the caller.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Run a build tool for `step`; see [`run_tool`].
    pub fn run_tool(&self, step: &str, cmd: &ProcessBuilder) -> Result<ProcessOutput, RecipeError> {
        run_tool(self.executor, step, cmd)
    }
}

/// Run a build tool for `step`. A non-zero exit is a
/// [`RecipeError::BuildTool`]; a program that cannot start is a
/// [`RecipeError::Spawn`].
pub fn run_tool(
    executor: &dyn ProcessExecutor,
    step: &str,
    cmd: &ProcessBuilder,
) -> Result<ProcessOutput, RecipeError> {
    tracing::debug!("{}: `{}`", step, cmd.display_command());

    let output = executor.execute(cmd).map_err(|e| RecipeError::Spawn {
        step: step.to_string(),
        command: cmd.display_command(),
        reason: format!("{:#}", e),
    })?;

    if !output.success() {
        return Err(RecipeError::BuildTool {
            step: step.to_string(),
            command: cmd.display_command(),
            status: output.status,
            stderr: output.stderr_tail(STDERR_TAIL_LINES),
        });
    }

    Ok(output)
}
