//! Autotools build driver.
//!
//! A build walks `Bootstrap -> Configure -> Compile -> Built`. Targets the
//! recipe cannot build natively end in `Skipped` without running anything.
//! The first failing tool aborts the walk; nothing is retried or rolled back.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::builder::context::{run_tool, RecipeContext};
use crate::core::arch;
use crate::core::error::RecipeError;
use crate::core::settings::BuildSettings;
use crate::util::env::BuildEnv;
use crate::util::process::ProcessBuilder;

/// Notice recorded when the target has nothing to build.
pub const NOTHING_TO_DO: &str = "Nothing to be done for this OS";

/// Compiler used for `--with-static-compiler` when `CC` is unset.
const DEFAULT_STATIC_COMPILER: &str = "gcc";

/// Ordered `configure` arguments.
pub type ConfigureArgs = Vec<String>;

/// Where a build is, or where it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Bootstrap,
    Configure,
    Compile,
    Built,
    /// The target platform has nothing to build.
    Skipped,
}

impl BuildState {
    /// Name used in error reports for the step run in this state.
    pub fn step_name(&self) -> &'static str {
        match self {
            BuildState::Bootstrap => "bootstrap",
            BuildState::Configure => "configure",
            BuildState::Compile => "compile",
            BuildState::Built => "built",
            BuildState::Skipped => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Built | BuildState::Skipped)
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.step_name())
    }
}

/// Standard install directories below `prefix`.
///
/// Everything executable lands in `bin` so the staged tree has a single
/// place for tools.
pub fn install_dir_args(prefix: &Path) -> Vec<String> {
    vec![
        format!("--prefix={}", prefix.display()),
        "--bindir=${prefix}/bin".to_string(),
        "--sbindir=${prefix}/bin".to_string(),
        "--libexecdir=${prefix}/bin".to_string(),
        "--libdir=${prefix}/lib".to_string(),
        "--includedir=${prefix}/include".to_string(),
        "--oldincludedir=${prefix}/include".to_string(),
        "--datarootdir=${prefix}/share".to_string(),
    ]
}

/// `--build`/`--host` when the target architecture differs from this
/// machine's. Empty for native builds or architectures without a known
/// triplet.
pub fn cross_args(settings: &BuildSettings) -> Vec<String> {
    if !settings.is_cross() {
        return Vec::new();
    }

    match (
        arch::gnu_triplet(arch::host_arch()),
        arch::gnu_triplet(&settings.arch),
    ) {
        (Some(build), Some(host)) => vec![format!("--build={}", build), format!("--host={}", host)],
        _ => {
            tracing::debug!("no GNU triplet for cross build to {}", settings.arch);
            Vec::new()
        }
    }
}

/// The mutually exclusive linkage pair.
pub fn linkage_args(shared: bool) -> [&'static str; 2] {
    if shared {
        ["--enable-shared", "--disable-static"]
    } else {
        ["--disable-shared", "--enable-static"]
    }
}

/// Compiler handed to `--with-static-compiler`: `CC` if set, else gcc.
pub fn static_compiler(env: &BuildEnv) -> String {
    env.get("CC")
        .filter(|cc| !cc.trim().is_empty())
        .unwrap_or(DEFAULT_STATIC_COMPILER)
        .to_string()
}

/// Full `configure` argument list for the context's settings and options.
pub fn configure_args(ctx: &RecipeContext<'_>) -> ConfigureArgs {
    let autotools = &ctx.recipe.autotools;

    let mut args = install_dir_args(&ctx.layout.package_dir);
    args.extend(cross_args(&ctx.settings));
    args.extend(autotools.configure_args.iter().cloned());

    if let Some(flag) = &autotools.static_compiler_arg {
        args.push(format!("{}={}", flag, static_compiler(&ctx.env)));
    }

    if let Some(option) = &autotools.linkage_option {
        let shared = ctx.options.get_bool(option);
        args.extend(linkage_args(shared).iter().map(|s| s.to_string()));
    }

    args
}

/// Machine flag for compilers targeting `arch`, if one is needed.
fn arch_flag(arch: &str) -> Option<&'static str> {
    match arch {
        "x86_64" => Some("-m64"),
        "x86" => Some("-m32"),
        _ => None,
    }
}

fn join_flags(generated: &[&str], existing: Option<&str>) -> String {
    let mut flags: Vec<&str> = generated.to_vec();
    if let Some(existing) = existing {
        flags.extend(existing.split_whitespace());
    }
    flags.join(" ")
}

/// Environment for `configure`, `make` and `make install`.
///
/// Starts from the context environment, adds compiler flag variables, and
/// finally applies the recipe's overrides so they always win.
pub fn configure_env(ctx: &RecipeContext<'_>) -> BuildEnv {
    let mut env = ctx.env.clone();
    let build_type = ctx.settings.build_type;

    let mut cflags: Vec<&str> = Vec::new();
    let mut ldflags: Vec<&str> = Vec::new();
    if let Some(flag) = arch_flag(&ctx.settings.arch) {
        cflags.push(flag);
        ldflags.push(flag);
    }
    let pic = ctx
        .recipe
        .autotools
        .pic_option
        .as_deref()
        .is_some_and(|option| ctx.options.get_bool(option));
    if pic {
        cflags.push("-fPIC");
    }
    cflags.extend(build_type.cflags());

    let cppflags: &[&str] = if build_type.defines_ndebug() {
        &["-DNDEBUG"]
    } else {
        &[]
    };

    let values = [
        ("CFLAGS", join_flags(&cflags, ctx.env.get("CFLAGS"))),
        ("CXXFLAGS", join_flags(&cflags, ctx.env.get("CXXFLAGS"))),
        ("CPPFLAGS", join_flags(cppflags, ctx.env.get("CPPFLAGS"))),
        ("LDFLAGS", join_flags(&ldflags, ctx.env.get("LDFLAGS"))),
    ];
    for (key, value) in values {
        env.set(key, value);
    }

    for (key, value) in &ctx.recipe.autotools.env {
        env.set(key.as_str(), value.as_str());
    }

    env
}

/// Drives one autotools build.
pub struct AutotoolsBuild;

impl AutotoolsBuild {
    /// Run the build to a terminal state.
    pub fn run(ctx: &mut RecipeContext<'_>) -> Result<BuildState, RecipeError> {
        if !ctx.caps.supports_native_build {
            ctx.info(NOTHING_TO_DO);
            return Ok(BuildState::Skipped);
        }

        let mut state = BuildState::Bootstrap;
        while !state.is_terminal() {
            state = Self::step(ctx, state)?;
        }
        Ok(state)
    }

    /// Run the tool for `state` and return the next state.
    fn step(ctx: &mut RecipeContext<'_>, state: BuildState) -> Result<BuildState, RecipeError> {
        tracing::debug!("{} {}", state, ctx.recipe.name());

        match state {
            BuildState::Bootstrap => {
                Self::bootstrap(ctx)?;
                Ok(BuildState::Configure)
            }
            BuildState::Configure => {
                let cmd = ProcessBuilder::new(ctx.layout.source_dir.join("configure"))
                    .args(configure_args(ctx))
                    .envs(&configure_env(ctx))
                    .cwd(&ctx.layout.source_dir);
                ctx.run_tool(state.step_name(), &cmd)?;
                Ok(BuildState::Compile)
            }
            BuildState::Compile => {
                let cmd = make(ctx);
                ctx.run_tool(state.step_name(), &cmd)?;
                Ok(BuildState::Built)
            }
            BuildState::Built | BuildState::Skipped => Ok(state),
        }
    }

    /// Run the bootstrap script with the recipe's bootstrap variables set for
    /// that invocation only.
    fn bootstrap(ctx: &mut RecipeContext<'_>) -> Result<(), RecipeError> {
        let executor = ctx.executor();
        let script = bootstrap_script(&ctx.layout.source_dir, &ctx.recipe.autotools.bootstrap);
        let cwd = ctx.layout.source_dir.clone();
        let overlay = ctx.recipe.autotools.bootstrap_env.clone();

        let scope = ctx.env.scoped(overlay);
        let cmd = ProcessBuilder::new(script).cwd(cwd).envs(&scope);
        run_tool(executor, BuildState::Bootstrap.step_name(), &cmd)?;
        Ok(())
    }

    /// `make install` into the configured prefix.
    pub fn install(ctx: &RecipeContext<'_>) -> Result<(), RecipeError> {
        let cmd = make(ctx).arg("install");
        ctx.run_tool("install", &cmd)?;
        Ok(())
    }
}

fn make(ctx: &RecipeContext<'_>) -> ProcessBuilder {
    ProcessBuilder::new("make")
        .envs(&configure_env(ctx))
        .cwd(&ctx.layout.source_dir)
}

fn bootstrap_script(source_dir: &Path, script: &str) -> PathBuf {
    source_dir.join(script.trim_start_matches("./"))
}
