//! Build requirements: what the build machine must have installed, and how
//! to install it.
//!
//! Host tools (`libtool`, `bison`) run on the build machine and are
//! installed for its own architecture. Development libraries are linked into
//! the target and are installed as cross packages (`libglib2.0-dev:arm64`).

use std::path::PathBuf;

use crate::builder::context::RecipeContext;
use crate::core::arch;
use crate::core::error::RecipeError;
use crate::util::config::InstallConfig;
use crate::util::process::{find_executable, ProcessBuilder, ProcessExecutor};

/// Warning emitted when the build machine has no supported installer.
pub const UNSUPPORTED_INSTALLER: &str =
    "Unsupported Linux version. Cannot install build dependencies, requires apt tooling.";

/// Packages needed on the build machine for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequirements {
    /// Native tools, never architecture-qualified.
    pub host_tools: Vec<String>,

    /// Target development packages, architecture-qualified where known.
    pub cross_packages: Vec<String>,
}

impl BuildRequirements {
    /// Declare the requirements for the context's target.
    ///
    /// Targets without native build support need nothing; one notice is
    /// recorded instead.
    pub fn declare(ctx: &mut RecipeContext<'_>) -> Self {
        if !ctx.caps.supports_native_build {
            ctx.info(format!(
                "No build requirements for {}; only headers are packaged",
                ctx.settings.os
            ));
            return BuildRequirements::default();
        }

        let section = &ctx.recipe.build_requirements;
        let arch = ctx.settings.arch.as_str();

        BuildRequirements {
            host_tools: section.host_tools.clone(),
            cross_packages: section
                .cross_packages
                .iter()
                .map(|pkg| arch::cross_package_name(pkg, arch))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.host_tools.is_empty() && self.cross_packages.is_empty()
    }
}

/// A host package manager able to install build requirements.
///
/// Installing an already-installed package must be a no-op.
pub trait HostPackageInstaller {
    /// Short name for messages, e.g. `apt`.
    fn name(&self) -> &str;

    /// Install `reqs`. The first failing command aborts.
    fn install(
        &self,
        reqs: &BuildRequirements,
        executor: &dyn ProcessExecutor,
    ) -> Result<(), RecipeError>;
}

/// Debian/Ubuntu installer driving `apt-get`.
#[derive(Debug, Clone)]
pub struct AptInstaller {
    program: PathBuf,
    sudo: bool,
    update: bool,
}

impl AptInstaller {
    pub fn new(program: impl Into<PathBuf>, config: &InstallConfig) -> Self {
        AptInstaller {
            program: program.into(),
            sudo: config.sudo(),
            update: config.update(),
        }
    }

    /// Locate `apt-get` on `PATH`.
    pub fn detect(config: &InstallConfig) -> Option<Self> {
        find_executable("apt-get").map(|program| AptInstaller::new(program, config))
    }

    fn command(&self) -> ProcessBuilder {
        if self.sudo {
            ProcessBuilder::new("sudo").arg(&self.program)
        } else {
            ProcessBuilder::new(&self.program)
        }
    }

    /// The commands [`install`](HostPackageInstaller::install) runs, in order.
    pub fn commands(&self, reqs: &BuildRequirements) -> Vec<ProcessBuilder> {
        let mut commands = Vec::new();

        if self.update {
            commands.push(self.command().arg("update"));
        }

        for packages in [&reqs.host_tools, &reqs.cross_packages] {
            if packages.is_empty() {
                continue;
            }
            commands.push(
                self.command()
                    .args(["install", "-y", "--no-install-recommends"])
                    .args(packages),
            );
        }

        commands
    }
}

impl HostPackageInstaller for AptInstaller {
    fn name(&self) -> &str {
        "apt"
    }

    fn install(
        &self,
        reqs: &BuildRequirements,
        executor: &dyn ProcessExecutor,
    ) -> Result<(), RecipeError> {
        for cmd in self.commands(reqs) {
            tracing::info!("running `{}`", cmd.display_command());

            let output = executor
                .execute(&cmd)
                .map_err(|e| RecipeError::Spawn {
                    step: "build_requirements".to_string(),
                    command: cmd.display_command(),
                    reason: format!("{:#}", e),
                })?;

            if !output.success() {
                return Err(RecipeError::DependencyInstall {
                    command: cmd.display_command(),
                    status: output.status,
                    stderr: output.stderr_tail(20),
                });
            }
        }

        Ok(())
    }
}

/// Find the installer for this build machine, if any.
pub fn detect_installer(config: &InstallConfig) -> Option<Box<dyn HostPackageInstaller>> {
    AptInstaller::detect(config).map(|apt| Box::new(apt) as Box<dyn HostPackageInstaller>)
}

/// What [`install_requirements`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// Nothing to install for this target.
    NothingToDo,
    /// Installation turned off in the configuration.
    Disabled,
    /// No supported installer on this machine.
    NoInstaller,
}

/// Declare and install the build requirements for the context's target.
pub fn install_requirements(
    ctx: &mut RecipeContext<'_>,
    reqs: &BuildRequirements,
    config: &InstallConfig,
    installer: Option<&dyn HostPackageInstaller>,
) -> Result<InstallOutcome, RecipeError> {
    if reqs.is_empty() {
        return Ok(InstallOutcome::NothingToDo);
    }

    if !config.enabled() {
        ctx.info(format!(
            "Installing build requirements is disabled; make sure these are present: {}",
            reqs.host_tools
                .iter()
                .chain(&reqs.cross_packages)
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        ));
        return Ok(InstallOutcome::Disabled);
    }

    let Some(installer) = installer else {
        ctx.warn(UNSUPPORTED_INSTALLER);
        return Ok(InstallOutcome::NoInstaller);
    };

    tracing::debug!("installing build requirements with {}", installer.name());
    installer.install(reqs, ctx.executor())?;
    Ok(InstallOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::builder::context::{Layout, NoticeLevel};
    use crate::core::recipe::Recipe;
    use crate::core::settings::{BuildSettings, Os};
    use crate::test_support::{MockExecutor, MockProcessOutput};
    use crate::util::env::BuildEnv;

    fn context<'a>(recipe: &'a Recipe, exec: &'a MockExecutor, os: Os, arch: &str) -> RecipeContext<'a> {
        let mut settings = BuildSettings::host();
        settings.os = os;
        settings.arch = arch.to_string();
        RecipeContext::new(
            recipe,
            settings,
            recipe.default_options(),
            Layout::new(Path::new("/work"), recipe, "id"),
            BuildEnv::new(),
            exec,
        )
    }

    fn apt(sudo: bool, update: bool) -> AptInstaller {
        AptInstaller::new(
            "apt-get",
            &InstallConfig {
                enabled: Some(true),
                sudo: Some(sudo),
                update: Some(update),
            },
        )
    }

    #[test]
    fn test_declare_cross_packages_for_arm64() {
        let recipe = Recipe::libostree().unwrap();
        let exec = MockExecutor::new();
        let mut ctx = context(&recipe, &exec, Os::Linux, "armv8");

        let reqs = BuildRequirements::declare(&mut ctx);

        assert_eq!(reqs.host_tools, vec!["libtool", "bison"]);
        assert_eq!(reqs.cross_packages.len(), 8);
        assert_eq!(reqs.cross_packages[0], "libglib2.0-dev:arm64");
        assert!(reqs.cross_packages.iter().all(|p| p.ends_with(":arm64")));
        assert!(ctx.notices().is_empty());
    }

    #[test]
    fn test_declare_unknown_arch_uses_bare_names() {
        let recipe = Recipe::libostree().unwrap();
        let exec = MockExecutor::new();
        let mut ctx = context(&recipe, &exec, Os::Linux, "riscv64");

        let reqs = BuildRequirements::declare(&mut ctx);
        assert_eq!(reqs.cross_packages[0], "libglib2.0-dev");
    }

    #[test]
    fn test_declare_nothing_off_linux() {
        let recipe = Recipe::libostree().unwrap();
        let exec = MockExecutor::new();
        let mut ctx = context(&recipe, &exec, Os::Macos, "armv8");

        let reqs = BuildRequirements::declare(&mut ctx);

        assert!(reqs.is_empty());
        assert_eq!(ctx.notices().len(), 1);
        assert_eq!(ctx.notices()[0].level, NoticeLevel::Info);
    }

    #[test]
    fn test_apt_commands() {
        let reqs = BuildRequirements {
            host_tools: vec!["libtool".to_string(), "bison".to_string()],
            cross_packages: vec!["libglib2.0-dev:arm64".to_string()],
        };

        let commands: Vec<String> = apt(true, true)
            .commands(&reqs)
            .iter()
            .map(ProcessBuilder::display_command)
            .collect();

        assert_eq!(
            commands,
            vec![
                "sudo apt-get update",
                "sudo apt-get install -y --no-install-recommends libtool bison",
                "sudo apt-get install -y --no-install-recommends libglib2.0-dev:arm64",
            ]
        );

        let commands = apt(false, false).commands(&reqs);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].get_program(), Path::new("apt-get"));
    }

    #[test]
    fn test_install_failure_is_fatal_and_stops() {
        let recipe = Recipe::libostree().unwrap();
        let exec = MockExecutor::succeeding();
        exec.expect_contains(
            "libtool bison",
            MockProcessOutput::failure(100, "E: Unable to locate package bison"),
        );
        let mut ctx = context(&recipe, &exec, Os::Linux, "x86_64");
        let reqs = BuildRequirements::declare(&mut ctx);
        let installer = apt(false, true);

        let err = install_requirements(&mut ctx, &reqs, &InstallConfig::default(), Some(&installer))
            .unwrap_err();

        assert!(matches!(
            err,
            RecipeError::DependencyInstall {
                status: Some(100),
                ..
            }
        ));
        // update + failed host tool install; cross packages never attempted
        assert_eq!(exec.commands().len(), 2);
    }

    #[test]
    fn test_install_without_installer_warns() {
        let recipe = Recipe::libostree().unwrap();
        let exec = MockExecutor::new();
        let mut ctx = context(&recipe, &exec, Os::Linux, "x86_64");
        let reqs = BuildRequirements::declare(&mut ctx);

        let outcome = install_requirements(&mut ctx, &reqs, &InstallConfig::default(), None).unwrap();

        assert_eq!(outcome, InstallOutcome::NoInstaller);
        assert_eq!(ctx.notices()[0].level, NoticeLevel::Warn);
        assert_eq!(ctx.notices()[0].message, UNSUPPORTED_INSTALLER);
        assert!(exec.commands().is_empty());
    }

    #[test]
    fn test_install_disabled() {
        let recipe = Recipe::libostree().unwrap();
        let exec = MockExecutor::new();
        let mut ctx = context(&recipe, &exec, Os::Linux, "x86_64");
        let reqs = BuildRequirements::declare(&mut ctx);
        let config = InstallConfig {
            enabled: Some(false),
            ..InstallConfig::default()
        };

        let outcome = install_requirements(&mut ctx, &reqs, &config, Some(&apt(true, true))).unwrap();

        assert_eq!(outcome, InstallOutcome::Disabled);
        assert!(ctx.notices()[0].message.contains("libtool bison"));
        assert!(exec.commands().is_empty());
    }

    #[test]
    fn test_install_nothing_off_linux() {
        let recipe = Recipe::libostree().unwrap();
        let exec = MockExecutor::new();
        let mut ctx = context(&recipe, &exec, Os::Windows, "x86_64");
        let reqs = BuildRequirements::declare(&mut ctx);

        let outcome =
            install_requirements(&mut ctx, &reqs, &InstallConfig::default(), Some(&apt(true, true)))
                .unwrap();
        assert_eq!(outcome, InstallOutcome::NothingToDo);
        assert!(exec.commands().is_empty());
    }
}
