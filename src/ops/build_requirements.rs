//! `build_requirements` hook: install what the build machine needs.

use anyhow::{Context, Result};

use crate::builder::context::Notice;
use crate::builder::deps::{install_requirements, BuildRequirements, HostPackageInstaller, InstallOutcome};
use crate::ops::session::Session;
use crate::util::process::ProcessExecutor;

/// What the hook declared and did.
#[derive(Debug, Clone)]
pub struct BuildRequirementsReport {
    pub requirements: BuildRequirements,
    pub outcome: InstallOutcome,
    pub notices: Vec<Notice>,
}

/// Declare the build requirements for the session's target and install
/// them with `installer`, if there is one.
pub fn build_requirements(
    session: &Session,
    executor: &dyn ProcessExecutor,
    installer: Option<&dyn HostPackageInstaller>,
) -> Result<BuildRequirementsReport> {
    let mut ctx = session.context(executor);

    let requirements = BuildRequirements::declare(&mut ctx);
    let outcome = install_requirements(&mut ctx, &requirements, &session.config.install, installer)
        .context("failed to install build requirements")?;

    Ok(BuildRequirementsReport {
        requirements,
        outcome,
        notices: ctx.take_notices(),
    })
}
