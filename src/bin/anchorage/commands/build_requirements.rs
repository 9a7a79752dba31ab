//! `anchorage build-requirements` command

use anyhow::Result;

use anchorage::builder::deps::{detect_installer, InstallOutcome};
use anchorage::builder::BuildRequirements;
use anchorage::ops::build_requirements;
use anchorage::util::process::SystemExecutor;
use anchorage::util::shell::Status;

use crate::cli::BuildRequirementsArgs;
use crate::commands::{open_session, print_notices};
use crate::GlobalOptions;

pub fn execute(args: BuildRequirementsArgs, global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;
    let shell = &global.shell;

    if args.dry_run {
        let mut ctx = session.context(&SystemExecutor);
        let reqs = BuildRequirements::declare(&mut ctx);
        print_notices(shell, ctx.notices());
        for package in reqs.host_tools.iter().chain(&reqs.cross_packages) {
            println!("{}", package);
        }
        return Ok(());
    }

    let installer = detect_installer(&session.config.install);
    if let Some(installer) = &installer {
        shell.status(Status::Installing, format!("build requirements with {}", installer.name()));
    }

    let report = build_requirements(&session, &SystemExecutor, installer.as_deref())?;
    print_notices(shell, &report.notices);

    match report.outcome {
        InstallOutcome::Installed => shell.status(
            Status::Finished,
            format!(
                "{} packages installed",
                report.requirements.host_tools.len() + report.requirements.cross_packages.len()
            ),
        ),
        InstallOutcome::NothingToDo => shell.status(Status::Skipped, "no build requirements"),
        InstallOutcome::Disabled | InstallOutcome::NoInstaller => {}
    }

    Ok(())
}
