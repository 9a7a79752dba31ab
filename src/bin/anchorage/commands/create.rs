//! `anchorage create` command
//!
//! Runs every lifecycle hook and reports each one as it starts.

use std::cell::Cell;
use std::time::Instant;

use anyhow::Result;

use anchorage::builder::deps::detect_installer;
use anchorage::builder::BuildState;
use anchorage::ops::{create, CreateOptions, Hook, SourceOptions};
use anchorage::util::process::SystemExecutor;
use anchorage::util::shell::{format_duration, Status};

use crate::cli::CreateArgs;
use crate::commands::{open_session, print_notices};
use crate::GlobalOptions;

fn hook_status(hook: Hook) -> Status {
    match hook {
        Hook::Source => Status::Fetching,
        Hook::Requirements | Hook::PackageInfo => Status::Info,
        Hook::BuildRequirements => Status::Installing,
        Hook::Build => Status::Compiling,
        Hook::Package => Status::Packaging,
    }
}

pub fn execute(args: CreateArgs, global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;
    let shell = &global.shell;
    let start = Instant::now();

    let opts = CreateOptions {
        source: SourceOptions { depth: args.depth },
        keep_source: args.keep_source,
    };
    let installer = detect_installer(&session.config.install);

    let current = Cell::new(None);
    let result = create(&session, &SystemExecutor, installer.as_deref(), &opts, &mut |hook| {
        current.set(Some(hook));
        shell.status(hook_status(hook), hook);
    });

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let Some(hook) = current.get() {
                shell.error(format!("hook `{}` failed", hook));
            }
            return Err(e);
        }
    };

    print_notices(shell, &report.notices);
    if report.state == BuildState::Skipped {
        shell.status(Status::Skipped, format!("build for {}", session.settings.os));
    }
    shell.status(
        Status::Finished,
        format!(
            "{} {} ({}) in {}",
            session.recipe.name(),
            session.recipe.version(),
            session.package_id,
            format_duration(start.elapsed())
        ),
    );
    shell.note(format!("staged at {}", report.tree.root().display()));

    Ok(())
}
