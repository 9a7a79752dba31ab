//! `anchorage build` command

use anyhow::Result;

use anchorage::builder::BuildState;
use anchorage::ops::build;
use anchorage::util::process::SystemExecutor;
use anchorage::util::shell::Status;

use crate::commands::{open_session, print_notices};
use crate::GlobalOptions;

pub fn execute(global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;
    let shell = &global.shell;

    let span = shell.span(
        Status::Compiling,
        format!("{} {}", session.recipe.name(), session.recipe.version()),
    );
    let report = build(&session, &SystemExecutor)?;

    if report.state == BuildState::Skipped {
        drop(span);
        print_notices(shell, &report.notices);
        shell.status(Status::Skipped, format!("build of {} for {}", session.recipe.name(), session.settings.os));
    } else {
        print_notices(shell, &report.notices);
        span.finish_with_message(format!("{} {}", session.recipe.name(), session.recipe.version()));
    }

    Ok(())
}
