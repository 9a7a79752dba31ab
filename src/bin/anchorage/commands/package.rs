//! `anchorage package` command

use anyhow::Result;

use anchorage::builder::StageKind;
use anchorage::ops::package;
use anchorage::util::process::SystemExecutor;
use anchorage::util::shell::Status;

use crate::commands::{open_session, print_notices};
use crate::GlobalOptions;

pub fn execute(global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;
    let shell = &global.shell;

    let span = shell.span(Status::Packaging, session.recipe.name());
    let report = package(&session, &SystemExecutor)?;
    print_notices(shell, &report.notices);

    let what = match report.tree.kind {
        StageKind::Installed => "installed tree",
        StageKind::HeadersOnly => "headers",
    };
    span.finish_with_message(format!("{} at {}", what, report.tree.root().display()));

    Ok(())
}
