//! `anchorage source` command

use anyhow::Result;

use anchorage::ops::{source, SourceOptions};
use anchorage::util::shell::Status;

use crate::cli::SourceArgs;
use crate::commands::open_session;
use crate::GlobalOptions;

pub fn execute(args: SourceArgs, global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;
    let shell = &global.shell;

    let span = shell.span(
        Status::Fetching,
        format!("{} {}", session.recipe.source.url, session.recipe.tag()),
    );
    let checkout = source(&session, &SourceOptions { depth: args.depth })?;
    span.finish_with_message(format!(
        "{} at {}",
        checkout.path.display(),
        &checkout.commit[..checkout.commit.len().min(10)]
    ));

    Ok(())
}
