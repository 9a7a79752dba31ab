//! `package` hook: populate the staging root.

use anyhow::{bail, Context, Result};

use crate::builder::context::Notice;
use crate::builder::package::{package as stage, StagedTree};
use crate::ops::session::Session;
use crate::util::process::ProcessExecutor;

/// The staged tree and anything worth telling the user.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub tree: StagedTree,
    pub notices: Vec<Notice>,
}

/// Stage the package for the session's target.
pub fn package(session: &Session, executor: &dyn ProcessExecutor) -> Result<PackageReport> {
    let mut ctx = session.context(executor);

    if !ctx.layout.source_dir.exists() {
        bail!(
            "source tree not found at {}\n\
             hint: run `anchorage source` first",
            ctx.layout.source_dir.display()
        );
    }

    let tree = stage(&mut ctx)
        .with_context(|| format!("failed to package {}", session.recipe.name()))?;

    Ok(PackageReport {
        tree,
        notices: ctx.take_notices(),
    })
}
