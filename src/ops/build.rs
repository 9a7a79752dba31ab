//! `build` hook: bootstrap, configure and compile.

use anyhow::{bail, Context, Result};

use crate::builder::autotools::{AutotoolsBuild, BuildState};
use crate::builder::context::Notice;
use crate::ops::session::Session;
use crate::util::process::ProcessExecutor;

/// How the build ended.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub state: BuildState,
    pub notices: Vec<Notice>,
}

/// Build the checked-out source tree.
pub fn build(session: &Session, executor: &dyn ProcessExecutor) -> Result<BuildReport> {
    let mut ctx = session.context(executor);

    if ctx.caps.supports_native_build && !ctx.layout.source_dir.exists() {
        bail!(
            "source tree not found at {}\n\
             hint: run `anchorage source` first",
            ctx.layout.source_dir.display()
        );
    }

    let state = AutotoolsBuild::run(&mut ctx)
        .with_context(|| format!("failed to build {}", session.recipe.name()))?;

    Ok(BuildReport {
        state,
        notices: ctx.take_notices(),
    })
}
