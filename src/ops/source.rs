//! `source` hook: check out the upstream tree.

use anyhow::{Context, Result};

use crate::ops::session::Session;
use crate::sources::git::{Checkout, GitCheckout};
use crate::util::fs::{ensure_dir, remove_dir_all_if_exists};

/// Options for the source hook.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// History depth override; config `[source] depth` otherwise.
    pub depth: Option<u32>,
}

/// Fetch the recipe's tag into a clean source folder.
///
/// Any previous checkout is removed first, so the tree always matches the
/// tag exactly.
pub fn source(session: &Session, opts: &SourceOptions) -> Result<Checkout> {
    let layout = &session.layout;
    remove_dir_all_if_exists(&layout.source_dir)?;
    ensure_dir(&layout.source_root)?;

    let depth = opts.depth.unwrap_or_else(|| session.config.source_depth());
    let checkout = GitCheckout::from_recipe(&session.recipe)
        .depth(depth)
        .fetch(&layout.source_dir)
        .with_context(|| format!("failed to fetch source of {}", session.recipe.name()))?;

    Ok(checkout)
}
