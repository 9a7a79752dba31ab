//! `package_info` hook: export what consumers need.

use anyhow::{Context, Result};

use crate::builder::info::CppInfo;
use crate::ops::session::Session;
use crate::util::fs::ensure_dir;

/// Compute the package info and write it into the staging root.
pub fn package_info(session: &Session) -> Result<CppInfo> {
    let info = CppInfo::for_recipe(&session.recipe, session.caps());

    let root = &session.layout.package_dir;
    ensure_dir(root)?;
    info.write(root)
        .with_context(|| format!("failed to export package info of {}", session.recipe.name()))?;

    Ok(info)
}
