//! Staging the package tree.
//!
//! Where the library was built, `make install` populates the staging root.
//! Elsewhere the public headers are copied so consumers can still compile
//! against the declarations.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::builder::autotools::AutotoolsBuild;
use crate::builder::context::RecipeContext;
use crate::core::error::RecipeError;
use crate::core::recipe::HeadersSection;
use crate::util::fs::{copy_matching, ensure_dir, rename_file};

/// How a staged tree was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Installed by the build system.
    Installed,
    /// Public headers only.
    HeadersOnly,
}

/// The staging root of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTree {
    pub root: PathBuf,
    pub kind: StageKind,
}

impl StagedTree {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files and links under the root, relative to it, sorted.
    pub fn files(&self) -> Result<Vec<PathBuf>, RecipeError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                RecipeError::io("failed to read", path, e.into())
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                files.push(relative.to_path_buf());
            }
        }
        Ok(files)
    }
}

/// Populate the staging root for the context's target.
pub fn package(ctx: &mut RecipeContext<'_>) -> Result<StagedTree, RecipeError> {
    let root = ctx.layout.package_dir.clone();
    ensure_dir(&root)?;

    if ctx.caps.supports_native_build {
        AutotoolsBuild::install(ctx)?;
        return Ok(StagedTree {
            root,
            kind: StageKind::Installed,
        });
    }

    let recipe = ctx.recipe;
    match &recipe.headers {
        Some(headers) => {
            let copied = stage_headers(&ctx.layout.source_dir, headers, &root)?;
            tracing::info!("staged {} headers into {}", copied.len(), headers.dst);
        }
        None => ctx.info(format!(
            "{} declares no headers; the package for {} is empty",
            recipe.name(),
            ctx.settings.os
        )),
    }

    Ok(StagedTree {
        root,
        kind: StageKind::HeadersOnly,
    })
}

/// Apply the template renames inside the header directory, then copy the
/// matching headers into `<root>/<dst>`.
pub fn stage_headers(
    source_dir: &Path,
    headers: &HeadersSection,
    root: &Path,
) -> Result<Vec<PathBuf>, RecipeError> {
    let src = source_dir.join(&headers.src);

    for rename in &headers.renames {
        let from = src.join(&rename.from);
        let to = src.join(&rename.to);
        // A previous packaging run has already renamed it.
        if !from.exists() && to.exists() {
            continue;
        }
        rename_file(&from, &to)?;
    }

    copy_matching(&src, &headers.pattern, &root.join(&headers.dst))
}
