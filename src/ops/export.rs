//! `export`: archive a staged package for distribution.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::Builder;
use walkdir::WalkDir;

use crate::builder::info::INFO_FILE;
use crate::ops::session::Session;
use crate::util::fs::ensure_dir;
use crate::util::hash::sha256_file;

/// A written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub archive: PathBuf,
    /// Hex SHA-256 of the archive, also written next to it.
    pub sha256: String,
}

/// Base name shared by the archive and its top-level directory.
pub fn archive_stem(session: &Session) -> String {
    format!(
        "{}-{}-{}",
        session.recipe.name(),
        session.recipe.version(),
        session.package_id
    )
}

/// Archive the session's staging root as `<stem>.tar.gz` in `dest`.
///
/// Symlinks are stored as links. The staged package must already carry its
/// package info and at least one staged file besides it.
pub fn export(session: &Session, dest: &Path) -> Result<ExportResult> {
    let root = &session.layout.package_dir;
    if !root.join(INFO_FILE).exists() {
        bail!(
            "no staged package at {}\n\
             hint: run `anchorage create` (or `package` and `info`) first",
            root.display()
        );
    }
    if !has_staged_files(root) {
        bail!(
            "staged package at {} holds no files besides {}\n\
             hint: run `anchorage package` first",
            root.display(),
            INFO_FILE
        );
    }

    ensure_dir(dest)?;
    let stem = archive_stem(session);
    let archive = dest.join(format!("{}.tar.gz", stem));

    let file = File::create(&archive)
        .with_context(|| format!("failed to create {}", archive.display()))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);
    builder.follow_symlinks(false);
    builder
        .append_dir_all(&stem, root)
        .with_context(|| format!("failed to archive {}", root.display()))?;
    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .with_context(|| format!("failed to write {}", archive.display()))?;

    let sha256 = sha256_file(&archive)?;
    let checksum = dest.join(format!("{}.tar.gz.sha256", stem));
    std::fs::write(&checksum, format!("{}  {}.tar.gz\n", sha256, stem))
        .with_context(|| format!("failed to write {}", checksum.display()))?;

    tracing::debug!("exported {}", archive.display());
    Ok(ExportResult { archive, sha256 })
}

/// Whether `root` holds anything other than the package info file.
fn has_staged_files(root: &Path) -> bool {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .any(|entry| !entry.file_type().is_dir() && entry.path() != root.join(INFO_FILE))
}
