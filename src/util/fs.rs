//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::core::error::RecipeError;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<(), RecipeError> {
    if path.exists() {
        fs::remove_dir_all(path)
            .map_err(|e| RecipeError::io("failed to remove directory", path, e))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), RecipeError> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| RecipeError::io("failed to create directory", path, e))?;
    }
    Ok(())
}

/// Rename a file, failing if the source is missing.
pub fn rename_file(from: &Path, to: &Path) -> Result<(), RecipeError> {
    fs::rename(from, to).map_err(|e| RecipeError::io("failed to rename", from, e))
}

/// Copy files under `src` whose file name matches `pattern` into `dst`,
/// keeping their relative layout.
///
/// Symbolic links are recreated as links rather than followed. Returns the
/// destination paths, sorted.
pub fn copy_matching(src: &Path, pattern: &str, dst: &Path) -> Result<Vec<PathBuf>, RecipeError> {
    let pattern = Pattern::new(pattern).map_err(|e| {
        RecipeError::InvalidRecipe(format!("invalid file pattern `{}`: {}", pattern, e))
    })?;

    ensure_dir(dst)?;

    let mut copied = Vec::new();
    for entry in WalkDir::new(src).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            RecipeError::io("failed to read", path, e.into())
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !pattern.matches(&name) {
            continue;
        }

        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }

        if file_type.is_symlink() {
            let link = fs::read_link(entry.path())
                .map_err(|e| RecipeError::io("failed to read link", entry.path(), e))?;
            if target.symlink_metadata().is_ok() {
                fs::remove_file(&target)
                    .map_err(|e| RecipeError::io("failed to replace", &target, e))?;
            }
            symlink(&link, &target).map_err(|e| RecipeError::io("failed to link", &target, e))?;
        } else {
            fs::copy(entry.path(), &target)
                .map_err(|e| RecipeError::io("failed to copy", entry.path(), e))?;
        }

        copied.push(target);
    }

    copied.sort();
    Ok(copied)
}

/// Create a symlink (platform-aware).
#[cfg(unix)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}
