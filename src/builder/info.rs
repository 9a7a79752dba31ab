//! What a staged package exposes to its consumers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::RecipeError;
use crate::core::recipe::Recipe;
use crate::core::settings::PlatformCaps;

/// File written at the staging root describing the package.
pub const INFO_FILE: &str = "anchorage-info.json";

/// Consumer-facing build information, with paths relative to the staging
/// root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppInfo {
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub bin_dirs: Vec<String>,
    pub libs: Vec<String>,
}

impl Default for CppInfo {
    fn default() -> Self {
        CppInfo {
            include_dirs: vec!["include".to_string()],
            lib_dirs: vec!["lib".to_string()],
            bin_dirs: vec!["bin".to_string()],
            libs: Vec::new(),
        }
    }
}

impl CppInfo {
    /// Info for `recipe` on a target with `caps`.
    ///
    /// Extra include directories are always exported; link names only where
    /// the library was actually built.
    pub fn for_recipe(recipe: &Recipe, caps: PlatformCaps) -> Self {
        let mut info = CppInfo::default();

        for dir in &recipe.info.include_dirs {
            if !info.include_dirs.contains(dir) {
                info.include_dirs.push(dir.clone());
            }
        }

        if caps.supports_native_build {
            info.libs = recipe.info.libs.clone();
        }

        info
    }

    /// Write the info into the staging root.
    pub fn write(&self, root: &Path) -> Result<(), RecipeError> {
        let path = root.join(INFO_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RecipeError::io("failed to serialize", &path, e.into()))?;
        std::fs::write(&path, json).map_err(|e| RecipeError::io("failed to write", &path, e))
    }

    /// Read the info of a staged package.
    pub fn load(root: &Path) -> Result<Self, RecipeError> {
        let path = root.join(INFO_FILE);
        let contents =
            std::fs::read_to_string(&path).map_err(|e| RecipeError::io("failed to read", &path, e))?;
        serde_json::from_str(&contents).map_err(|e| RecipeError::io("failed to parse", &path, e.into()))
    }

    /// Compiler and linker flags for a package staged at `root`.
    pub fn flags(&self, root: &Path) -> Vec<String> {
        let mut flags = Vec::new();
        for dir in &self.include_dirs {
            flags.push(format!("-I{}", root.join(dir).display()));
        }
        if !self.libs.is_empty() {
            for dir in &self.lib_dirs {
                flags.push(format!("-L{}", root.join(dir).display()));
            }
        }
        for lib in &self.libs {
            flags.push(format!("-l{}", lib));
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn caps(native: bool) -> PlatformCaps {
        PlatformCaps {
            supports_native_build: native,
        }
    }

    #[test]
    fn test_linux_exports_libs() {
        let recipe = Recipe::libostree().unwrap();
        let info = CppInfo::for_recipe(&recipe, caps(true));

        assert_eq!(info.include_dirs, vec!["include", "include/ostree-1"]);
        assert_eq!(info.libs, vec!["ostree-1"]);
    }

    #[test]
    fn test_headers_only_exports_no_libs() {
        let recipe = Recipe::libostree().unwrap();
        let info = CppInfo::for_recipe(&recipe, caps(false));

        assert!(info.include_dirs.contains(&"include/ostree-1".to_string()));
        assert!(info.libs.is_empty());
        assert_eq!(info.flags(Path::new("/pkg")), vec!["-I/pkg/include", "-I/pkg/include/ostree-1"]);
    }

    #[test]
    fn test_flags() {
        let recipe = Recipe::libostree().unwrap();
        let info = CppInfo::for_recipe(&recipe, caps(true));

        let flags = info.flags(Path::new("/pkg"));
        assert!(flags.contains(&"-I/pkg/include/ostree-1".to_string()));
        assert!(flags.contains(&"-L/pkg/lib".to_string()));
        assert_eq!(flags.last().map(String::as_str), Some("-lostree-1"));
    }

    #[test]
    fn test_write_and_load() {
        let tmp = TempDir::new().unwrap();
        let recipe = Recipe::libostree().unwrap();
        let info = CppInfo::for_recipe(&recipe, caps(true));

        info.write(tmp.path()).unwrap();
        assert_eq!(CppInfo::load(tmp.path()).unwrap(), info);
    }

    #[test]
    fn test_load_missing() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            CppInfo::load(tmp.path()),
            Err(RecipeError::Io { .. })
        ));
    }
}
