//! Test fixtures: fake upstream trees, git remotes and recipes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use git2::{Repository, Signature};

use crate::core::recipe::Recipe;

/// A libostree-shaped source tree.
///
/// ```text
/// autogen.sh
/// configure.ac
/// src/libostree/ostree.h
/// src/libostree/ostree-core.h
/// src/libostree/ostree-version.h.in
/// src/libostree/ostree-repo.c
/// src/libostree/ostree-autocleanups.h -> ostree.h   (unix)
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceTreeFixture {
    files: Vec<(PathBuf, String)>,
    links: Vec<(PathBuf, PathBuf)>,
}

impl SourceTreeFixture {
    pub fn libostree() -> Self {
        SourceTreeFixture::default()
            .with_file("autogen.sh", "#!/bin/sh\nautoreconf -fi\n")
            .with_file("configure.ac", "AC_INIT([libostree], [2022.1])\n")
            .with_file("src/libostree/ostree.h", headers::umbrella())
            .with_file("src/libostree/ostree-core.h", headers::declarations("ostree_core"))
            .with_file("src/libostree/ostree-version.h.in", headers::version_template())
            .with_file("src/libostree/ostree-repo.c", "int ostree_repo_new (void) { return 0; }\n")
            .with_link("src/libostree/ostree-autocleanups.h", "ostree.h")
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Add a relative symlink; skipped on platforms without cheap symlinks.
    pub fn with_link(mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.links.push((path.into(), target.into()));
        self
    }

    /// Write the tree under `root`.
    pub fn write_to(&self, root: &Path) -> io::Result<PathBuf> {
        for (path, content) in &self.files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full, content)?;
        }

        #[cfg(unix)]
        for (path, target) in &self.links {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            std::os::unix::fs::symlink(target, &full)?;
        }

        Ok(root.to_path_buf())
    }
}

/// Create a git repository at `root` holding `tree`, committed once and
/// tagged with the lightweight tag `tag`. Returns the commit id.
pub fn git_upstream(root: &Path, tree: &SourceTreeFixture, tag: &str) -> Result<git2::Oid, git2::Error> {
    let repo = Repository::init(root)?;
    tree.write_to(root)
        .map_err(|e| git2::Error::from_str(&e.to_string()))?;

    let mut index = repo.index()?;
    index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let sig = Signature::now("Fixture", "fixture@example.com")?;
    let commit = repo.commit(Some("HEAD"), &sig, &sig, "import", &tree, &[])?;

    let object = repo.find_object(commit, None)?;
    repo.tag_lightweight(tag, &object, false)?;
    Ok(commit)
}

/// `file://` URL for a local path.
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Recipe text shaped like the libostree one, fetching from `url`.
pub fn recipe_toml(url: &str) -> String {
    format!(
        r#"
[package]
name = "libostree"
version = "2022.1"
license = "LGPLv2+"

[options]
shared = {{ values = [true, false], default = true }}
fPIC = {{ values = [true, false], default = true }}

[source]
url = "{url}"
tag = "v{{version}}"
submodules = true

[build_requirements]
host_tools = ["libtool", "bison"]
cross_packages = ["libglib2.0-dev", "liblzma-dev"]

[autotools]
configure_args = ["--with-curl", "--without-soup"]
static_compiler_arg = "--with-static-compiler"
linkage_option = "shared"
pic_option = "fPIC"

[autotools.env]
BASH_COMPLETIONSDIR = "${{datadir}}/bash-completion/completions"

[headers]
src = "src/libostree"
dst = "include/ostree-1"
renames = [{{ from = "ostree-version.h.in", to = "ostree-version.h" }}]

[info]
include_dirs = ["include/ostree-1"]
libs = ["ostree-1"]
"#
    )
}

/// Parsed test recipe fetching from `url`.
pub fn test_recipe(url: &str) -> Recipe {
    Recipe::parse(&recipe_toml(url)).expect("fixture recipe is valid")
}

/// Header contents.
pub mod headers {
    pub fn umbrella() -> String {
        "#pragma once\n#include \"ostree-core.h\"\n#include \"ostree-version.h\"\n".to_string()
    }

    pub fn declarations(prefix: &str) -> String {
        format!("#pragma once\nint {prefix}_init (void);\n")
    }

    pub fn version_template() -> String {
        "#pragma once\n#define OSTREE_VERSION_S \"@VERSION@\"\n".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_tree_fixture() {
        let tmp = TempDir::new().unwrap();
        SourceTreeFixture::libostree().write_to(tmp.path()).unwrap();

        assert!(tmp.path().join("autogen.sh").exists());
        assert!(tmp
            .path()
            .join("src/libostree/ostree-version.h.in")
            .exists());
    }

    #[test]
    fn test_git_upstream_is_tagged() {
        let tmp = TempDir::new().unwrap();
        let commit = git_upstream(tmp.path(), &SourceTreeFixture::libostree(), "v2022.1").unwrap();

        let repo = Repository::open(tmp.path()).unwrap();
        let tagged = repo
            .find_reference("refs/tags/v2022.1")
            .unwrap()
            .peel_to_commit()
            .unwrap();
        assert_eq!(tagged.id(), commit);
    }

    #[test]
    fn test_recipe_fixture_parses() {
        let recipe = test_recipe("file:///nowhere");
        assert_eq!(recipe.tag(), "v2022.1");
        assert!(recipe.headers.is_some());
    }
}
