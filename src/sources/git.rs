//! Git source - the upstream tree checked out at a release tag.

use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{AutotagOption, FetchOptions, Repository, ResetType};

use crate::core::error::RecipeError;
use crate::core::recipe::Recipe;

/// A tag of a remote repository to check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCheckout {
    /// Remote repository URL
    url: String,

    /// Tag to check out
    tag: String,

    /// History depth; `0` fetches everything
    depth: u32,

    /// Initialise and update submodules recursively
    submodules: bool,
}

/// A finished checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub path: PathBuf,
    /// Commit the tag resolved to.
    pub commit: String,
}

impl GitCheckout {
    pub fn new(url: impl Into<String>, tag: impl Into<String>) -> Self {
        GitCheckout {
            url: url.into(),
            tag: tag.into(),
            depth: 1,
            submodules: true,
        }
    }

    /// Checkout described by a recipe's `[source]` section.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        GitCheckout::new(&recipe.source.url, recipe.tag()).submodules(recipe.source.submodules)
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn submodules(mut self, submodules: bool) -> Self {
        self.submodules = submodules;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Fetch the tag into `dest` and check it out with a detached HEAD.
    ///
    /// `dest` should not hold an earlier checkout. Partial state is left in
    /// place on failure.
    pub fn fetch(&self, dest: &Path) -> Result<Checkout, RecipeError> {
        tracing::debug!("cloning {} at {}", self.url, self.tag);

        let commit = self.fetch_tag(dest).map_err(|source| self.error(source))?;

        if self.submodules {
            let repo = Repository::open(dest).map_err(|source| self.error(source))?;
            update_submodules(&repo).map_err(|source| self.error(source))?;
        }

        Ok(Checkout {
            path: dest.to_path_buf(),
            commit,
        })
    }

    fn fetch_tag(&self, dest: &Path) -> Result<String, git2::Error> {
        let repo = Repository::init(dest)?;
        let mut remote = repo.remote("origin", &self.url)?;

        let refspec = format!("+refs/tags/{tag}:refs/tags/{tag}", tag = self.tag);
        let mut opts = FetchOptions::new();
        opts.download_tags(AutotagOption::None);
        if self.depth > 0 {
            opts.depth(self.depth as i32);
        }
        remote.fetch(&[refspec.as_str()], Some(&mut opts), None)?;

        let commit = repo
            .find_reference(&format!("refs/tags/{}", self.tag))?
            .peel_to_commit()?;

        repo.set_head_detached(commit.id())?;
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        repo.reset(commit.as_object(), ResetType::Hard, Some(&mut checkout))?;

        tracing::debug!("{} resolved to {}", self.tag, commit.id());
        Ok(commit.id().to_string())
    }

    fn error(&self, source: git2::Error) -> RecipeError {
        RecipeError::Fetch {
            url: self.url.clone(),
            reference: self.tag.clone(),
            source,
        }
    }
}

/// `git submodule update --init --recursive`
fn update_submodules(repo: &Repository) -> Result<(), git2::Error> {
    for mut submodule in repo.submodules()? {
        tracing::debug!("updating submodule {}", submodule.path().display());
        submodule.update(true, None)?;
        let sub_repo = submodule.open()?;
        update_submodules(&sub_repo)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::test_support::{file_url, git_upstream, SourceTreeFixture};

    // libgit2's local transport cannot do shallow fetches, so fixtures use
    // full history.

    #[test]
    fn test_fetch_tag() {
        let tmp = TempDir::new().unwrap();
        let upstream = tmp.path().join("upstream");
        let commit = git_upstream(&upstream, &SourceTreeFixture::libostree(), "v2022.1").unwrap();

        let dest = tmp.path().join("source_subfolder");
        let checkout = GitCheckout::new(file_url(&upstream), "v2022.1")
            .depth(0)
            .fetch(&dest)
            .unwrap();

        assert_eq!(checkout.commit, commit.to_string());
        assert!(dest.join("src/libostree/ostree-version.h.in").exists());

        let repo = Repository::open(&dest).unwrap();
        assert!(repo.head_detached().unwrap());
    }

    #[test]
    fn test_missing_tag_is_fetch_error() {
        let tmp = TempDir::new().unwrap();
        let upstream = tmp.path().join("upstream");
        git_upstream(&upstream, &SourceTreeFixture::libostree(), "v2022.1").unwrap();

        let err = GitCheckout::new(file_url(&upstream), "v1999.9")
            .depth(0)
            .fetch(&tmp.path().join("dest"))
            .unwrap_err();

        match err {
            RecipeError::Fetch { reference, .. } => assert_eq!(reference, "v1999.9"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_recipe() {
        let recipe = Recipe::libostree().unwrap();
        let checkout = GitCheckout::from_recipe(&recipe);
        assert_eq!(checkout.url(), "https://github.com/ostreedev/ostree");
        assert_eq!(checkout.tag(), "v2022.1");
        assert!(checkout.submodules);
        assert_eq!(checkout.depth, 1);
    }
}
