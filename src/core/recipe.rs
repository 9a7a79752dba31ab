//! Recipe documents.
//!
//! A recipe declares everything needed to turn an upstream autotools
//! project into a staged package: identity, options, where the source
//! lives, what the build machine needs installed, how to configure, and
//! what the package exposes to consumers.
//!
//! ```toml
//! [package]
//! name = "libostree"
//! version = "2022.1"
//!
//! [options]
//! shared = { values = [true, false], default = true }
//!
//! [source]
//! url = "https://github.com/ostreedev/ostree"
//! tag = "v{version}"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::error::RecipeError;
use crate::core::options::{OptionDecl, OptionValues};
use crate::core::reference::PackageReference;
use crate::core::settings::{BuildSettings, Os};
use crate::util::hash::Fingerprint;

/// The built-in libostree recipe.
pub const LIBOSTREE_RECIPE: &str = include_str!("../../recipes/libostree.toml");

/// A complete recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub package: PackageSection,

    #[serde(default)]
    pub options: BTreeMap<String, OptionDecl>,

    pub source: SourceSection,

    #[serde(default)]
    pub requirements: RequirementsSection,

    #[serde(default)]
    pub build_requirements: BuildRequirementsSection,

    #[serde(default)]
    pub platform: PlatformSection,

    #[serde(default)]
    pub autotools: AutotoolsSection,

    /// Header-only fallback for targets without a native build.
    #[serde(default)]
    pub headers: Option<HeadersSection>,

    #[serde(default)]
    pub info: InfoSection,
}

/// Package identity and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub homepage: Option<String>,
    /// Where the recipe itself is maintained.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Upstream git source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    pub url: String,

    /// Tag template; `{version}` expands to the package version.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Folder under the source root the tree is cloned into.
    #[serde(default = "default_subfolder")]
    pub subfolder: String,

    #[serde(default = "default_true")]
    pub submodules: bool,
}

/// Runtime requirements, pinned to published packages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementsSection {
    #[serde(default)]
    pub requires: Vec<PackageReference>,
}

/// Packages the build machine needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildRequirementsSection {
    /// Native tools, installed for the build machine's architecture.
    #[serde(default)]
    pub host_tools: Vec<String>,

    /// Development libraries, installed for the target architecture.
    #[serde(default)]
    pub cross_packages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSection {
    /// Operating systems the upstream build system supports.
    #[serde(default = "default_native_os")]
    pub native_build_os: Vec<Os>,
}

impl Default for PlatformSection {
    fn default() -> Self {
        PlatformSection {
            native_build_os: default_native_os(),
        }
    }
}

/// How to bootstrap, configure and compile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutotoolsSection {
    /// Script that generates `configure`, relative to the source folder.
    #[serde(default = "default_bootstrap")]
    pub bootstrap: String,

    /// Variables set only while the bootstrap script runs.
    #[serde(default = "default_bootstrap_env")]
    pub bootstrap_env: BTreeMap<String, String>,

    /// Baseline feature flags passed to `configure`.
    #[serde(default)]
    pub configure_args: Vec<String>,

    /// Flag that receives the static-analysis compiler, e.g.
    /// `--with-static-compiler`.
    #[serde(default)]
    pub static_compiler_arg: Option<String>,

    /// Boolean option selecting shared (true) or static (false) linkage.
    #[serde(default)]
    pub linkage_option: Option<String>,

    /// Boolean option controlling `-fPIC`.
    #[serde(default)]
    pub pic_option: Option<String>,

    /// Variables overridden in the configure environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for AutotoolsSection {
    fn default() -> Self {
        AutotoolsSection {
            bootstrap: default_bootstrap(),
            bootstrap_env: default_bootstrap_env(),
            configure_args: Vec::new(),
            static_compiler_arg: None,
            linkage_option: None,
            pic_option: None,
            env: BTreeMap::new(),
        }
    }
}

/// Header files copied when the library itself cannot be built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadersSection {
    /// Directory in the source tree holding the headers.
    pub src: String,

    #[serde(default = "default_header_pattern")]
    pub pattern: String,

    /// Destination relative to the staging root.
    pub dst: String,

    /// Template files renamed (inside `src`) before copying.
    #[serde(default)]
    pub renames: Vec<Rename>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// What consumers see.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoSection {
    /// Include directories appended to the defaults.
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Link names, exported only when the library was built.
    #[serde(default)]
    pub libs: Vec<String>,
}

fn default_tag() -> String {
    "v{version}".to_string()
}

fn default_subfolder() -> String {
    "source_subfolder".to_string()
}

fn default_true() -> bool {
    true
}

fn default_native_os() -> Vec<Os> {
    vec![Os::Linux]
}

fn default_bootstrap() -> String {
    "./autogen.sh".to_string()
}

fn default_bootstrap_env() -> BTreeMap<String, String> {
    BTreeMap::from([("NOCONFIGURE".to_string(), "1".to_string())])
}

fn default_header_pattern() -> String {
    "*.h".to_string()
}

impl Recipe {
    /// Parse a recipe from TOML text.
    pub fn parse(contents: &str) -> Result<Self, RecipeError> {
        let recipe: Recipe =
            toml::from_str(contents).map_err(|e| RecipeError::InvalidRecipe(e.to_string()))?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Load a recipe file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe: {}", path.display()))?;

        Self::parse(&contents).with_context(|| format!("failed to load recipe: {}", path.display()))
    }

    /// The built-in libostree recipe.
    pub fn libostree() -> Result<Self, RecipeError> {
        Self::parse(LIBOSTREE_RECIPE)
    }

    /// Check cross-references between sections.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.package.name.trim().is_empty() || self.package.version.trim().is_empty() {
            return Err(RecipeError::InvalidRecipe(
                "package name and version must not be empty".to_string(),
            ));
        }

        for (name, decl) in &self.options {
            if !decl.values.contains(&decl.default) {
                return Err(RecipeError::InvalidRecipe(format!(
                    "default `{}` of option `{}` is not an allowed value",
                    decl.default, name
                )));
            }
        }

        let referenced = [
            ("linkage_option", &self.autotools.linkage_option),
            ("pic_option", &self.autotools.pic_option),
        ];
        for (field, option) in referenced {
            if let Some(option) = option {
                match self.options.get(option) {
                    Some(decl) if decl.default.as_bool().is_some() => {}
                    Some(_) => {
                        return Err(RecipeError::InvalidRecipe(format!(
                            "autotools.{} `{}` must be a boolean option",
                            field, option
                        )))
                    }
                    None => {
                        return Err(RecipeError::InvalidRecipe(format!(
                            "autotools.{} refers to undeclared option `{}`",
                            field, option
                        )))
                    }
                }
            }
        }

        for arg in &self.autotools.configure_args {
            if arg.contains("able-shared") || arg.contains("able-static") {
                return Err(RecipeError::InvalidRecipe(format!(
                    "`{}` must not be listed in configure_args; linkage is chosen by autotools.linkage_option",
                    arg
                )));
            }
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.package.name
    }

    pub fn version(&self) -> &str {
        &self.package.version
    }

    /// The upstream tag to check out.
    pub fn tag(&self) -> String {
        self.source.tag.replace("{version}", &self.package.version)
    }

    /// Option values before any override.
    pub fn default_options(&self) -> OptionValues {
        OptionValues::from_defaults(&self.options)
    }

    /// Identity of the binary package produced for `settings` and `options`.
    ///
    /// Two builds with the same id are interchangeable.
    pub fn package_id(&self, settings: &BuildSettings, options: &OptionValues) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.package.name);
        fp.update_str(&self.package.version);

        for (key, value) in settings.entries() {
            fp.update_str(key).update_str(&value);
        }
        for (name, value) in options.iter() {
            fp.update_str(name).update_str(&value.to_string());
        }

        fp.finish_short()
    }
}
