//! Recipe error types.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error raised while running a recipe.
///
/// Every variant is fatal for the lifecycle hook that produced it. An
/// unsupported target platform is not an error; it is reported through
/// notices instead.
#[derive(Debug, Error, Diagnostic)]
pub enum RecipeError {
    #[error("failed to fetch `{url}` at `{reference}`")]
    #[diagnostic(
        code(anchorage::source::fetch),
        help("check that the remote is reachable and the tag exists")
    )]
    Fetch {
        url: String,
        reference: String,
        #[source]
        source: git2::Error,
    },

    #[error("failed to install build dependencies: `{command}` exited with {}", display_status(.status))]
    #[diagnostic(code(anchorage::deps::install))]
    DependencyInstall {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{step} failed: `{command}` exited with {}", display_status(.status))]
    #[diagnostic(
        code(anchorage::build::tool),
        help("the build tree may be partially built; rerun or clean the work directory")
    )]
    BuildTool {
        step: String,
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{step} failed: could not start `{command}`: {reason}")]
    #[diagnostic(
        code(anchorage::process::spawn),
        help("make sure the tool is installed and on PATH")
    )]
    Spawn {
        step: String,
        command: String,
        reason: String,
    },

    #[error("{action} `{}`", .path.display())]
    #[diagnostic(code(anchorage::package::io))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid recipe: {0}")]
    #[diagnostic(code(anchorage::recipe::invalid))]
    InvalidRecipe(String),

    #[error("invalid setting `{key}={value}`: {reason}")]
    #[diagnostic(code(anchorage::settings::invalid))]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid value `{value}` for option `{name}` (allowed: {allowed})")]
    #[diagnostic(code(anchorage::options::invalid))]
    InvalidOption {
        name: String,
        value: String,
        allowed: String,
    },

    #[error("invalid package reference `{0}`")]
    #[diagnostic(
        code(anchorage::reference::invalid),
        help("references look like `name/version` or `name/version@user/channel`")
    )]
    InvalidReference(String),
}

impl RecipeError {
    /// Build an I/O error for a path.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecipeError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Captured stderr of the failing process, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            RecipeError::DependencyInstall { stderr, .. } | RecipeError::BuildTool { stderr, .. } => {
                Some(stderr)
            }
            _ => None,
        }
    }
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tool_message() {
        let err = RecipeError::BuildTool {
            step: "compile".to_string(),
            command: "make".to_string(),
            status: Some(2),
            stderr: "boom".to_string(),
        };

        assert_eq!(err.to_string(), "compile failed: `make` exited with exit code 2");
        assert_eq!(err.stderr(), Some("boom"));
    }

    #[test]
    fn test_signal_status_message() {
        let err = RecipeError::DependencyInstall {
            command: "apt-get install -y bison".to_string(),
            status: None,
            stderr: String::new(),
        };

        assert!(err.to_string().contains("terminated by signal"));
    }
}
