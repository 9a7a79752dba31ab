//! Build settings supplied by the invoking user or package manager.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::arch;
use crate::core::error::RecipeError;

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    Linux,
    Macos,
    Windows,
    #[serde(rename = "FreeBSD")]
    FreeBsd,
    Android,
}

impl Os {
    /// Operating system this binary runs on.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "macos" => Os::Macos,
            "windows" => Os::Windows,
            "freebsd" => Os::FreeBsd,
            "android" => Os::Android,
            _ => Os::Linux,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "Linux",
            Os::Macos => "Macos",
            Os::Windows => "Windows",
            Os::FreeBsd => "FreeBSD",
            Os::Android => "Android",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" => Ok(Os::Macos),
            "windows" => Ok(Os::Windows),
            "freebsd" => Ok(Os::FreeBsd),
            "android" => Ok(Os::Android),
            _ => Err(format!(
                "unknown os '{}'; expected Linux, Macos, Windows, FreeBSD or Android",
                s
            )),
        }
    }
}

/// Build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }

    /// Optimization and debug-info flags for C compilers.
    pub fn cflags(&self) -> &'static [&'static str] {
        match self {
            BuildType::Debug => &["-g"],
            BuildType::Release => &["-O3"],
            BuildType::RelWithDebInfo => &["-O2", "-g"],
            BuildType::MinSizeRel => &["-Os"],
        }
    }

    /// Whether assertions are compiled out.
    pub fn defines_ndebug(&self) -> bool {
        !matches!(self, BuildType::Debug)
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(format!(
                "unknown build type '{}'; expected Debug, Release, RelWithDebInfo or MinSizeRel",
                s
            )),
        }
    }
}

/// Settings for one build invocation. Read-only once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    pub os: Os,
    pub compiler: String,
    pub build_type: BuildType,
    pub arch: String,
}

impl BuildSettings {
    /// Settings describing the host machine.
    pub fn host() -> Self {
        BuildSettings {
            os: Os::host(),
            compiler: "gcc".to_string(),
            build_type: BuildType::Release,
            arch: arch::host_arch().to_string(),
        }
    }

    /// Set a single setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), RecipeError> {
        let invalid = |reason: String| RecipeError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };

        match key {
            "os" => self.os = value.parse().map_err(invalid)?,
            "build_type" => self.build_type = value.parse().map_err(invalid)?,
            "compiler" => self.compiler = value.to_string(),
            "arch" => {
                if value.is_empty() {
                    return Err(invalid("architecture must not be empty".to_string()));
                }
                self.arch = value.to_string();
            }
            _ => {
                return Err(invalid(
                    "unknown setting; expected os, compiler, build_type or arch".to_string(),
                ))
            }
        }

        Ok(())
    }

    /// Settings as sorted key/value pairs.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("arch", self.arch.clone()),
            ("build_type", self.build_type.to_string()),
            ("compiler", self.compiler.clone()),
            ("os", self.os.to_string()),
        ]
    }

    /// Whether the target architecture differs from the host's.
    pub fn is_cross(&self) -> bool {
        self.arch != arch::host_arch()
    }
}

/// What the target platform can do for a given recipe.
///
/// Computed once from the settings and threaded through every component,
/// so no component compares OS strings itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCaps {
    /// The library can be compiled natively for this target.
    pub supports_native_build: bool,
}

impl PlatformCaps {
    /// Capabilities of `settings.os` given the operating systems a recipe
    /// can build on.
    pub fn new(settings: &BuildSettings, native_build_os: &[Os]) -> Self {
        PlatformCaps {
            supports_native_build: native_build_os.contains(&settings.os),
        }
    }
}
