//! Recipe lifecycle hooks.

use std::fmt;
use std::str::FromStr;

/// A lifecycle hook. Hooks run in the order declared here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hook {
    Source,
    Requirements,
    BuildRequirements,
    Build,
    Package,
    PackageInfo,
}

impl Hook {
    /// Every hook, in execution order.
    pub const ALL: [Hook; 6] = [
        Hook::Source,
        Hook::Requirements,
        Hook::BuildRequirements,
        Hook::Build,
        Hook::Package,
        Hook::PackageInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::Source => "source",
            Hook::Requirements => "requirements",
            Hook::BuildRequirements => "build_requirements",
            Hook::Build => "build",
            Hook::Package => "package",
            Hook::PackageInfo => "package_info",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Hook::ALL
            .iter()
            .copied()
            .find(|h| h.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown hook '{}'; expected one of {}",
                    s,
                    Hook::ALL.map(|h| h.as_str()).join(", ")
                )
            })
    }
}
