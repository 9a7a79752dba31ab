//! Pinned package references, e.g. `libglib2.0-0/2.56.4@totemic/stable`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::error::RecipeError;

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9_][A-Za-z0-9_.+-]*)/(?P<version>[A-Za-z0-9_.+-]+)(?:@(?P<user>[A-Za-z0-9_.+-]+)/(?P<channel>[A-Za-z0-9_.+-]+))?$",
    )
    .expect("reference pattern is valid")
});

/// A reference to a package published in the ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageReference {
    pub name: String,
    pub version: String,
    pub user: Option<String>,
    pub channel: Option<String>,
}

impl PackageReference {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        PackageReference {
            name: name.into(),
            version: version.into(),
            user: None,
            channel: None,
        }
    }
}

impl FromStr for PackageReference {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = REFERENCE_RE
            .captures(s.trim())
            .ok_or_else(|| RecipeError::InvalidReference(s.to_string()))?;

        Ok(PackageReference {
            name: caps["name"].to_string(),
            version: caps["version"].to_string(),
            user: caps.name("user").map(|m| m.as_str().to_string()),
            channel: caps.name("channel").map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
            write!(f, "@{}/{}", user, channel)?;
        }
        Ok(())
    }
}

impl Serialize for PackageReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
