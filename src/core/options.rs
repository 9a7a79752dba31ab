//! Package options declared by a recipe and their resolved values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::RecipeError;

/// A single option value: a boolean toggle or an enumerated choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Choice(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Choice(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(true) => f.write_str("True"),
            OptionValue::Bool(false) => f.write_str("False"),
            OptionValue::Choice(s) => f.write_str(s),
        }
    }
}

/// Declaration of an option in a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Allowed values.
    pub values: Vec<OptionValue>,

    /// Value used when nothing overrides it.
    pub default: OptionValue,
}

impl OptionDecl {
    /// Declare a boolean option.
    pub fn boolean(default: bool) -> Self {
        OptionDecl {
            values: vec![OptionValue::Bool(true), OptionValue::Bool(false)],
            default: OptionValue::Bool(default),
        }
    }

    fn is_boolean(&self) -> bool {
        self.values.iter().all(|v| matches!(v, OptionValue::Bool(_)))
    }

    /// Parse `raw` into a value allowed by this declaration.
    fn parse(&self, name: &str, raw: &str) -> Result<OptionValue, RecipeError> {
        let value = if self.is_boolean() {
            match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(OptionValue::Bool(true)),
                "false" | "0" | "no" | "off" => Some(OptionValue::Bool(false)),
                _ => None,
            }
        } else {
            Some(OptionValue::Choice(raw.to_string()))
        };

        match value {
            Some(v) if self.values.contains(&v) => Ok(v),
            _ => Err(RecipeError::InvalidOption {
                name: name.to_string(),
                value: raw.to_string(),
                allowed: self
                    .values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// Resolved option values for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionValues {
    values: BTreeMap<String, OptionValue>,
}

impl OptionValues {
    /// Start from the declared defaults.
    pub fn from_defaults(decls: &BTreeMap<String, OptionDecl>) -> Self {
        OptionValues {
            values: decls
                .iter()
                .map(|(name, decl)| (name.clone(), decl.default.clone()))
                .collect(),
        }
    }

    /// Override one option from its textual form.
    pub fn set(
        &mut self,
        decls: &BTreeMap<String, OptionDecl>,
        name: &str,
        raw: &str,
    ) -> Result<(), RecipeError> {
        let decl = decls.get(name).ok_or_else(|| RecipeError::InvalidOption {
            name: name.to_string(),
            value: raw.to_string(),
            allowed: format!(
                "declared options are {}",
                decls.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        })?;

        let value = decl.parse(name, raw)?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Boolean value of an option; absent or non-boolean options read as false.
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(OptionValue::as_bool).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
