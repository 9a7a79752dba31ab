//! Explicit build environments.
//!
//! The orchestrator never mutates its own process environment. Variables
//! meant for a tool live in a [`BuildEnv`] and reach the child only through
//! [`ProcessBuilder::envs`](crate::util::process::ProcessBuilder::envs).
//! Temporary additions use [`BuildEnv::scoped`], which restores the previous
//! values when the guard drops, whether the step succeeded or not.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// A set of environment variables handed to build tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    vars: BTreeMap<String, String>,
}

impl BuildEnv {
    pub fn new() -> Self {
        BuildEnv::default()
    }

    /// Copy the named variables from the current process, if set.
    pub fn capture<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut env = BuildEnv::new();
        for name in names {
            if let Ok(value) = std::env::var(name) {
                env.set(name, value);
            }
        }
        env
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply `overlay` until the returned guard is dropped.
    pub fn scoped<I, K, V>(&mut self, overlay: I) -> EnvScope<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut saved = Vec::new();
        for (key, value) in overlay {
            let key = key.into();
            let previous = self.vars.insert(key.clone(), value.into());
            saved.push((key, previous));
        }

        EnvScope { env: self, saved }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildEnv {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        BuildEnv {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Guard returned by [`BuildEnv::scoped`].
pub struct EnvScope<'a> {
    env: &'a mut BuildEnv,
    saved: Vec<(String, Option<String>)>,
}

impl Deref for EnvScope<'_> {
    type Target = BuildEnv;

    fn deref(&self) -> &BuildEnv {
        self.env
    }
}

impl DerefMut for EnvScope<'_> {
    fn deref_mut(&mut self) -> &mut BuildEnv {
        self.env
    }
}

impl Drop for EnvScope<'_> {
    fn drop(&mut self) {
        // Reverse order so a key overlaid twice ends at its original value.
        while let Some((key, previous)) = self.saved.pop() {
            match previous {
                Some(value) => {
                    self.env.vars.insert(key, value);
                }
                None => {
                    self.env.vars.remove(&key);
                }
            }
        }
    }
}
