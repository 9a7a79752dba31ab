//! Anchorage - declarative build-and-package recipes for autotools libraries
//!
//! A recipe describes where an upstream library lives, what the build
//! machine needs, how to configure it, and what the finished package exposes.
//! This crate fetches, builds and stages such packages; the built-in recipe
//! packages libostree.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for Anchorage unit tests.
///
/// Only available when compiling tests. Provides a recording process
/// executor and fixture trees and git remotes.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{BuildSettings, Os, PackageReference, Recipe, RecipeError};
pub use crate::ops::{Hook, Session, SessionOptions};
pub use crate::util::context::GlobalContext;
