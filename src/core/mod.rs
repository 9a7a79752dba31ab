//! Core data structures for Anchorage.
//!
//! This module contains the foundational types every hook works with:
//! - Recipes and their declared options
//! - Build settings and platform capabilities
//! - Architecture naming
//! - Package references and errors

pub mod arch;
pub mod error;
pub mod options;
pub mod recipe;
pub mod reference;
pub mod settings;

pub use error::RecipeError;
pub use options::{OptionDecl, OptionValue, OptionValues};
pub use recipe::Recipe;
pub use reference::PackageReference;
pub use settings::{BuildSettings, BuildType, Os, PlatformCaps};
