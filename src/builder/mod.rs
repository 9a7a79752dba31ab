//! Build system.
//!
//! This module drives the upstream autotools build and stages its output.

pub mod autotools;
pub mod context;
pub mod deps;
pub mod info;
pub mod package;

pub use autotools::{AutotoolsBuild, BuildState};
pub use context::{Layout, Notice, NoticeLevel, RecipeContext};
pub use deps::{AptInstaller, BuildRequirements, HostPackageInstaller};
pub use info::CppInfo;
pub use package::{StageKind, StagedTree};
