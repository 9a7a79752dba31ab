//! High-level operations.
//!
//! One module per lifecycle hook, plus `create` (all hooks in order) and
//! `export`.

pub mod build;
pub mod build_requirements;
pub mod create;
pub mod export;
pub mod info;
pub mod lifecycle;
pub mod package;
pub mod requirements;
pub mod session;
pub mod source;

pub use build::{build, BuildReport};
pub use build_requirements::{build_requirements, BuildRequirementsReport};
pub use create::{create, CreateOptions, CreateReport};
pub use export::{export, ExportResult};
pub use info::package_info;
pub use lifecycle::Hook;
pub use package::{package, PackageReport};
pub use requirements::requirements;
pub use session::{Session, SessionOptions};
pub use source::{source, SourceOptions};
