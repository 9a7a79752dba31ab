//! `requirements` hook: runtime dependencies of the package.

use crate::core::reference::PackageReference;
use crate::ops::session::Session;

/// Pinned runtime requirements, in declaration order.
pub fn requirements(session: &Session) -> Vec<PackageReference> {
    session.recipe.requirements.requires.clone()
}
