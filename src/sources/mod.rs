//! Package sources.
//!
//! Upstream trees are fetched from git repositories at a release tag.

pub mod git;

pub use git::{Checkout, GitCheckout};
