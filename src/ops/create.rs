//! `create`: run every lifecycle hook in order.

use anyhow::Result;

use crate::builder::autotools::BuildState;
use crate::builder::context::Notice;
use crate::builder::deps::{HostPackageInstaller, InstallOutcome};
use crate::builder::info::CppInfo;
use crate::builder::package::StagedTree;
use crate::core::reference::PackageReference;
use crate::ops::build::build;
use crate::ops::build_requirements::build_requirements;
use crate::ops::info::package_info;
use crate::ops::lifecycle::Hook;
use crate::ops::package::package;
use crate::ops::session::Session;
use crate::ops::source::{source, SourceOptions};
use crate::sources::git::Checkout;
use crate::util::process::ProcessExecutor;

/// Options for `create`.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub source: SourceOptions,

    /// Reuse an existing checkout instead of fetching again.
    pub keep_source: bool,
}

/// Results of a full run.
#[derive(Debug, Clone)]
pub struct CreateReport {
    /// `None` when an existing checkout was reused.
    pub checkout: Option<Checkout>,
    pub requirements: Vec<PackageReference>,
    pub install: InstallOutcome,
    pub state: BuildState,
    pub tree: StagedTree,
    pub info: CppInfo,
    /// Notices from every hook, in order.
    pub notices: Vec<Notice>,
}

/// Run all hooks. `on_hook` is called before each one starts.
///
/// The first failing hook aborts the run; later hooks never start, so a
/// failed build is never packaged.
pub fn create(
    session: &Session,
    executor: &dyn ProcessExecutor,
    installer: Option<&dyn HostPackageInstaller>,
    opts: &CreateOptions,
    on_hook: &mut dyn FnMut(Hook),
) -> Result<CreateReport> {
    let mut notices = Vec::new();

    on_hook(Hook::Source);
    let checkout = if opts.keep_source && session.layout.source_dir.exists() {
        tracing::info!("reusing checkout at {}", session.layout.source_dir.display());
        None
    } else {
        Some(source(session, &opts.source)?)
    };

    on_hook(Hook::Requirements);
    let requirements = crate::ops::requirements::requirements(session);

    on_hook(Hook::BuildRequirements);
    let reqs = build_requirements(session, executor, installer)?;
    notices.extend(reqs.notices);

    on_hook(Hook::Build);
    let built = build(session, executor)?;
    notices.extend(built.notices);

    on_hook(Hook::Package);
    let packaged = package(session, executor)?;
    notices.extend(packaged.notices);

    on_hook(Hook::PackageInfo);
    let info = package_info(session)?;

    Ok(CreateReport {
        checkout,
        requirements,
        install: reqs.outcome,
        state: built.state,
        tree: packaged.tree,
        info,
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::builder::package::StageKind;
    use crate::ops::session::SessionOptions;
    use crate::test_support::{
        file_url, git_upstream, test_recipe, MockExecutor, MockProcessOutput, SourceTreeFixture,
    };
    use crate::util::config::Config;
    use crate::util::GlobalContext;

    fn session(tmp: &TempDir, os: &str) -> Session {
        let upstream = tmp.path().join("upstream");
        git_upstream(&upstream, &SourceTreeFixture::libostree(), "v2022.1").unwrap();

        let gctx = GlobalContext::with_dirs(tmp.path().join("proj"), tmp.path().join("home"));
        let opts = SessionOptions {
            settings: vec![("os".to_string(), os.to_string())],
            ..SessionOptions::default()
        };
        Session::resolve(&gctx, test_recipe(&file_url(&upstream)), Config::default(), &opts).unwrap()
    }

    fn full_history() -> CreateOptions {
        CreateOptions {
            source: SourceOptions { depth: Some(0) },
            keep_source: false,
        }
    }

    #[test]
    fn test_create_headers_only() {
        let tmp = TempDir::new().unwrap();
        let session = session(&tmp, "Macos");
        let exec = MockExecutor::new();
        let mut hooks = Vec::new();

        let report = create(&session, &exec, None, &full_history(), &mut |h| hooks.push(h)).unwrap();

        assert_eq!(hooks, Hook::ALL.to_vec());
        assert!(report.checkout.is_some());
        assert_eq!(report.state, BuildState::Skipped);
        assert_eq!(report.tree.kind, StageKind::HeadersOnly);
        assert!(report.info.libs.is_empty());
        assert!(report
            .tree
            .root()
            .join("include/ostree-1/ostree-version.h")
            .exists());
        assert!(exec.commands().is_empty());
    }

    #[test]
    fn test_failed_build_is_never_packaged() {
        let tmp = TempDir::new().unwrap();
        let session = session(&tmp, "Linux");
        let exec = MockExecutor::succeeding();
        exec.expect("make", MockProcessOutput::failure(2, "error: ostree-repo.c"));
        let mut hooks = Vec::new();

        let err = create(&session, &exec, None, &full_history(), &mut |h| hooks.push(h)).unwrap_err();

        assert!(format!("{:#}", err).contains("compile failed"));
        assert_eq!(hooks.last(), Some(&Hook::Build));
        assert!(exec.commands().iter().all(|c| c != "make install"));
        assert!(!session.layout.package_dir.join("anchorage-info.json").exists());
    }

    #[test]
    fn test_create_linux_stages_install() {
        let tmp = TempDir::new().unwrap();
        let session = session(&tmp, "Linux");
        let exec = MockExecutor::succeeding();

        let report = create(&session, &exec, None, &full_history(), &mut |_| {}).unwrap();

        assert_eq!(report.state, BuildState::Built);
        assert_eq!(report.tree.kind, StageKind::Installed);
        assert_eq!(report.info.libs, vec!["ostree-1"]);
        assert_eq!(exec.commands().last().map(String::as_str), Some("make install"));
        // no apt on the mock: one warning from build_requirements
        assert_eq!(report.install, InstallOutcome::NoInstaller);
    }
}
