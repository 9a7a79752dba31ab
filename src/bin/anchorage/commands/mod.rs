//! Command implementations

pub mod build;
pub mod build_requirements;
pub mod completions;
pub mod create;
pub mod export;
pub mod info;
pub mod inspect;
pub mod package;
pub mod requirements;
pub mod source;

use anyhow::Result;

use anchorage::builder::{Notice, NoticeLevel};
use anchorage::ops::Session;
use anchorage::util::{GlobalContext, Shell};

use crate::GlobalOptions;

/// Resolve the session every command works on.
pub fn open_session(global: &GlobalOptions) -> Result<Session> {
    let gctx = GlobalContext::new()?;
    Session::open(&gctx, &global.session)
}

/// Show notices collected while running hooks.
pub fn print_notices(shell: &Shell, notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => shell.note(notice),
            NoticeLevel::Warn => shell.warn(notice),
        }
    }
}
