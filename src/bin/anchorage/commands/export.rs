//! `anchorage export` command

use anyhow::Result;

use anchorage::ops::export;
use anchorage::util::shell::Status;

use crate::cli::ExportArgs;
use crate::commands::open_session;
use crate::GlobalOptions;

pub fn execute(args: ExportArgs, global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| session.work_dir.join("export"));
    let result = export(&session, &out_dir)?;

    global
        .shell
        .status(Status::Exported, result.archive.display());
    println!("{}  {}", result.sha256, result.archive.display());

    Ok(())
}
