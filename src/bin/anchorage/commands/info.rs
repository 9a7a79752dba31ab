//! `anchorage info` command

use anyhow::Result;

use anchorage::ops::package_info;

use crate::cli::InfoArgs;
use crate::commands::open_session;
use crate::GlobalOptions;

pub fn execute(args: InfoArgs, global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;
    let info = package_info(&session)?;

    if args.flags {
        println!("{}", info.flags(&session.layout.package_dir).join(" "));
    } else {
        println!("{}", serde_json::to_string_pretty(&info)?);
    }

    Ok(())
}
