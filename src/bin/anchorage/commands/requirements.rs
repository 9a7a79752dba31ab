//! `anchorage requirements` command

use anyhow::Result;

use anchorage::ops::requirements;

use crate::commands::open_session;
use crate::GlobalOptions;

pub fn execute(global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;

    for reference in requirements(&session) {
        println!("{}", reference);
    }

    Ok(())
}
