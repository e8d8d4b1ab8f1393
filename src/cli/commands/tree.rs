//! `kdb1 tree`: print the group hierarchy.

use std::path::Path;

use crate::cli::{open_database, output, Cli};
use crate::errors::Result;

/// Execute the `tree` command.
pub fn execute(cli: &Cli, file: &Path) -> Result<()> {
    let db = open_database(cli, file)?;

    output::info(&format!(
        "{} group(s), {} entries",
        db.group_count(),
        db.entry_count()
    ));
    output::print_tree(&db);

    Ok(())
}
