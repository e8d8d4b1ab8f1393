//! `kdb1 list`: display all entries in a table.

use std::path::Path;

use crate::cli::{open_database, output, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, file: &Path) -> Result<()> {
    let db = open_database(cli, file)?;

    output::info(&format!("{} entries", db.entry_count()));
    output::print_entries_table(&db);

    Ok(())
}
