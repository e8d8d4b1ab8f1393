//! `kdb1 show`: print one entry.

use std::path::Path;

use crate::cli::{open_database, output, Cli};
use crate::errors::{Kdb1Error, Result};

/// Execute the `show` command.
pub fn execute(cli: &Cli, file: &Path, title: &str, reveal: bool) -> Result<()> {
    let db = open_database(cli, file)?;

    let entry = db
        .find_entry(title)
        .ok_or_else(|| Kdb1Error::EntryNotFound(title.to_string()))?;

    output::print_entry(entry, reveal);
    if !reveal {
        output::tip("Pass --reveal to print the password.");
    }

    Ok(())
}
