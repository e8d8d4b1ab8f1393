//! `kdb1 info`: print the unencrypted header.

use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use crate::cli::output;
use crate::errors::{Kdb1Error, Result};
use crate::format::Header;

/// Execute the `info` command.
pub fn execute(file: &Path) -> Result<()> {
    let data = std::fs::read(file).map_err(|source| Kdb1Error::OpenFailed {
        path: file.to_path_buf(),
        source,
    })?;
    let (header, body) = Header::split(&data)?;

    output::info(&format!("{}", file.display()));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Version".to_string(), format!("{:#010x}", header.version)]);
    table.add_row(vec!["Cipher".to_string(), header.cipher.to_string()]);
    table.add_row(vec![
        "Transform rounds".to_string(),
        header.transform_rounds.to_string(),
    ]);
    table.add_row(vec!["Groups".to_string(), header.num_groups.to_string()]);
    table.add_row(vec!["Entries".to_string(), header.num_entries.to_string()]);
    table.add_row(vec!["Encrypted bytes".to_string(), body.len().to_string()]);
    println!("{table}");

    Ok(())
}
