//! `kdb1 keyfile`: check a key file and report its encoding.

use std::path::Path;

use crate::cli::output;
use crate::crypto::{load_keyfile, KeyFileEncoding};
use crate::errors::{Kdb1Error, Result};

/// Execute the `keyfile` command.
pub fn execute(path: &Path) -> Result<()> {
    let material = load_keyfile(path)?
        .ok_or_else(|| Kdb1Error::InvalidKeyFile(format!("{} is empty", path.display())))?;

    output::success(&format!(
        "{} is a usable key file ({})",
        path.display(),
        material.encoding()
    ));
    if material.encoding() == KeyFileEncoding::Hashed {
        output::warning("the whole file is hashed, so any edit to it changes the key");
    }

    Ok(())
}
