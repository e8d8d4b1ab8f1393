//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::KeyFileMaterial;
use crate::db::Database;
use crate::errors::{Kdb1Error, Result};
use crate::reader::Kdb1Reader;

/// Environment variable holding the database password for scripted use.
pub const PASSWORD_ENV: &str = "KDB1_PASSWORD";

/// kdb1: read KeePass 1.x password databases.
#[derive(Parser)]
#[command(
    name = "kdb1",
    about = "Inspect KeePass 1.x (.kdb) password databases",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Key file to use with (or instead of) the password
    #[arg(short, long, global = true)]
    pub keyfile: Option<PathBuf>,

    /// Open with the key file only, without asking for a password
    #[arg(long, global = true)]
    pub no_password: bool,

    /// Log filter used when KDB1_LOG is not set (e.g. debug, kdb1=trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Show the unencrypted header (no password needed)
    Info {
        /// Path to the .kdb file
        file: PathBuf,
    },

    /// Print the group hierarchy
    Tree {
        /// Path to the .kdb file
        file: PathBuf,
    },

    /// List all entries
    List {
        /// Path to the .kdb file
        file: PathBuf,
    },

    /// Show a single entry
    Show {
        /// Path to the .kdb file
        file: PathBuf,
        /// Entry title
        title: String,
        /// Print the password instead of masking it
        #[arg(long)]
        reveal: bool,
    },

    /// Check a key file and report how it is interpreted
    Keyfile {
        /// Path to the key file
        path: PathBuf,
    },

    /// Run the cryptographic self test
    SelfTest,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, ignore_case = true)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the database password, trying in order:
/// 1. `KDB1_PASSWORD` env var
/// 2. Interactive prompt
///
/// Returns `None` with `--no-password`.
pub fn prompt_password(cli: &Cli) -> Result<Option<Zeroizing<String>>> {
    if cli.no_password {
        return Ok(None);
    }

    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Some(Zeroizing::new(pw)));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter database password")
        .allow_empty_password(cli.keyfile.is_some())
        .interact()
        .map_err(|e| Kdb1Error::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Some(Zeroizing::new(pw)))
}

/// Load the key file from `--keyfile`, if given.
///
/// An empty key file is rejected here so the user hears about it
/// instead of getting a generic wrong-key error.
pub fn load_keyfile(cli: &Cli) -> Result<Option<KeyFileMaterial>> {
    let Some(path) = &cli.keyfile else {
        return Ok(None);
    };

    match crate::crypto::load_keyfile(path)? {
        Some(material) => Ok(Some(material)),
        None => Err(Kdb1Error::InvalidKeyFile(format!(
            "{} is empty",
            path.display()
        ))),
    }
}

/// Settings from `.kdb1.toml` in the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Ask for credentials and open the database at `path`.
pub fn open_database(cli: &Cli, path: &Path) -> Result<Database> {
    let keyfile = load_keyfile(cli)?;
    if cli.no_password && keyfile.is_none() {
        return Err(Kdb1Error::NoKeySource);
    }
    let password = prompt_password(cli)?;

    let mut reader = Kdb1Reader::with_settings(load_settings()?);
    reader.read_database(path, password.as_deref().map(String::as_str), keyfile.as_ref())
}
