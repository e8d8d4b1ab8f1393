use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while reading a KeePass 1.x database.
#[derive(Debug, Error)]
pub enum Kdb1Error {
    // --- Header errors ---
    #[error("Not a KeePass 1.x database (file signature mismatch)")]
    BadSignature,

    #[error("Unsupported KeePass 1.x database version {0:#010x}")]
    UnsupportedVersion(u32),

    #[error("Unsupported encryption algorithm (header flags {0:#x})")]
    UnknownCipher(u32),

    #[error("Key transform rounds {rounds} exceed the configured ceiling of {max}")]
    ExcessiveRounds { rounds: u32, max: u32 },

    // --- Key errors ---
    #[error("Invalid key file: {0}")]
    InvalidKeyFile(String),

    #[error("No password or key file provided")]
    NoKeySource,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Decryption errors ---
    // Wrong credentials and a damaged file are deliberately reported alike.
    #[error("Wrong password or key file, or the database file is corrupt")]
    IntegrityMismatch,

    #[error("Invalid padding in decrypted content")]
    BadPadding,

    // --- Record stream errors ---
    #[error("Truncated record stream: {0}")]
    TruncatedStream(String),

    #[error("Malformed field {code:#06x}: {reason}")]
    MalformedField { code: u16, reason: String },

    #[error("Entry references group id {0}, which does not exist")]
    OrphanEntry(u32),

    #[error("Invalid group tree: {0}")]
    InvalidGroupTree(String),

    #[error("Invalid custom icon data: {0}")]
    BadIconData(String),

    // --- Crypto self test ---
    #[error("Crypto self test failed: {0}")]
    SelfTestFailed(&'static str),

    // --- IO errors ---
    #[error("Cannot open {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("No entry titled '{0}'")]
    EntryNotFound(String),
}

/// Convenience type alias for kdb1 results.
pub type Result<T> = std::result::Result<T, Kdb1Error>;
