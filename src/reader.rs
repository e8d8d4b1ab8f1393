//! High-level database reading.
//!
//! `Kdb1Reader` runs the whole pipeline: header parsing, key
//! derivation, content decryption, record decoding and tree assembly.
//! The error of the most recent read is kept on the reader so callers
//! that only want a message can ask for it afterwards.

use std::io::Read;
use std::path::Path;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::{
    self, decrypt_content, password_encodings, transform_key_with_params, CompositeKey,
    KeyFileMaterial, MasterKey,
};
use crate::db::Database;
use crate::errors::{Kdb1Error, Result};
use crate::format::{self, Header};

/// Reader for KeePass 1.x (`.kdb`) databases.
#[derive(Debug, Default)]
pub struct Kdb1Reader {
    settings: Settings,
    last_error: Option<String>,
}

impl Kdb1Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader using the given settings instead of the defaults.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            last_error: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read and decrypt the database at `path`.
    ///
    /// At least one of `password` and `keyfile` must be given; an empty
    /// password counts as none.
    pub fn read_database(
        &mut self,
        path: &Path,
        password: Option<&str>,
        keyfile: Option<&KeyFileMaterial>,
    ) -> Result<Database> {
        tracing::debug!(path = %path.display(), "reading database");
        let result = std::fs::read(path)
            .map_err(|source| Kdb1Error::OpenFailed {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|data| decode(&data, password, keyfile, &self.settings));
        self.remember(result)
    }

    /// Read and decrypt a database already held in memory.
    pub fn read_database_bytes(
        &mut self,
        data: &[u8],
        password: Option<&str>,
        keyfile: Option<&KeyFileMaterial>,
    ) -> Result<Database> {
        let result = decode(data, password, keyfile, &self.settings);
        self.remember(result)
    }

    /// Whether the most recent read failed.
    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    /// Message of the most recent failure, if any.
    pub fn error_string(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Derive key-file material from a reader.
    ///
    /// Returns `Ok(None)` for an empty source.
    pub fn read_keyfile<R: Read>(reader: R) -> Result<Option<KeyFileMaterial>> {
        crypto::read_keyfile(reader)
    }

    fn remember<T>(&mut self, result: Result<T>) -> Result<T> {
        self.last_error = result.as_ref().err().map(ToString::to_string);
        if let Some(message) = &self.last_error {
            tracing::debug!(error = %message, "database read failed");
        }
        result
    }
}

fn decode(
    data: &[u8],
    password: Option<&str>,
    keyfile: Option<&KeyFileMaterial>,
    settings: &Settings,
) -> Result<Database> {
    let (header, body) = Header::split(data)?;
    tracing::debug!(
        cipher = %header.cipher,
        version = format_args!("{:#010x}", header.version),
        rounds = header.transform_rounds,
        groups = header.num_groups,
        entries = header.num_entries,
        "parsed header"
    );

    let max_rounds = settings.max_transform_rounds;
    if header.transform_rounds > max_rounds {
        return Err(Kdb1Error::ExcessiveRounds {
            rounds: header.transform_rounds,
            max: max_rounds,
        });
    }

    let plaintext = unlock(&header, body, password, keyfile, settings)?;
    tracing::debug!(len = plaintext.len(), "content decrypted and verified");

    let records = format::decode_records(&plaintext, header.num_groups, header.num_entries)?;
    let database = format::assemble(records)?;
    tracing::debug!(
        groups = database.group_count(),
        entries = database.entry_count(),
        icons = database.metadata().custom_icons().len(),
        "database assembled"
    );
    Ok(database)
}

/// Try each candidate encoding of the password until one decrypts the
/// content with a matching hash.
fn unlock(
    header: &Header,
    body: &[u8],
    password: Option<&str>,
    keyfile: Option<&KeyFileMaterial>,
    settings: &Settings,
) -> Result<Zeroizing<Vec<u8>>> {
    let candidates: Vec<Option<Zeroizing<Vec<u8>>>> = match password.filter(|pw| !pw.is_empty()) {
        Some(pw) => password_encodings(pw, settings.legacy_password_encodings)
            .into_iter()
            .map(Some)
            .collect(),
        None => vec![None],
    };
    let params = settings.transform_params();

    for (attempt, candidate) in candidates.iter().enumerate() {
        let composite = CompositeKey::new(candidate.as_deref().map(Vec::as_slice), keyfile)?;
        let transformed = transform_key_with_params(
            &composite,
            &header.transform_seed,
            header.transform_rounds,
            &params,
        )?;
        let key = MasterKey::derive(&header.master_seed, &transformed);

        match decrypt_content(header, &key, body) {
            Ok(plaintext) => return Ok(plaintext),
            // A wrong key usually breaks the padding before the hash check.
            Err(Kdb1Error::BadPadding | Kdb1Error::IntegrityMismatch) => {
                tracing::debug!(attempt, "key candidate rejected");
            }
            Err(e) => return Err(e),
        }
    }

    Err(Kdb1Error::IntegrityMismatch)
}
