//! Key-file loading for KeePass 1.x databases.
//!
//! A key file is turned into exactly 32 bytes of key material.  The
//! encoding is detected from the file's size and content:
//!
//! 1. **Binary**: exactly 32 bytes, used verbatim.
//! 2. **Hex**: exactly 64 bytes that are all ASCII hex digits, decoded
//!    to 32 bytes.
//! 3. **Hashed**: anything else, SHA-256 of the whole file.
//!
//! An empty file means "no key file" rather than an error, so the
//! composite key falls back to the password alone.

use std::fs;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Kdb1Error, Result};

/// Length of key material produced from any key file (256 bits).
pub const KEY_MATERIAL_LEN: usize = 32;

/// Length of a hex-encoded key file.
const HEX_KEYFILE_LEN: usize = KEY_MATERIAL_LEN * 2;

/// How the key material was recovered from the key file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFileEncoding {
    Binary,
    Hex,
    Hashed,
}

impl std::fmt::Display for KeyFileEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Binary => "binary (32 bytes)",
            Self::Hex => "hex (64 characters)",
            Self::Hashed => "hashed (SHA-256 of file)",
        };
        f.write_str(name)
    }
}

/// 32 bytes of key material derived from a key file.
///
/// Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyFileMaterial {
    bytes: [u8; KEY_MATERIAL_LEN],
    #[zeroize(skip)]
    encoding: KeyFileEncoding,
}

impl KeyFileMaterial {
    /// Wrap already-derived key material (e.g. passed in by a caller).
    pub fn from_bytes(bytes: [u8; KEY_MATERIAL_LEN]) -> Self {
        Self {
            bytes,
            encoding: KeyFileEncoding::Binary,
        }
    }

    /// Interpret raw key-file contents.
    ///
    /// Returns `None` for empty input.
    pub fn from_contents(data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        if data.len() == KEY_MATERIAL_LEN {
            let mut bytes = [0u8; KEY_MATERIAL_LEN];
            bytes.copy_from_slice(data);
            return Some(Self {
                bytes,
                encoding: KeyFileEncoding::Binary,
            });
        }

        // A 64-byte file that is not valid hex is hashed like any other file.
        if data.len() == HEX_KEYFILE_LEN {
            let mut bytes = [0u8; KEY_MATERIAL_LEN];
            if hex::decode_to_slice(data, &mut bytes).is_ok() {
                return Some(Self {
                    bytes,
                    encoding: KeyFileEncoding::Hex,
                });
            }
        }

        Some(Self {
            bytes: Sha256::digest(data).into(),
            encoding: KeyFileEncoding::Hashed,
        })
    }

    /// Access the raw key material.
    pub fn as_bytes(&self) -> &[u8; KEY_MATERIAL_LEN] {
        &self.bytes
    }

    /// Which encoding the key file used.
    pub fn encoding(&self) -> KeyFileEncoding {
        self.encoding
    }
}

impl std::fmt::Debug for KeyFileMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFileMaterial")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

/// Read a key file from any reader and derive its key material.
///
/// Returns `Ok(None)` when the stream is empty.
pub fn read_keyfile<R: Read>(mut reader: R) -> Result<Option<KeyFileMaterial>> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| Kdb1Error::InvalidKeyFile(format!("failed to read key file: {e}")))?;

    let material = KeyFileMaterial::from_contents(&data);
    data.zeroize();
    Ok(material)
}

/// Load a key file from disk.
pub fn load_keyfile(path: &Path) -> Result<Option<KeyFileMaterial>> {
    if !path.exists() {
        return Err(Kdb1Error::InvalidKeyFile(format!(
            "key file not found at {}",
            path.display()
        )));
    }

    let file = fs::File::open(path)
        .map_err(|e| Kdb1Error::InvalidKeyFile(format!("failed to open key file: {e}")))?;
    read_keyfile(file)
}
