//! Composite key construction and final key digest.
//!
//! The composite key is the 32-byte seed that gets stretched by the key
//! transform.  It is built from the password, the key-file material, or
//! both:
//!
//! - password only: `SHA-256(password)`
//! - key file only: the 32 bytes of key material
//! - both: `SHA-256(SHA-256(password) || key material)`
//!
//! After stretching, the content key is `SHA-256(master_seed || transformed)`.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::keyfile::KeyFileMaterial;
use crate::errors::{Kdb1Error, Result};

/// Length of every key in the derivation chain (256 bits).
pub const KEY_LEN: usize = 32;

/// The composite key, wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CompositeKey {
    bytes: [u8; KEY_LEN],
}

impl CompositeKey {
    /// Combine the available key sources.
    ///
    /// An empty password counts as no password.  Fails with
    /// `NoKeySource` when neither source is present.
    pub fn new(password: Option<&[u8]>, keyfile: Option<&KeyFileMaterial>) -> Result<Self> {
        let password = password.filter(|pw| !pw.is_empty());

        let bytes = match (password, keyfile) {
            (None, None) => return Err(Kdb1Error::NoKeySource),
            (Some(pw), None) => Sha256::digest(pw).into(),
            (None, Some(kf)) => *kf.as_bytes(),
            (Some(pw), Some(kf)) => {
                let mut hasher = Sha256::new();
                hasher.update(Sha256::digest(pw));
                hasher.update(kf.as_bytes());
                hasher.finalize().into()
            }
        };

        Ok(Self { bytes })
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// The final content-decryption key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Derive the content key from the header's master seed and the
    /// stretched key.
    pub fn derive(master_seed: &[u8], transformed_key: &[u8; KEY_LEN]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(master_seed);
        hasher.update(transformed_key);
        Self {
            bytes: hasher.finalize().into(),
        }
    }

    /// Access the raw key bytes (e.g. to initialise a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Byte encodings of `password` to try, most likely first.
///
/// Always yields the UTF-8 bytes.  Older KeePass 1.x clients hashed the
/// password in the system code page, so when `legacy` is set and the
/// password has non-ASCII characters that all fit in one byte, the
/// Latin-1 bytes are tried as well.
pub fn password_encodings(password: &str, legacy: bool) -> Vec<Zeroizing<Vec<u8>>> {
    let mut candidates = vec![Zeroizing::new(password.as_bytes().to_vec())];

    if legacy && !password.is_ascii() && password.chars().all(|c| u32::from(c) <= 0xFF) {
        let latin1: Vec<u8> = password.chars().map(|c| u32::from(c) as u8).collect();
        candidates.push(Zeroizing::new(latin1));
    }
    candidates
}
