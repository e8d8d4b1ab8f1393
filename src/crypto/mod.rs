//! Cryptographic primitives for KeePass 1.x databases.
//!
//! This module provides:
//! - Key-file loading with binary / hex / hashed detection (`keyfile`)
//! - Composite key and final content key construction (`keys`)
//! - The AES-ECB key strengthening transform (`kdf`)
//! - AES-256 / Twofish-256 CBC content decryption (`encryption`)
//! - A known-answer self test (`selftest`)

pub mod encryption;
pub mod kdf;
pub mod keyfile;
pub mod keys;
pub mod selftest;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{read_keyfile, CompositeKey, transform_key, ...};
pub use encryption::{decrypt, decrypt_content, verify_content_hash};
pub use kdf::{transform_key, transform_key_with_params, TransformParams};
pub use keyfile::{load_keyfile, read_keyfile, KeyFileEncoding, KeyFileMaterial};
pub use keys::{password_encodings, CompositeKey, MasterKey};
