//! Content decryption: CBC mode with PKCS#7 padding, then SHA-256 check.
//!
//! The body after the header is encrypted with AES-256 or Twofish-256 in
//! CBC mode.  A wrong key decrypts "successfully" to garbage at the
//! cipher layer, so two checks follow:
//!
//! 1. the PKCS#7 padding of the final block must be well formed;
//! 2. `SHA-256(plaintext)` must equal the hash stored in the header.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use twofish::Twofish;
use zeroize::Zeroizing;

use super::keys::MasterKey;
use crate::errors::{Kdb1Error, Result};
use crate::format::header::{Cipher, Header};

/// Cipher block size shared by AES and Twofish.
pub const BLOCK_LEN: usize = 16;

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type TwofishCbcDec = cbc::Decryptor<Twofish>;

/// Decrypt the body of a database and verify it against the header hash.
pub fn decrypt_content(
    header: &Header,
    key: &MasterKey,
    body: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let plaintext = decrypt(header.cipher, key, &header.encryption_iv, body)?;
    verify_content_hash(&plaintext, &header.content_hash)?;
    Ok(plaintext)
}

/// Decrypt `ciphertext` in CBC mode and strip the PKCS#7 padding.
///
/// Fails with `BadPadding` if the final block's padding is malformed.
pub fn decrypt(
    cipher: Cipher,
    key: &MasterKey,
    iv: &[u8; 16],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(Kdb1Error::TruncatedStream(format!(
            "encrypted body of {} bytes is not a whole number of {BLOCK_LEN}-byte blocks",
            ciphertext.len()
        )));
    }

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    let plain_len = match cipher {
        Cipher::Aes256 => Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
            .map_err(|e| Kdb1Error::KeyDerivationFailed(format!("AES init failed: {e}")))?
            .decrypt_padded_mut::<Pkcs7>(buffer.as_mut_slice())
            .map_err(|_| Kdb1Error::BadPadding)?
            .len(),
        Cipher::Twofish => TwofishCbcDec::new_from_slices(key.as_bytes(), iv)
            .map_err(|e| Kdb1Error::KeyDerivationFailed(format!("Twofish init failed: {e}")))?
            .decrypt_padded_mut::<Pkcs7>(buffer.as_mut_slice())
            .map_err(|_| Kdb1Error::BadPadding)?
            .len(),
    };

    buffer.truncate(plain_len);
    Ok(buffer)
}

/// Compare `SHA-256(plaintext)` with the expected hash in constant time.
pub fn verify_content_hash(plaintext: &[u8], expected: &[u8; 32]) -> Result<()> {
    let actual = Sha256::digest(plaintext);
    if actual.as_slice().ct_eq(expected.as_slice()).into() {
        Ok(())
    } else {
        Err(Kdb1Error::IntegrityMismatch)
    }
}
