//! Known-answer self test of the primitives the reader depends on.
//!
//! Vectors: SHA-256 from FIPS 180-2, AES-256 CBC from NIST SP 800-38A
//! F.2.5, AES-256 ECB from FIPS 197 C.3, Twofish-256 CBC reusing the
//! SP 800-38A key, IV and plaintext.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Digest, Sha256};
use twofish::Twofish;

use crate::errors::{Kdb1Error, Result};

const SHA256_INPUT: &str = "abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
const SHA256_DIGEST: &str = "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1";

const CBC_KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
const CBC_IV: &str = "000102030405060708090a0b0c0d0e0f";
const CBC_PLAIN: &str = "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51";
const AES_CBC_CIPHER: &str = "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d";
const TWOFISH_CBC_CIPHER: &str =
    "e0227c3cc80f3cb1b2ed847cc6f57d3c657b1e7960b30fb7c8d62e72ae37c3a0";

const ECB_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
const ECB_PLAIN: &str = "00112233445566778899aabbccddeeff";
const ECB_CIPHER: &str = "8ea2b7ca516745bfeafc49904b496089";

/// Run every check, stopping at the first failure.
pub fn run() -> Result<()> {
    test_sha256()?;
    test_aes256_cbc()?;
    test_aes256_ecb()?;
    test_twofish_cbc()?;
    tracing::debug!("crypto self test passed");
    Ok(())
}

fn unhex(s: &'static str) -> Result<Vec<u8>> {
    hex::decode(s).map_err(|_| Kdb1Error::SelfTestFailed("malformed test vector"))
}

fn test_sha256() -> Result<()> {
    let digest = Sha256::digest(SHA256_INPUT.as_bytes());
    if digest.as_slice() != unhex(SHA256_DIGEST)?.as_slice() {
        return Err(Kdb1Error::SelfTestFailed("SHA-256 mismatch"));
    }
    Ok(())
}

fn test_aes256_cbc() -> Result<()> {
    let key = unhex(CBC_KEY)?;
    let iv = unhex(CBC_IV)?;
    let plain = unhex(CBC_PLAIN)?;
    let expected = unhex(AES_CBC_CIPHER)?;

    let mut data = plain.clone();
    let len = data.len();
    cbc::Encryptor::<Aes256>::new_from_slices(&key, &iv)
        .map_err(|_| Kdb1Error::SelfTestFailed("AES-256 CBC init"))?
        .encrypt_padded_mut::<NoPadding>(&mut data, len)
        .map_err(|_| Kdb1Error::SelfTestFailed("AES-256 CBC encryption"))?;
    if data != expected {
        return Err(Kdb1Error::SelfTestFailed("AES-256 CBC encryption mismatch"));
    }

    cbc::Decryptor::<Aes256>::new_from_slices(&key, &iv)
        .map_err(|_| Kdb1Error::SelfTestFailed("AES-256 CBC init"))?
        .decrypt_padded_mut::<NoPadding>(&mut data)
        .map_err(|_| Kdb1Error::SelfTestFailed("AES-256 CBC decryption"))?;
    if data != plain {
        return Err(Kdb1Error::SelfTestFailed("AES-256 CBC decryption mismatch"));
    }
    Ok(())
}

fn test_aes256_ecb() -> Result<()> {
    let key = unhex(ECB_KEY)?;
    let plain = unhex(ECB_PLAIN)?;
    let expected = unhex(ECB_CIPHER)?;

    let aes = Aes256::new_from_slice(&key).map_err(|_| Kdb1Error::SelfTestFailed("AES-256 init"))?;
    let mut block = GenericArray::clone_from_slice(&plain);
    aes.encrypt_block(&mut block);
    if block.as_slice() != expected.as_slice() {
        return Err(Kdb1Error::SelfTestFailed("AES-256 ECB encryption mismatch"));
    }

    aes.decrypt_block(&mut block);
    if block.as_slice() != plain.as_slice() {
        return Err(Kdb1Error::SelfTestFailed("AES-256 ECB decryption mismatch"));
    }
    Ok(())
}

fn test_twofish_cbc() -> Result<()> {
    let key = unhex(CBC_KEY)?;
    let iv = unhex(CBC_IV)?;
    let plain = unhex(CBC_PLAIN)?;
    let expected = unhex(TWOFISH_CBC_CIPHER)?;

    let mut data = plain.clone();
    let len = data.len();
    cbc::Encryptor::<Twofish>::new_from_slices(&key, &iv)
        .map_err(|_| Kdb1Error::SelfTestFailed("Twofish init"))?
        .encrypt_padded_mut::<NoPadding>(&mut data, len)
        .map_err(|_| Kdb1Error::SelfTestFailed("Twofish encryption"))?;
    if data != expected {
        return Err(Kdb1Error::SelfTestFailed("Twofish encryption mismatch"));
    }

    cbc::Decryptor::<Twofish>::new_from_slices(&key, &iv)
        .map_err(|_| Kdb1Error::SelfTestFailed("Twofish init"))?
        .decrypt_padded_mut::<NoPadding>(&mut data)
        .map_err(|_| Kdb1Error::SelfTestFailed("Twofish decryption"))?;
    if data != plain {
        return Err(Kdb1Error::SelfTestFailed("Twofish decryption mismatch"));
    }
    Ok(())
}
