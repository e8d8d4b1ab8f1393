//! Fixed-layout KeePass 1.x file header.
//!
//! ```text
//! offset  size  field
//!      0     4  signature 1 (0x9AA2D903)
//!      4     4  signature 2 (0xB54BFB65)
//!      8     4  flags (cipher selection)
//!     12     4  version
//!     16    16  master seed
//!     32    16  encryption IV
//!     48     4  number of groups
//!     52     4  number of entries
//!     56    32  SHA-256 of the decrypted content
//!     88    32  transform seed
//!    120     4  transform rounds
//!    124     …  encrypted body
//! ```
//!
//! All integers are little-endian.

use crate::errors::{Kdb1Error, Result};

pub const SIGNATURE_1: u32 = 0x9AA2_D903;
pub const SIGNATURE_2: u32 = 0xB54B_FB65;

/// Version written by KeePass 1.x.  Only the critical bits must match.
pub const FILE_VERSION: u32 = 0x0003_0002;
const FILE_VERSION_CRITICAL_MASK: u32 = 0xFFFF_FF00;

/// Header flag bits.
pub const FLAG_SHA2: u32 = 1;
pub const FLAG_RIJNDAEL: u32 = 2;
pub const FLAG_ARCFOUR: u32 = 4;
pub const FLAG_TWOFISH: u32 = 8;

/// Fixed header size, including the two 4-byte signatures.
pub const HEADER_SIZE: usize = 4 + 4 + 4 + 4 + 16 + 16 + 4 + 4 + 32 + 32 + 4;

/// Block cipher used for the database content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cipher {
    Aes256,
    Twofish,
}

impl Cipher {
    /// Pick the cipher from the header flags.  AES wins if both bits are set.
    pub fn from_flags(flags: u32) -> Result<Self> {
        if flags & FLAG_RIJNDAEL != 0 {
            Ok(Self::Aes256)
        } else if flags & FLAG_TWOFISH != 0 {
            Ok(Self::Twofish)
        } else {
            Err(Kdb1Error::UnknownCipher(flags))
        }
    }

    /// The flag bit that selects this cipher.
    pub fn flag(self) -> u32 {
        match self {
            Self::Aes256 => FLAG_RIJNDAEL,
            Self::Twofish => FLAG_TWOFISH,
        }
    }
}

impl std::fmt::Display for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aes256 => f.write_str("AES-256"),
            Self::Twofish => f.write_str("Twofish-256"),
        }
    }
}

/// Parsed KeePass 1.x header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub flags: u32,
    pub version: u32,
    pub cipher: Cipher,
    pub master_seed: [u8; 16],
    pub encryption_iv: [u8; 16],
    pub num_groups: u32,
    pub num_entries: u32,
    pub content_hash: [u8; 32],
    pub transform_seed: [u8; 32],
    pub transform_rounds: u32,
}

impl Header {
    /// Parse the fixed header prefix of `data`.
    ///
    /// Reads at most `HEADER_SIZE` bytes; everything after that is the
    /// encrypted body.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Kdb1Error::TruncatedStream(format!(
                "file is {} bytes, shorter than the {HEADER_SIZE}-byte header",
                data.len()
            )));
        }

        if read_u32_le(data, 0)? != SIGNATURE_1 || read_u32_le(data, 4)? != SIGNATURE_2 {
            return Err(Kdb1Error::BadSignature);
        }

        let flags = read_u32_le(data, 8)?;
        let version = read_u32_le(data, 12)?;
        if version & FILE_VERSION_CRITICAL_MASK != FILE_VERSION & FILE_VERSION_CRITICAL_MASK {
            return Err(Kdb1Error::UnsupportedVersion(version));
        }

        let cipher = Cipher::from_flags(flags)?;

        Ok(Header {
            flags,
            version,
            cipher,
            master_seed: copy_array::<16>(data, 16)?,
            encryption_iv: copy_array::<16>(data, 32)?,
            num_groups: read_u32_le(data, 48)?,
            num_entries: read_u32_le(data, 52)?,
            content_hash: copy_array::<32>(data, 56)?,
            transform_seed: copy_array::<32>(data, 88)?,
            transform_rounds: read_u32_le(data, 120)?,
        })
    }

    /// Split a whole file into its parsed header and encrypted body.
    pub fn split(data: &[u8]) -> Result<(Self, &[u8])> {
        let header = Self::parse(data)?;
        Ok((header, &data[HEADER_SIZE..]))
    }
}

fn read_u32_le(data: &[u8], start: usize) -> Result<u32> {
    Ok(u32::from_le_bytes(copy_array::<4>(data, start)?))
}

fn copy_array<const N: usize>(data: &[u8], start: usize) -> Result<[u8; N]> {
    let slice = data
        .get(start..start + N)
        .ok_or_else(|| Kdb1Error::TruncatedStream(format!("header field at offset {start}")))?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}
