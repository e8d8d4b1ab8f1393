//! KeePass 1.x file format.
//!
//! This module provides:
//! - The fixed 124-byte header (`header`)
//! - The TLV field framing of the decrypted body (`fields`)
//! - Packed 5-byte timestamps (`packed_time`)
//! - Group and entry record decoding (`records`)
//! - Meta-stream entries: tree state and custom icons (`meta`)
//! - Group tree assembly (`tree`)

pub mod fields;
pub mod header;
pub mod meta;
pub mod packed_time;
pub mod records;
pub mod tree;

pub use header::{Cipher, Header, HEADER_SIZE};
pub use records::decode_records;
pub use tree::{assemble, MAX_GROUP_DEPTH};
