//! Builds KeePass 1.x files for the integration tests.
//!
//! Encryption and key stretching are done here directly with the cipher
//! crates so the reader is checked against an independent key schedule.

#![allow(dead_code)]

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockEncrypt, BlockEncryptMut, KeyInit, KeyIvInit};
use sha2::{Digest, Sha256};
use twofish::Twofish;

pub const SIGNATURE_1: u32 = 0x9AA2_D903;
pub const SIGNATURE_2: u32 = 0xB54B_FB65;
pub const VERSION: u32 = 0x0003_0002;
pub const FLAG_SHA2: u32 = 1;
pub const FLAG_RIJNDAEL: u32 = 2;
pub const FLAG_TWOFISH: u32 = 8;

/// Transform rounds used by fixtures; small enough to keep tests fast.
pub const ROUNDS: u32 = 1_000;

/// Packed "never expires" time, 2999-12-28 23:59:59.
pub const NEVER: [u8; 5] = [0x2E, 0xDF, 0x39, 0x7E, 0xFB];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureCipher {
    Aes,
    Twofish,
}

// ── Field encoding ───────────────────────────────────────────────────

pub fn field(code: u16, value: &[u8]) -> Vec<u8> {
    let mut out = code.to_le_bytes().to_vec();
    out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    out.extend_from_slice(value);
    out
}

pub fn text_field(code: u16, value: &str) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.push(0);
    field(code, &bytes)
}

pub fn end_field() -> Vec<u8> {
    field(0xFFFF, &[])
}

/// Pack a date-time into the 5-byte on-disk form.
pub fn pack_time(year: u32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> [u8; 5] {
    [
        (year >> 6) as u8,
        (((year & 0x3F) << 2) | (month >> 2)) as u8,
        (((month & 0x3) << 6) | (day << 1) | (hour >> 4)) as u8,
        (((hour & 0xF) << 4) | (minute >> 2)) as u8,
        (((minute & 0x3) << 6) | second) as u8,
    ]
}

// ── Records ──────────────────────────────────────────────────────────

pub fn group_record(id: u32, name: &str, level: u16, icon: u32) -> Vec<u8> {
    let created = pack_time(2010, 6, 1, 12, 0, 0);
    let mut out = field(0x0001, &id.to_le_bytes());
    out.extend(text_field(0x0002, name));
    out.extend(field(0x0003, &created));
    out.extend(field(0x0004, &created));
    out.extend(field(0x0005, &created));
    out.extend(field(0x0006, &NEVER));
    out.extend(field(0x0007, &icon.to_le_bytes()));
    out.extend(field(0x0008, &level.to_le_bytes()));
    out.extend(field(0x0009, &0u32.to_le_bytes()));
    out.extend(end_field());
    out
}

#[derive(Debug, Clone)]
pub struct EntryDef {
    pub uuid: [u8; 16],
    pub group_id: u32,
    pub icon: u32,
    pub title: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub notes: String,
    pub expiry: [u8; 5],
    pub attachment: Option<(String, Vec<u8>)>,
}

impl EntryDef {
    pub fn new(uuid_byte: u8, group_id: u32, title: &str) -> Self {
        Self {
            uuid: [uuid_byte; 16],
            group_id,
            icon: 0,
            title: title.to_string(),
            url: String::new(),
            username: String::new(),
            password: String::new(),
            notes: String::new(),
            expiry: NEVER,
            attachment: None,
        }
    }

    pub fn record(&self) -> Vec<u8> {
        let created = pack_time(2010, 6, 1, 12, 0, 0);
        let mut out = field(0x0001, &self.uuid);
        out.extend(field(0x0002, &self.group_id.to_le_bytes()));
        out.extend(field(0x0003, &self.icon.to_le_bytes()));
        out.extend(text_field(0x0004, &self.title));
        out.extend(text_field(0x0005, &self.url));
        out.extend(text_field(0x0006, &self.username));
        out.extend(text_field(0x0007, &self.password));
        out.extend(text_field(0x0008, &self.notes));
        out.extend(field(0x0009, &created));
        out.extend(field(0x000A, &created));
        out.extend(field(0x000B, &created));
        out.extend(field(0x000C, &self.expiry));
        match &self.attachment {
            Some((name, data)) => {
                out.extend(text_field(0x000D, name));
                out.extend(field(0x000E, data));
            }
            None => {
                out.extend(text_field(0x000D, ""));
                out.extend(field(0x000E, &[]));
            }
        }
        out.extend(end_field());
        out
    }
}

/// A hidden meta-stream entry carrying `data`.
pub fn meta_record(uuid_byte: u8, group_id: u32, notes: &str, data: Vec<u8>) -> Vec<u8> {
    EntryDef {
        url: "$".to_string(),
        username: "SYSTEM".to_string(),
        notes: notes.to_string(),
        attachment: Some(("bin-stream".to_string(), data)),
        ..EntryDef::new(uuid_byte, group_id, "Meta-Info")
    }
    .record()
}

pub fn tree_state_stream(states: &[(u32, bool)]) -> Vec<u8> {
    let mut out = (states.len() as u32).to_le_bytes().to_vec();
    for (id, expanded) in states {
        out.extend(id.to_le_bytes());
        out.push(u8::from(*expanded));
    }
    out
}

/// Custom icon stream with one solid-colour 16×16 icon per entry of `colours`.
pub fn custom_icons_stream(
    colours: &[[u8; 3]],
    entry_links: &[([u8; 16], u32)],
    group_links: &[(u32, u32)],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend((colours.len() as u32).to_le_bytes());
    out.extend((entry_links.len() as u32).to_le_bytes());
    out.extend((group_links.len() as u32).to_le_bytes());
    for colour in colours {
        out.extend(768u32.to_le_bytes());
        for _ in 0..256 {
            out.extend(colour);
        }
    }
    for (uuid, index) in entry_links {
        out.extend(uuid);
        out.extend(index.to_le_bytes());
    }
    for (id, index) in group_links {
        out.extend(id.to_le_bytes());
        out.extend(index.to_le_bytes());
    }
    out
}

// ── Keys ─────────────────────────────────────────────────────────────

/// Composite key for the given sources.
pub fn composite_key(password: Option<&str>, keyfile: Option<&[u8; 32]>) -> [u8; 32] {
    match (password, keyfile) {
        (Some(pw), None) => Sha256::digest(pw.as_bytes()).into(),
        (None, Some(kf)) => *kf,
        (Some(pw), Some(kf)) => {
            let mut hasher = Sha256::new();
            hasher.update(Sha256::digest(pw.as_bytes()));
            hasher.update(kf);
            hasher.finalize().into()
        }
        (None, None) => panic!("fixture needs a key source"),
    }
}

/// Composite key from raw password bytes (for non-UTF-8 encodings).
pub fn composite_key_bytes(password: &[u8]) -> [u8; 32] {
    Sha256::digest(password).into()
}

fn final_key(composite: &[u8; 32], master_seed: &[u8; 16], transform_seed: &[u8; 32], rounds: u32) -> [u8; 32] {
    let cipher = Aes256::new_from_slice(transform_seed).unwrap();
    let mut stretched = *composite;
    for lane in stretched.chunks_exact_mut(16) {
        let block = GenericArray::from_mut_slice(lane);
        for _ in 0..rounds {
            cipher.encrypt_block(block);
        }
    }
    let transformed = Sha256::digest(stretched);

    let mut hasher = Sha256::new();
    hasher.update(master_seed);
    hasher.update(transformed);
    hasher.finalize().into()
}

// ── Files ────────────────────────────────────────────────────────────

/// A KeePass 1.x file under construction.
#[derive(Debug, Clone)]
pub struct KdbFile {
    pub cipher: FixtureCipher,
    pub flags: Option<u32>,
    pub version: u32,
    pub rounds: u32,
    pub groups: Vec<Vec<u8>>,
    pub entries: Vec<Vec<u8>>,
    /// Overrides for the record counts written to the header.
    pub declared_groups: Option<u32>,
    pub declared_entries: Option<u32>,
    /// Bytes appended to the plaintext after the last record.
    pub trailing: Vec<u8>,
}

impl Default for KdbFile {
    fn default() -> Self {
        Self {
            cipher: FixtureCipher::Aes,
            flags: None,
            version: VERSION,
            rounds: ROUNDS,
            groups: Vec::new(),
            entries: Vec::new(),
            declared_groups: None,
            declared_entries: None,
            trailing: Vec::new(),
        }
    }
}

impl KdbFile {
    /// A file holding a single top-level group named `name`.
    pub fn single_group(name: &str) -> Self {
        Self {
            groups: vec![group_record(1, name, 0, 1)],
            ..Self::default()
        }
    }

    pub fn plaintext(&self) -> Vec<u8> {
        let mut plain: Vec<u8> = self.groups.concat();
        plain.extend(self.entries.concat());
        plain.extend(&self.trailing);
        plain
    }

    /// Encrypt with the given composite key.
    pub fn build(&self, composite: &[u8; 32]) -> Vec<u8> {
        let master_seed: [u8; 16] = rand::random();
        let iv: [u8; 16] = rand::random();
        let transform_seed: [u8; 32] = rand::random();

        let plaintext = self.plaintext();
        let key = final_key(composite, &master_seed, &transform_seed, self.rounds);
        let body = match self.cipher {
            FixtureCipher::Aes => cbc::Encryptor::<Aes256>::new_from_slices(&key, &iv)
                .unwrap()
                .encrypt_padded_vec_mut::<Pkcs7>(&plaintext),
            FixtureCipher::Twofish => cbc::Encryptor::<Twofish>::new_from_slices(&key, &iv)
                .unwrap()
                .encrypt_padded_vec_mut::<Pkcs7>(&plaintext),
        };

        let flags = self.flags.unwrap_or(match self.cipher {
            FixtureCipher::Aes => FLAG_SHA2 | FLAG_RIJNDAEL,
            FixtureCipher::Twofish => FLAG_SHA2 | FLAG_TWOFISH,
        });
        let num_groups = self.declared_groups.unwrap_or(self.groups.len() as u32);
        let num_entries = self.declared_entries.unwrap_or(self.entries.len() as u32);

        let mut out = Vec::with_capacity(124 + body.len());
        out.extend(SIGNATURE_1.to_le_bytes());
        out.extend(SIGNATURE_2.to_le_bytes());
        out.extend(flags.to_le_bytes());
        out.extend(self.version.to_le_bytes());
        out.extend(master_seed);
        out.extend(iv);
        out.extend(num_groups.to_le_bytes());
        out.extend(num_entries.to_le_bytes());
        out.extend(Sha256::digest(&plaintext));
        out.extend(transform_seed);
        out.extend(self.rounds.to_le_bytes());
        out.extend(body);
        out
    }

    pub fn build_with_password(&self, password: &str) -> Vec<u8> {
        self.build(&composite_key(Some(password), None))
    }
}

/// The worked example database: two top-level groups, nested
/// subgroups, a collapsed group, an attachment and a custom icon.
///
/// ```text
/// Internet (icon 1)
///   Subgroup 1
///     Unexpanded   (collapsed)
///       abc
///   Subgroup 2
/// eMail (icon 19)
/// ```
pub fn basic_database() -> KdbFile {
    let mut test_entry = EntryDef::new(0x11, 1, "Test entry");
    test_entry.icon = 1;
    test_entry.username = "I".to_string();
    test_entry.url = "http://example.com/".to_string();
    test_entry.password = "secretpassword".to_string();
    test_entry.notes = "Lorem ipsum\ndolor sit amet".to_string();
    test_entry.expiry = pack_time(2012, 5, 9, 10, 32, 0);
    test_entry.attachment = Some(("attachment.txt".to_string(), b"hello world\n".to_vec()));

    let blank_entry = EntryDef::new(0x22, 1, "");

    let mut mail_entry = EntryDef::new(0x33, 6, "Mail account");
    mail_entry.username = "someone@example.com".to_string();

    KdbFile {
        groups: vec![
            group_record(1, "Internet", 0, 1),
            group_record(2, "Subgroup 1", 1, 48),
            group_record(3, "Unexpanded", 2, 48),
            group_record(4, "abc", 3, 48),
            group_record(5, "Subgroup 2", 1, 48),
            group_record(6, "eMail", 0, 19),
        ],
        entries: vec![
            test_entry.record(),
            blank_entry.record(),
            mail_entry.record(),
            meta_record(
                0x44,
                1,
                "KPX_GROUP_TREE_STATE",
                tree_state_stream(&[(1, true), (2, true), (3, false), (4, true), (5, true), (6, true)]),
            ),
            meta_record(
                0x55,
                1,
                "KPX_CUSTOM_ICONS_4",
                custom_icons_stream(&[[8, 160, 60]], &[([0x33; 16], 0)], &[]),
            ),
        ],
        ..KdbFile::default()
    }
}
