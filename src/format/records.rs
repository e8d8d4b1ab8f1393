//! Group and entry record decoding.
//!
//! The decrypted body holds `num_groups` group records followed by
//! `num_entries` entry records.  Each record is a run of TLV fields
//! closed by field type `0xFFFF`.  Both record kinds are decoded by one
//! loop driven by a table mapping field type → setter; unknown field
//! types are skipped so newer writers stay readable.

use zeroize::Zeroizing;

use super::fields::{Field, FieldReader};
use super::packed_time::{self, PACKED_TIME_LEN};
use crate::db::{Entry, Group, Icon};
use crate::errors::{Kdb1Error, Result};

/// Field type that closes a record.
pub const END_OF_RECORD: u16 = 0xFFFF;

/// Setter applied to a record for one field type.
type Apply<T> = fn(&mut T, &[u8]) -> Result<()>;

/// One row of a decode table.
struct FieldRule<T> {
    code: u16,
    /// Required value length for fixed-size fields.
    size: Option<usize>,
    apply: Apply<T>,
}

const fn rule<T>(code: u16, size: Option<usize>, apply: Apply<T>) -> FieldRule<T> {
    FieldRule { code, size, apply }
}

/// A decoded group plus the markers needed to place it in the tree.
#[derive(Debug, Default)]
pub struct GroupRecord {
    pub group: Group,
    pub(crate) has_id: bool,
    pub(crate) has_level: bool,
}

/// A decoded entry plus the id of the group that owns it.
#[derive(Debug, Default)]
pub struct EntryRecord {
    pub entry: Entry,
    pub group_id: Option<u32>,
    pub(crate) has_uuid: bool,
    pub(crate) attachment_name: String,
    pub(crate) attachment_data: Vec<u8>,
}

/// Everything read from the decrypted body, in stream order.
#[derive(Debug, Default)]
pub struct DecodedRecords {
    pub groups: Vec<GroupRecord>,
    pub entries: Vec<EntryRecord>,
}

const GROUP_FIELDS: &[FieldRule<GroupRecord>] = &[
    rule(0x0000, None, |_, _| Ok(())),
    rule(0x0001, Some(4), |r, v| {
        r.group.id = le_u32(0x0001, v)?;
        r.has_id = true;
        Ok(())
    }),
    rule(0x0002, None, |r, v| {
        r.group.name = text(v);
        Ok(())
    }),
    rule(0x0003, Some(PACKED_TIME_LEN), |r, v| {
        r.group.times.creation_time = time(0x0003, v)?;
        Ok(())
    }),
    rule(0x0004, Some(PACKED_TIME_LEN), |r, v| {
        r.group.times.last_modification_time = time(0x0004, v)?;
        Ok(())
    }),
    rule(0x0005, Some(PACKED_TIME_LEN), |r, v| {
        r.group.times.last_access_time = time(0x0005, v)?;
        Ok(())
    }),
    rule(0x0006, Some(PACKED_TIME_LEN), |r, v| {
        r.group.times.set_expiry(time(0x0006, v)?);
        Ok(())
    }),
    rule(0x0007, Some(4), |r, v| {
        r.group.icon = Icon::Number(le_u32(0x0007, v)?);
        Ok(())
    }),
    rule(0x0008, Some(2), |r, v| {
        r.group.level = le_u16(0x0008, v)?;
        r.has_level = true;
        Ok(())
    }),
    rule(0x0009, Some(4), |r, v| {
        r.group.flags = le_u32(0x0009, v)?;
        Ok(())
    }),
];

const ENTRY_FIELDS: &[FieldRule<EntryRecord>] = &[
    rule(0x0000, None, |_, _| Ok(())),
    rule(0x0001, Some(16), |r, v| {
        r.entry.uuid = array::<16>(0x0001, v)?;
        r.has_uuid = true;
        Ok(())
    }),
    rule(0x0002, Some(4), |r, v| {
        r.group_id = Some(le_u32(0x0002, v)?);
        Ok(())
    }),
    rule(0x0003, Some(4), |r, v| {
        r.entry.icon = Icon::Number(le_u32(0x0003, v)?);
        Ok(())
    }),
    rule(0x0004, None, |r, v| {
        r.entry.title = text(v);
        Ok(())
    }),
    rule(0x0005, None, |r, v| {
        r.entry.url = text(v);
        Ok(())
    }),
    rule(0x0006, None, |r, v| {
        r.entry.username = text(v);
        Ok(())
    }),
    rule(0x0007, None, |r, v| {
        r.entry.password = Zeroizing::new(text(v));
        Ok(())
    }),
    rule(0x0008, None, |r, v| {
        r.entry.notes = text(v);
        Ok(())
    }),
    rule(0x0009, Some(PACKED_TIME_LEN), |r, v| {
        r.entry.times.creation_time = time(0x0009, v)?;
        Ok(())
    }),
    rule(0x000A, Some(PACKED_TIME_LEN), |r, v| {
        r.entry.times.last_modification_time = time(0x000A, v)?;
        Ok(())
    }),
    rule(0x000B, Some(PACKED_TIME_LEN), |r, v| {
        r.entry.times.last_access_time = time(0x000B, v)?;
        Ok(())
    }),
    rule(0x000C, Some(PACKED_TIME_LEN), |r, v| {
        r.entry.times.set_expiry(time(0x000C, v)?);
        Ok(())
    }),
    rule(0x000D, None, |r, v| {
        r.attachment_name = text(v);
        Ok(())
    }),
    rule(0x000E, None, |r, v| {
        r.attachment_data = v.to_vec();
        Ok(())
    }),
];

/// Decode exactly `num_groups` group records then `num_entries` entry
/// records from the decrypted body.
pub fn decode_records(plaintext: &[u8], num_groups: u32, num_entries: u32) -> Result<DecodedRecords> {
    let mut reader = FieldReader::new(plaintext);
    let mut records = DecodedRecords::default();

    for _ in 0..num_groups {
        records.groups.push(read_group(&mut reader)?);
    }
    for _ in 0..num_entries {
        records.entries.push(read_entry(&mut reader)?);
    }

    if reader.remaining() > 0 {
        tracing::debug!(
            trailing = reader.remaining(),
            "ignoring bytes after the last entry record"
        );
    }
    Ok(records)
}

/// Decode one group record.
pub fn read_group(reader: &mut FieldReader<'_>) -> Result<GroupRecord> {
    let mut record = GroupRecord::default();
    read_record(reader, GROUP_FIELDS, &mut record)?;

    if !record.has_id {
        return Err(Kdb1Error::MalformedField {
            code: 0x0001,
            reason: "group record has no id".into(),
        });
    }
    if !record.has_level {
        return Err(Kdb1Error::MalformedField {
            code: 0x0008,
            reason: format!("group {} has no level", record.group.id),
        });
    }
    Ok(record)
}

/// Decode one entry record.
pub fn read_entry(reader: &mut FieldReader<'_>) -> Result<EntryRecord> {
    let mut record = EntryRecord::default();
    read_record(reader, ENTRY_FIELDS, &mut record)?;

    if !record.has_uuid {
        return Err(Kdb1Error::MalformedField {
            code: 0x0001,
            reason: "entry record has no uuid".into(),
        });
    }
    if record.group_id.is_none() {
        return Err(Kdb1Error::MalformedField {
            code: 0x0002,
            reason: "entry record has no group id".into(),
        });
    }

    if !record.attachment_name.is_empty() {
        let name = std::mem::take(&mut record.attachment_name);
        let data = std::mem::take(&mut record.attachment_data);
        record.entry.attachments.insert(name, data);
    }
    Ok(record)
}

fn read_record<T>(reader: &mut FieldReader<'_>, table: &[FieldRule<T>], record: &mut T) -> Result<()> {
    loop {
        let Field { code, value } = reader.next_field()?;
        if code == END_OF_RECORD {
            return Ok(());
        }

        let Some(rule) = table.iter().find(|rule| rule.code == code) else {
            tracing::debug!(code, len = value.len(), "skipping unknown field");
            continue;
        };

        if let Some(size) = rule.size {
            if value.len() != size {
                return Err(Kdb1Error::MalformedField {
                    code,
                    reason: format!("expected {size} bytes, found {}", value.len()),
                });
            }
        }
        (rule.apply)(record, value)?;
    }
}

/// NUL-terminated UTF-8 text.
fn text(value: &[u8]) -> String {
    let end = value.iter().position(|&b| b == 0).unwrap_or(value.len());
    String::from_utf8_lossy(&value[..end]).into_owned()
}

fn array<const N: usize>(code: u16, value: &[u8]) -> Result<[u8; N]> {
    value.try_into().map_err(|_| Kdb1Error::MalformedField {
        code,
        reason: format!("expected {N} bytes, found {}", value.len()),
    })
}

fn le_u16(code: u16, value: &[u8]) -> Result<u16> {
    Ok(u16::from_le_bytes(array::<2>(code, value)?))
}

fn le_u32(code: u16, value: &[u8]) -> Result<u32> {
    Ok(u32::from_le_bytes(array::<4>(code, value)?))
}

fn time(code: u16, value: &[u8]) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    Ok(packed_time::unpack(&array::<PACKED_TIME_LEN>(code, value)?))
}
