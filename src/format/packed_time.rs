//! The 5-byte packed date-time used by KeePass 1.x.
//!
//! 40 bits, most significant first:
//!
//! ```text
//! year:14 | month:4 | day:5 | hour:5 | minute:6 | second:6
//! ```
//!
//! Times are UTC.  2999-12-28 23:59:59 means "never".

use chrono::{DateTime, NaiveDate, Utc};

/// Size of a packed time field.
pub const PACKED_TIME_LEN: usize = 5;

/// Calendar fields of a packed time, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

const NEVER: PackedFields = PackedFields {
    year: 2999,
    month: 12,
    day: 28,
    hour: 23,
    minute: 59,
    second: 59,
};

/// Split the 40 packed bits into calendar fields.
pub fn unpack_fields(data: &[u8; PACKED_TIME_LEN]) -> PackedFields {
    let [b1, b2, b3, b4, b5] = (*data).map(u32::from);

    PackedFields {
        year: ((b1 << 6) | (b2 >> 2)) as i32,
        month: ((b2 & 0x03) << 2) | (b3 >> 6),
        day: (b3 >> 1) & 0x1F,
        hour: ((b3 & 0x01) << 4) | (b4 >> 4),
        minute: ((b4 & 0x0F) << 2) | (b5 >> 6),
        second: b5 & 0x3F,
    }
}

/// Decode a packed time.
///
/// Returns `None` for the "never" sentinel and for bit patterns that do
/// not name a real calendar time.
pub fn unpack(data: &[u8; PACKED_TIME_LEN]) -> Option<DateTime<Utc>> {
    let fields = unpack_fields(data);
    if fields == NEVER {
        return None;
    }

    NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day)
        .and_then(|date| date.and_hms_opt(fields.hour, fields.minute, fields.second))
        .map(|naive| naive.and_utc())
}
