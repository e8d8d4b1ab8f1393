//! Generic type-length-value field reader.
//!
//! The decrypted body is a flat sequence of fields:
//!
//! ```text
//! [type: u16 LE][length: u32 LE][value: length bytes]
//! ```
//!
//! The reader only knows about this framing; what a field means is
//! decided by the record decoders in `records`.

use crate::errors::{Kdb1Error, Result};

/// Size of the type + length prefix of every field.
pub const FIELD_PREFIX_LEN: usize = 2 + 4;

/// One raw field borrowed from the decrypted stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub code: u16,
    pub value: &'a [u8],
}

/// Cursor over the decrypted body.
#[derive(Debug)]
pub struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Byte offset of the next field.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Read the next field.
    ///
    /// Fails with `TruncatedStream` if the prefix or the declared value
    /// length runs past the end of the data.  Never reads out of bounds.
    pub fn next_field(&mut self) -> Result<Field<'a>> {
        let start = self.pos;
        let prefix = self
            .data
            .get(start..start + FIELD_PREFIX_LEN)
            .ok_or_else(|| {
                Kdb1Error::TruncatedStream(format!(
                    "field header at offset {start} needs {FIELD_PREFIX_LEN} bytes, {} left",
                    self.remaining()
                ))
            })?;

        let code = u16::from_le_bytes([prefix[0], prefix[1]]);
        let len = u32::from_le_bytes([prefix[2], prefix[3], prefix[4], prefix[5]]);

        let value_start = start + FIELD_PREFIX_LEN;
        let value = usize::try_from(len)
            .ok()
            .and_then(|len| value_start.checked_add(len))
            .and_then(|end| self.data.get(value_start..end))
            .ok_or_else(|| {
                Kdb1Error::TruncatedStream(format!(
                    "field {code:#06x} at offset {start} declares {len} bytes, {} left",
                    self.data.len() - value_start
                ))
            })?;

        self.pos = value_start + value.len();
        Ok(Field { code, value })
    }
}
