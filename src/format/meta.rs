//! Meta-stream entries.
//!
//! KeePass 1.x clients store extra data as hidden entries inside the
//! regular entry stream.  These are recognised by a fixed set of field
//! values, consumed while building the tree, and never shown as entries.

use super::records::EntryRecord;
use crate::db::CustomIcon;
use crate::errors::{Kdb1Error, Result};

const META_TITLE: &str = "Meta-Info";
const META_USERNAME: &str = "SYSTEM";
const META_URL: &str = "$";
const META_ATTACHMENT: &str = "bin-stream";

/// Notes value of the group expansion stream.
pub const GROUP_TREE_STATE: &str = "KPX_GROUP_TREE_STATE";
/// Notes value of the custom icon stream.
pub const CUSTOM_ICONS: &str = "KPX_CUSTOM_ICONS_4";

/// A decoded meta stream.
#[derive(Debug)]
pub enum MetaStream {
    /// `(group id, expanded)` pairs.
    GroupTreeState(Vec<(u32, bool)>),
    CustomIcons(CustomIcons),
}

/// Contents of a custom icon stream.
///
/// Links refer to icons by their position in `icons`.
#[derive(Debug, Default)]
pub struct CustomIcons {
    pub icons: Vec<CustomIcon>,
    pub entry_links: Vec<([u8; 16], u32)>,
    pub group_links: Vec<(u32, u32)>,
}

/// Whether an entry record is a meta stream rather than a real entry.
pub fn is_meta_stream(record: &EntryRecord) -> bool {
    let entry = &record.entry;
    entry.title() == META_TITLE
        && entry.username() == META_USERNAME
        && entry.url() == META_URL
        && entry.icon_number() == 0
        && !entry.notes().is_empty()
        && entry.attachments().len() == 1
        && entry.attachment(META_ATTACHMENT).is_some()
}

/// Decode a meta stream.
///
/// Returns `Ok(None)` for streams that are unknown or unusable but not
/// fatal.  A damaged custom icon stream is an error.
pub fn parse(record: &EntryRecord) -> Result<Option<MetaStream>> {
    let entry = &record.entry;
    let data = entry.attachment(META_ATTACHMENT).unwrap_or_default();

    match entry.notes() {
        GROUP_TREE_STATE => Ok(parse_group_tree_state(data).map(MetaStream::GroupTreeState)),
        CUSTOM_ICONS => parse_custom_icons(data).map(|icons| Some(MetaStream::CustomIcons(icons))),
        other => {
            tracing::warn!(stream = other, "ignoring unknown meta stream");
            Ok(None)
        }
    }
}

fn parse_group_tree_state(data: &[u8]) -> Option<Vec<(u32, bool)>> {
    let Some(count) = data.get(..4).map(le_u32) else {
        tracing::warn!(len = data.len(), "group tree state stream is too short, ignoring");
        return None;
    };

    let items = &data[4..];
    if items.len() as u64 != u64::from(count) * 5 {
        tracing::warn!(
            count,
            len = data.len(),
            "group tree state stream has the wrong length, ignoring"
        );
        return None;
    }

    Some(
        items
            .chunks_exact(5)
            .map(|chunk| (le_u32(&chunk[..4]), chunk[4] != 0))
            .collect(),
    )
}

fn parse_custom_icons(data: &[u8]) -> Result<CustomIcons> {
    let mut cursor = Cursor { data, pos: 0 };

    let num_icons = cursor.u32("icon count")?;
    let num_entries = cursor.u32("entry link count")?;
    let num_groups = cursor.u32("group link count")?;

    let mut parsed = CustomIcons::default();

    for index in 0..num_icons {
        let size = cursor.u32("icon size")? as usize;
        let rgb = cursor.take(size, "icon pixels")?;
        let icon = CustomIcon::from_rgb(rgb).ok_or_else(|| {
            Kdb1Error::BadIconData(format!("icon {index} has {size} bytes of pixel data"))
        })?;
        parsed.icons.push(icon);
    }

    for _ in 0..num_entries {
        let uuid: [u8; 16] = cursor
            .take(16, "entry uuid")?
            .try_into()
            .map_err(|_| Kdb1Error::BadIconData("entry uuid".into()))?;
        let icon = cursor.u32("entry icon index")?;
        parsed.entry_links.push((uuid, icon));
    }

    for _ in 0..num_groups {
        let group_id = cursor.u32("group id")?;
        let icon = cursor.u32("group icon index")?;
        parsed.group_links.push((group_id, icon));
    }

    Ok(parsed)
}

fn le_u32(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(word)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.data.len());
        let Some(end) = end else {
            return Err(Kdb1Error::BadIconData(format!(
                "stream ends before {what} at offset {}",
                self.pos
            )));
        };
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        self.take(4, what).map(le_u32)
    }
}
