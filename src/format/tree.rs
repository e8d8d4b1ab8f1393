//! Group tree assembly.
//!
//! Groups arrive flattened in pre-order, each carrying its nesting
//! level.  A stack of open groups rebuilds the hierarchy: before a group
//! is placed, every open group at the same or a deeper level is closed,
//! and the group becomes a child of whatever is left on top.
//!
//! Placement happens in an arena of indices; the owned tree is built
//! once every group, entry and meta stream has been applied.

use std::collections::HashMap;

use super::meta::{self, CustomIcons, MetaStream};
use super::records::{DecodedRecords, EntryRecord};
use crate::db::{CustomIconId, Database, Group, Icon, Metadata};
use crate::errors::{Kdb1Error, Result};

/// Deepest nesting accepted; top-level groups sit at depth 0.
pub const MAX_GROUP_DEPTH: u16 = 256;

struct Slot {
    group: Option<Group>,
    parent: Option<usize>,
}

/// Build the database tree from decoded records.
pub fn assemble(records: DecodedRecords) -> Result<Database> {
    let DecodedRecords { groups, entries } = records;

    let mut slots: Vec<Slot> = Vec::with_capacity(groups.len());
    let mut by_id: HashMap<u32, usize> = HashMap::with_capacity(groups.len());
    let mut open: Vec<usize> = Vec::new();

    for record in groups {
        let group = record.group;
        let level = group.level;

        while let Some(&top) = open.last() {
            if slot_level(&slots, top) < level {
                break;
            }
            open.pop();
        }

        if level >= MAX_GROUP_DEPTH {
            return Err(Kdb1Error::InvalidGroupTree(format!(
                "group {} '{}' is nested {level} levels deep, limit is {MAX_GROUP_DEPTH}",
                group.id, group.name
            )));
        }

        let parent = open.last().copied();
        let expected = match parent {
            Some(top) => slot_level(&slots, top) + 1,
            None => 0,
        };
        if level != expected {
            return Err(Kdb1Error::InvalidGroupTree(format!(
                "group {} '{}' has level {level}, expected {expected}",
                group.id, group.name
            )));
        }

        let index = slots.len();
        if by_id.insert(group.id, index).is_some() {
            return Err(Kdb1Error::InvalidGroupTree(format!(
                "group id {} appears more than once",
                group.id
            )));
        }
        slots.push(Slot {
            group: Some(group),
            parent,
        });
        open.push(index);
    }

    let mut metadata = Metadata::default();
    let mut by_uuid: HashMap<[u8; 16], (usize, usize)> = HashMap::new();
    let mut streams: Vec<EntryRecord> = Vec::new();

    for record in entries {
        if meta::is_meta_stream(&record) {
            streams.push(record);
            continue;
        }

        let group_id = record.group_id.unwrap_or_default();
        let index = *by_id
            .get(&group_id)
            .ok_or(Kdb1Error::OrphanEntry(group_id))?;
        let group = group_mut(&mut slots, index)?;
        by_uuid.insert(record.entry.uuid, (index, group.entries.len()));
        group.entries.push(record.entry);
    }

    tracing::debug!(streams = streams.len(), "applying meta streams");
    for record in &streams {
        match meta::parse(record)? {
            Some(MetaStream::GroupTreeState(states)) => {
                for (id, expanded) in states {
                    if let Some(&index) = by_id.get(&id) {
                        group_mut(&mut slots, index)?.expanded = expanded;
                    }
                }
            }
            Some(MetaStream::CustomIcons(icons)) => {
                apply_custom_icons(icons, &mut slots, &by_id, &by_uuid, &mut metadata)?;
            }
            None => {}
        }
    }

    let roots = build_owned(slots)?;
    Ok(Database {
        root: Group::root(roots),
        metadata,
    })
}

fn apply_custom_icons(
    block: CustomIcons,
    slots: &mut [Slot],
    by_id: &HashMap<u32, usize>,
    by_uuid: &HashMap<[u8; 16], (usize, usize)>,
    metadata: &mut Metadata,
) -> Result<()> {
    let base = metadata.custom_icons.len() as u32;
    let count = block.icons.len() as u32;
    for (offset, icon) in (0u32..).zip(block.icons) {
        metadata.custom_icons.insert(CustomIconId(base + offset), icon);
    }

    let resolve = |index: u32| (index < count).then(|| Icon::Custom(CustomIconId(base + index)));

    for (uuid, index) in block.entry_links {
        let (Some(icon), Some(&(group, position))) = (resolve(index), by_uuid.get(&uuid)) else {
            tracing::debug!(index, "skipping custom icon link to unknown entry or icon");
            continue;
        };
        if let Some(entry) = group_mut(slots, group)?.entries.get_mut(position) {
            entry.icon = icon;
        }
    }

    for (group_id, index) in block.group_links {
        let (Some(icon), Some(&group)) = (resolve(index), by_id.get(&group_id)) else {
            tracing::debug!(group_id, index, "skipping custom icon link to unknown group or icon");
            continue;
        };
        group_mut(slots, group)?.icon = icon;
    }
    Ok(())
}

/// Move every group into its parent.
///
/// A parent always precedes its children, so walking the arena backwards
/// finishes each group before it is moved.  Children are pushed in
/// reverse and flipped once when their parent is taken.
fn build_owned(mut slots: Vec<Slot>) -> Result<Vec<Group>> {
    let mut roots = Vec::new();

    for index in (0..slots.len()).rev() {
        let mut group = take_group(&mut slots, index)?;
        group.children.reverse();
        let parent = slots[index].parent;
        match parent {
            Some(parent) => group_mut(&mut slots, parent)?.children.push(group),
            None => roots.push(group),
        }
    }

    roots.reverse();
    Ok(roots)
}

fn slot_level(slots: &[Slot], index: usize) -> u16 {
    slots[index].group.as_ref().map_or(0, |g| g.level)
}

fn group_mut(slots: &mut [Slot], index: usize) -> Result<&mut Group> {
    slots
        .get_mut(index)
        .and_then(|slot| slot.group.as_mut())
        .ok_or_else(|| Kdb1Error::InvalidGroupTree(format!("group slot {index} is empty")))
}

fn take_group(slots: &mut [Slot], index: usize) -> Result<Group> {
    slots
        .get_mut(index)
        .and_then(|slot| slot.group.take())
        .ok_or_else(|| Kdb1Error::InvalidGroupTree(format!("group slot {index} is empty")))
}
