//! Database model: the decoded tree handed to callers.
//!
//! This module provides:
//! - `Database`, the root of a decoded file, and its `Metadata`
//! - `Group` and `Entry`, the owned tree (`group`, `entry`)
//! - `TimeInfo` timestamps (`times`)
//! - Icon references and 16×16 custom icons (`icon`)

pub mod entry;
pub mod group;
pub mod icon;
pub mod times;

use std::collections::BTreeMap;

pub use entry::Entry;
pub use group::Group;
pub use icon::{CustomIcon, CustomIconId, Icon};
pub use times::TimeInfo;

/// Database-wide data that is not part of the group tree.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub(crate) custom_icons: BTreeMap<CustomIconId, CustomIcon>,
}

impl Metadata {
    pub fn custom_icons(&self) -> &BTreeMap<CustomIconId, CustomIcon> {
        &self.custom_icons
    }

    pub fn custom_icon(&self, id: CustomIconId) -> Option<&CustomIcon> {
        self.custom_icons.get(&id)
    }
}

/// A fully decoded KeePass 1.x database.
///
/// Owns one synthetic root group whose children are the file's
/// top-level groups.
#[derive(Debug, Clone)]
pub struct Database {
    pub(crate) root: Group,
    pub(crate) metadata: Metadata,
}

impl Database {
    pub fn root_group(&self) -> &Group {
        &self.root
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Number of groups, not counting the synthetic root.
    pub fn group_count(&self) -> usize {
        self.root.walk().count() - 1
    }

    /// Number of entries in all groups.
    pub fn entry_count(&self) -> usize {
        self.root.walk().map(|g| g.entries().len()).sum()
    }

    /// Resolve an icon reference to its bitmap, if it is a custom icon.
    pub fn custom_icon(&self, icon: Icon) -> Option<&CustomIcon> {
        match icon {
            Icon::Custom(id) => self.metadata.custom_icon(id),
            Icon::Number(_) => None,
        }
    }

    /// Iterate over every entry with the group that owns it.
    pub fn entries(&self) -> impl Iterator<Item = (&Group, &Entry)> {
        self.root
            .walk()
            .flat_map(|g| g.entries().iter().map(move |e| (g, e)))
    }

    /// First entry whose title matches exactly.
    pub fn find_entry(&self, title: &str) -> Option<&Entry> {
        self.entries()
            .map(|(_, e)| e)
            .find(|e| e.title() == title)
    }
}
