use std::collections::BTreeMap;

use zeroize::Zeroizing;

use super::icon::Icon;
use super::times::TimeInfo;

/// A credential entry, owned by its group.
#[derive(Clone, Default)]
pub struct Entry {
    pub(crate) uuid: [u8; 16],
    pub(crate) title: String,
    pub(crate) username: String,
    pub(crate) url: String,
    pub(crate) password: Zeroizing<String>,
    pub(crate) notes: String,
    pub(crate) icon: Icon,
    pub(crate) times: TimeInfo,
    pub(crate) attachments: BTreeMap<String, Vec<u8>>,
}

impl Entry {
    pub fn uuid(&self) -> &[u8; 16] {
        &self.uuid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn icon(&self) -> Icon {
        self.icon
    }

    /// Built-in icon number, or 0 when a custom icon is set.
    pub fn icon_number(&self) -> u32 {
        match self.icon {
            Icon::Number(n) => n,
            Icon::Custom(_) => 0,
        }
    }

    pub fn time_info(&self) -> &TimeInfo {
        &self.times
    }

    /// Attachments keyed by file name.
    pub fn attachments(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.attachments
    }

    pub fn attachment(&self, name: &str) -> Option<&[u8]> {
        self.attachments.get(name).map(Vec::as_slice)
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("title", &self.title)
            .field("username", &self.username)
            .field("url", &self.url)
            .field("icon", &self.icon)
            .field("attachments", &self.attachments.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
