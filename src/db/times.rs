use chrono::{DateTime, Utc};

/// Creation, modification, access and expiry times of a group or entry.
///
/// `expiry_time` is only meaningful when `expires` is true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeInfo {
    pub(crate) creation_time: Option<DateTime<Utc>>,
    pub(crate) last_modification_time: Option<DateTime<Utc>>,
    pub(crate) last_access_time: Option<DateTime<Utc>>,
    pub(crate) expiry_time: Option<DateTime<Utc>>,
    pub(crate) expires: bool,
}

impl TimeInfo {
    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        self.creation_time
    }

    pub fn last_modification_time(&self) -> Option<DateTime<Utc>> {
        self.last_modification_time
    }

    pub fn last_access_time(&self) -> Option<DateTime<Utc>> {
        self.last_access_time
    }

    pub fn expiry_time(&self) -> Option<DateTime<Utc>> {
        self.expiry_time
    }

    pub fn expires(&self) -> bool {
        self.expires
    }

    /// Set the expiry; a missing time (the "never" sentinel) clears it.
    pub(crate) fn set_expiry(&mut self, expiry: Option<DateTime<Utc>>) {
        self.expiry_time = expiry;
        self.expires = expiry.is_some();
    }
}
