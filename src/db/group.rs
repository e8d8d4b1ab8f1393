use super::entry::Entry;
use super::icon::Icon;
use super::times::TimeInfo;

/// A group in the database tree.
///
/// Children and entries keep the order in which they appeared in the
/// file.  A group exclusively owns both.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) icon: Icon,
    pub(crate) expanded: bool,
    pub(crate) level: u16,
    pub(crate) flags: u32,
    pub(crate) times: TimeInfo,
    pub(crate) children: Vec<Group>,
    pub(crate) entries: Vec<Entry>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            icon: Icon::default(),
            expanded: true,
            level: 0,
            flags: 0,
            times: TimeInfo::default(),
            children: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl Group {
    /// The synthetic group that owns every top-level group.
    pub(crate) fn root(children: Vec<Group>) -> Self {
        Self {
            name: "Root".to_string(),
            children,
            ..Self::default()
        }
    }

    /// Group id as stored in the file (0 for the synthetic root).
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Nesting level from the file (top-level groups are 0).
    pub fn level(&self) -> u16 {
        self.level
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn time_info(&self) -> &TimeInfo {
        &self.times
    }

    pub fn children(&self) -> &[Group] {
        &self.children
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Depth-first, pre-order walk over this group and all descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Iterator returned by `Group::walk`.
pub struct Walk<'a> {
    stack: Vec<&'a Group>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Group;

    fn next(&mut self) -> Option<Self::Item> {
        let group = self.stack.pop()?;
        self.stack.extend(group.children.iter().rev());
        Some(group)
    }
}
