use serde::{Deserialize, Serialize};

use super::entry::Entry;

/// Parent - owner of an ordered sequence of entries
///
/// `entries` has no column of its own; it is rebuilt from the `entries`
/// table on every read and unfolded into entry rows on every write.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parent {
    /// Identity; stored as `parents.parent_pk`
    pub parent_pk: u64,

    /// Owned entries in application order
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Parent {
    /// Create a parent with no entries
    pub fn new(parent_pk: u64) -> Self {
        Self {
            parent_pk,
            entries: Vec::new(),
        }
    }

    /// Builder-style entry append
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Total number of links across all entries
    pub fn link_count(&self) -> usize {
        self.entries.iter().map(|e| e.links.len()).sum()
    }
}
