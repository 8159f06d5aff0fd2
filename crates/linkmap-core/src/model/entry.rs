use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Entry - an identified bag of string-keyed links
///
/// `links` is unordered: two entries with the same pairs compare equal no
/// matter how they were built. Keys are unique by construction and must be
/// non-empty once persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Identity; stored as `entries.entry_pk`
    pub entry_pk: u64,

    /// Link values keyed by name; stored one row per key in `entry_links`
    #[serde(default, serialize_with = "serialize_sorted")]
    pub links: HashMap<String, i64>,
}

impl Entry {
    /// Create an entry with no links
    pub fn new(entry_pk: u64) -> Self {
        Self {
            entry_pk,
            links: HashMap::new(),
        }
    }

    /// Builder-style link insertion
    pub fn with_link(mut self, key: impl Into<String>, value: i64) -> Self {
        self.links.insert(key.into(), value);
        self
    }

    /// Link keys in ascending order
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.links.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

// JSON output goes through a BTreeMap so rendered entries are stable
fn serialize_sorted<S>(links: &HashMap<String, i64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let sorted: BTreeMap<&String, &i64> = links.iter().collect();
    sorted.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_keys_ascending() {
        let entry = Entry::new(1)
            .with_link("two", 2)
            .with_link("one", 1)
            .with_link("three", 3);
        assert_eq!(entry.sorted_keys(), vec!["one", "three", "two"]);
    }

    #[test]
    fn test_with_link_overwrites() {
        let entry = Entry::new(1).with_link("a", 1).with_link("a", 5);
        assert_eq!(entry.links.len(), 1);
        assert_eq!(entry.links["a"], 5);
    }

    #[test]
    fn test_json_links_are_sorted() {
        let entry = Entry::new(9).with_link("b", 2).with_link("a", 1);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"entry_pk":9,"links":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_json_missing_links_defaults_empty() {
        let entry: Entry = serde_json::from_str(r#"{"entry_pk":3}"#).unwrap();
        assert_eq!(entry, Entry::new(3));
    }
}
