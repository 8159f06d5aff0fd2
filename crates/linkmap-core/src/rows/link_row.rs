use crate::schema::{self, Table, TableDef};

/// One row of `entry_links`: a single key/value pair of an entry
///
/// Identity is `(entry_pk, key)`. `entry_pk` is nullable because deleting
/// the owning entry sets it to NULL rather than removing the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub entry_pk: Option<u64>,
    pub key: String,
    pub link: i64,
}

impl LinkRow {
    pub fn new(entry_pk: u64, key: impl Into<String>, link: i64) -> Self {
        Self {
            entry_pk: Some(entry_pk),
            key: key.into(),
            link,
        }
    }
}

impl Table for LinkRow {
    const TABLE: &'static TableDef = &schema::ENTRY_LINKS;
}
