use std::collections::HashMap;

use linkmap_core_types::schema::{FIELD_ENTRY_PK, FIELD_LINK_COUNT, FIELD_OP};

use crate::errors::{ExError, LinkMapError, Result};
use crate::lifecycle::{HookContext, RowLifecycle};
use crate::model::Entry;
use crate::schema::{self, Table, TableDef, LINK_KEY_MAX_LEN};

use super::link_row::LinkRow;

/// One row of `entries`, wrapping an `Entry` aggregate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryRow {
    pub entry: Entry,

    /// Foreign key to `parents`; NULL once the parent is deleted
    pub parent_pk: Option<u64>,

    /// Scratch: link rows staged for one read or write
    pub link_rows: Vec<LinkRow>,
}

impl EntryRow {
    pub fn new(entry: Entry, parent_pk: Option<u64>) -> Self {
        Self {
            entry,
            parent_pk,
            link_rows: Vec::new(),
        }
    }

    pub fn into_entry(self) -> Entry {
        self.entry
    }

    fn validate_key(entry_pk: u64, key: &str) -> std::result::Result<(), LinkMapError> {
        if key.is_empty() {
            return Err(LinkMapError::EmptyLinkKey { entry_pk });
        }
        let len = key.chars().count();
        if len > LINK_KEY_MAX_LEN {
            return Err(LinkMapError::LinkKeyTooLong {
                entry_pk,
                len,
                max: LINK_KEY_MAX_LEN,
            });
        }
        Ok(())
    }
}

impl Table for EntryRow {
    const TABLE: &'static TableDef = &schema::ENTRIES;
}

impl RowLifecycle for EntryRow {
    fn after_read(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        if ctx.has_upstream_error() {
            return Ok(());
        }

        let entry_pk = self.entry.entry_pk;

        // Later rows win on duplicate keys
        let mut links = HashMap::with_capacity(self.link_rows.len());
        for link_row in &mut self.link_rows {
            if link_row.key.is_empty() {
                return Err(
                    ExError::from(LinkMapError::EmptyLinkKey { entry_pk }).with_op(ctx.op())
                );
            }
            link_row.entry_pk = Some(entry_pk);
            links.insert(link_row.key.clone(), link_row.link);
        }
        self.link_rows.clear();
        self.entry.links = links;

        tracing::trace!(
            { FIELD_OP } = ctx.op(),
            { FIELD_ENTRY_PK } = entry_pk,
            { FIELD_LINK_COUNT } = self.entry.links.len(),
            "folded link rows"
        );
        Ok(())
    }

    fn before_write(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        let entry_pk = self.entry.entry_pk;
        let keys = self.entry.sorted_keys();

        for key in &keys {
            Self::validate_key(entry_pk, key).map_err(|e| ExError::from(e).with_op(ctx.op()))?;
        }

        let links = &self.entry.links;
        self.link_rows
            .extend(keys.into_iter().map(|key| LinkRow::new(entry_pk, key, links[key])));

        tracing::trace!(
            { FIELD_OP } = ctx.op(),
            { FIELD_ENTRY_PK } = entry_pk,
            { FIELD_LINK_COUNT } = self.link_rows.len(),
            "unfolded links"
        );
        Ok(())
    }

    fn after_write(&mut self, _ctx: &HookContext<'_>) -> Result<()> {
        self.link_rows.clear();
        Ok(())
    }
}
