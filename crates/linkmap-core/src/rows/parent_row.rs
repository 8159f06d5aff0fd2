use linkmap_core_types::schema::{FIELD_ENTRY_COUNT, FIELD_OP, FIELD_PARENT_PK};

use crate::errors::Result;
use crate::lifecycle::{HookContext, RowLifecycle};
use crate::model::Parent;
use crate::schema::{self, Table, TableDef};

use super::entry_row::EntryRow;

/// One row of `parents`, wrapping a `Parent` aggregate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParentRow {
    pub parent: Parent,

    /// Scratch: entry rows staged for one read or write
    pub entry_rows: Vec<EntryRow>,
}

impl ParentRow {
    pub fn new(parent: Parent) -> Self {
        Self {
            parent,
            entry_rows: Vec::new(),
        }
    }

    pub fn into_parent(self) -> Parent {
        self.parent
    }
}

impl From<Parent> for ParentRow {
    fn from(parent: Parent) -> Self {
        Self::new(parent)
    }
}

impl Table for ParentRow {
    const TABLE: &'static TableDef = &schema::PARENTS;
}

impl RowLifecycle for ParentRow {
    fn after_read(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        if ctx.has_upstream_error() {
            return Ok(());
        }

        let parent_pk = self.parent.parent_pk;
        for mut entry_row in self.entry_rows.drain(..) {
            entry_row.parent_pk = Some(parent_pk);
            self.parent.entries.push(entry_row.into_entry());
        }

        tracing::trace!(
            { FIELD_OP } = ctx.op(),
            { FIELD_PARENT_PK } = parent_pk,
            { FIELD_ENTRY_COUNT } = self.parent.entries.len(),
            "folded entry rows"
        );
        Ok(())
    }

    fn before_write(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        let parent_pk = self.parent.parent_pk;
        self.entry_rows.extend(
            self.parent
                .entries
                .iter()
                .map(|entry| EntryRow::new(entry.clone(), Some(parent_pk))),
        );

        tracing::trace!(
            { FIELD_OP } = ctx.op(),
            { FIELD_PARENT_PK } = parent_pk,
            { FIELD_ENTRY_COUNT } = self.entry_rows.len(),
            "unfolded entries"
        );
        Ok(())
    }

    fn after_write(&mut self, _ctx: &HookContext<'_>) -> Result<()> {
        self.entry_rows.clear();
        Ok(())
    }
}
