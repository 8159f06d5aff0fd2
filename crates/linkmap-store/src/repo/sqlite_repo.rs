//! SQLite repository implementation
//!
//! Persists parent/entry/link row graphs and drives the row lifecycle:
//! `before_write` parent-first, statements top-down inside one
//! transaction, then `after_write` on every row whether or not the
//! transaction committed.

use std::time::Instant;

use linkmap_core::errors::{ExError, LinkMapError};
use linkmap_core::linkmap_core_types::schema::{FIELD_SQL, FIELD_TABLE};
use linkmap_core::schema::{Table, TableDef};
use linkmap_core::{log_op_end, log_op_error, log_op_start};
use linkmap_core::{EntryRow, HookContext, LinkRow, ParentRow, RowLifecycle};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use super::hydration;
use super::journal::ExecutedStatement;
use super::sql;
use super::{
    OP_DELETE_ENTRY, OP_DELETE_PARENT, OP_FIND_ENTRY, OP_FIND_PARENT, OP_SAVE_ENTRY,
    OP_SAVE_PARENT,
};
use crate::config::StoreConfig;
use crate::db;
use crate::errors::{from_rusqlite, key_to_sql, Result};
use crate::migrations;

/// SQLite-backed persistence engine for the row pipeline
pub struct SqliteRepo {
    conn: Connection,
    journal: Option<Vec<ExecutedStatement>>,
}

impl SqliteRepo {
    /// Open the configured database and bring its schema up to date
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let mut conn = db::open_with(config)?;
        migrations::apply_migrations(&mut conn)?;
        Ok(Self {
            conn,
            journal: config.record_statements.then(Vec::new),
        })
    }

    /// In-memory database with the statement journal enabled
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&StoreConfig::in_memory().with_record_statements(true))
    }

    /// Underlying connection, for ad-hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Statements executed by committed writes, oldest first
    ///
    /// Always empty unless `StoreConfig::record_statements` was set.
    pub fn statements(&self) -> &[ExecutedStatement] {
        self.journal.as_deref().unwrap_or_default()
    }

    /// Forget journaled statements
    pub fn clear_statements(&mut self) {
        if let Some(journal) = self.journal.as_mut() {
            journal.clear();
        }
    }

    /// Persist a parent, its entries and their links
    ///
    /// On return `row.entry_rows` is empty, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Any failed hook or statement aborts the whole write; nothing is
    /// committed.
    pub fn save_parent(&mut self, row: &mut ParentRow) -> Result<()> {
        let start = Instant::now();
        let key = RowKey::Parent(row.parent.parent_pk);
        log_op_start!(OP_SAVE_PARENT, parent_pk = row.parent.parent_pk);

        let outcome = self.write_parent(row);
        let cleanup = {
            let ctx = HookContext::new(OP_SAVE_PARENT).with_upstream_error(outcome.as_ref().err());
            cleanup_parent(row, &ctx)
        };

        observe(OP_SAVE_PARENT, key, start, outcome.and(cleanup))
    }

    /// Persist a single entry and its links
    ///
    /// # Errors
    ///
    /// As for `save_parent`. With foreign keys on, `row.parent_pk` must be
    /// `None` or name an existing parent.
    pub fn save_entry(&mut self, row: &mut EntryRow) -> Result<()> {
        let start = Instant::now();
        let key = RowKey::Entry(row.entry.entry_pk);
        log_op_start!(OP_SAVE_ENTRY, entry_pk = row.entry.entry_pk);

        let outcome = self.write_entry(row);
        let cleanup = {
            let ctx = HookContext::new(OP_SAVE_ENTRY).with_upstream_error(outcome.as_ref().err());
            row.after_write(&ctx)
        };

        observe(OP_SAVE_ENTRY, key, start, outcome.and(cleanup))
    }

    /// Load a parent with its entries (ordered by `entry_pk`) and their links
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown key, `DataIntegrity` for invalid stored
    /// links, `Upstream` when a read step fails.
    pub fn find_parent(&self, parent_pk: u64) -> Result<ParentRow> {
        let start = Instant::now();
        log_op_start!(OP_FIND_PARENT, parent_pk = parent_pk);
        observe(
            OP_FIND_PARENT,
            RowKey::Parent(parent_pk),
            start,
            hydration::load_parent(&self.conn, parent_pk),
        )
    }

    /// Load a single entry with its links
    ///
    /// # Errors
    ///
    /// As for `find_parent`.
    pub fn find_entry(&self, entry_pk: u64) -> Result<EntryRow> {
        let start = Instant::now();
        log_op_start!(OP_FIND_ENTRY, entry_pk = entry_pk);
        observe(
            OP_FIND_ENTRY,
            RowKey::Entry(entry_pk),
            start,
            hydration::load_entry(&self.conn, entry_pk),
        )
    }

    /// Delete a parent row; its entries keep existing with a NULL parent
    ///
    /// # Errors
    ///
    /// `NotFound` when no such parent exists.
    pub fn delete_parent(&mut self, parent_pk: u64) -> Result<()> {
        let start = Instant::now();
        log_op_start!(OP_DELETE_PARENT, parent_pk = parent_pk);
        let result = self
            .delete_one(ParentRow::TABLE, "parent_pk", parent_pk)
            .and_then(|deleted| {
                if deleted {
                    Ok(())
                } else {
                    Err(LinkMapError::ParentNotFound { parent_pk }.into())
                }
            });
        observe(OP_DELETE_PARENT, RowKey::Parent(parent_pk), start, result)
    }

    /// Delete an entry row; its links keep existing with a NULL entry
    ///
    /// # Errors
    ///
    /// `NotFound` when no such entry exists.
    pub fn delete_entry(&mut self, entry_pk: u64) -> Result<()> {
        let start = Instant::now();
        log_op_start!(OP_DELETE_ENTRY, entry_pk = entry_pk);
        let result = self
            .delete_one(EntryRow::TABLE, "entry_pk", entry_pk)
            .and_then(|deleted| {
                if deleted {
                    Ok(())
                } else {
                    Err(LinkMapError::EntryNotFound { entry_pk }.into())
                }
            });
        observe(OP_DELETE_ENTRY, RowKey::Entry(entry_pk), start, result)
    }

    fn write_parent(&mut self, row: &mut ParentRow) -> Result<()> {
        let ctx = HookContext::new(OP_SAVE_PARENT);
        row.before_write(&ctx)?;
        for entry_row in row.entry_rows.iter_mut() {
            entry_row.before_write(&ctx)?;
        }

        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        let mut writer = StatementWriter::new(&tx);
        writer.upsert::<ParentRow>(vec![Value::Integer(key_to_sql(
            "parent_pk",
            row.parent.parent_pk,
        )?)])?;
        for entry_row in &row.entry_rows {
            write_entry_rows(&mut writer, entry_row)?;
        }
        let executed = writer.finish();
        tx.commit().map_err(from_rusqlite)?;

        self.record(executed);
        Ok(())
    }

    fn write_entry(&mut self, row: &mut EntryRow) -> Result<()> {
        row.before_write(&HookContext::new(OP_SAVE_ENTRY))?;

        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        let mut writer = StatementWriter::new(&tx);
        write_entry_rows(&mut writer, row)?;
        let executed = writer.finish();
        tx.commit().map_err(from_rusqlite)?;

        self.record(executed);
        Ok(())
    }

    fn delete_one(&mut self, table: &'static TableDef, column: &str, key: u64) -> Result<bool> {
        let value = Value::Integer(key_to_sql(column, key)?);
        let sql = sql::delete_where(table, column);
        tracing::debug!({ FIELD_TABLE } = table.name, { FIELD_SQL } = %sql, "execute");
        let deleted = self
            .conn
            .execute(&sql, [&value])
            .map_err(from_rusqlite)?;
        if deleted > 0 {
            self.record(vec![ExecutedStatement {
                table: table.name,
                sql,
                params: vec![value],
            }]);
        }
        Ok(deleted > 0)
    }

    fn record(&mut self, executed: Vec<ExecutedStatement>) {
        if let Some(journal) = self.journal.as_mut() {
            journal.extend(executed);
        }
    }
}

/// Executes upserts on one transaction and remembers what ran
struct StatementWriter<'c> {
    conn: &'c Connection,
    executed: Vec<ExecutedStatement>,
}

impl<'c> StatementWriter<'c> {
    fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            executed: Vec::new(),
        }
    }

    /// Upsert one row of `R`'s table; `values` follow column declaration order
    fn upsert<R: Table>(&mut self, values: Vec<Value>) -> Result<()> {
        let table = R::TABLE;
        let sql = sql::upsert(table);
        tracing::debug!({ FIELD_TABLE } = table.name, { FIELD_SQL } = %sql, "execute");

        self.conn
            .prepare_cached(&sql)
            .and_then(|mut stmt| stmt.execute(params_from_iter(values.iter())))
            .map_err(|e| from_rusqlite(e).with_entity_id(table.name))?;

        self.executed.push(ExecutedStatement {
            table: table.name,
            sql,
            params: values,
        });
        Ok(())
    }

    fn finish(self) -> Vec<ExecutedStatement> {
        self.executed
    }
}

fn optional_key(column: &str, key: Option<u64>) -> Result<Value> {
    Ok(match key {
        Some(k) => Value::Integer(key_to_sql(column, k)?),
        None => Value::Null,
    })
}

/// Entry row first, then its staged link rows in staged order
fn write_entry_rows(writer: &mut StatementWriter<'_>, row: &EntryRow) -> Result<()> {
    writer.upsert::<EntryRow>(vec![
        Value::Integer(key_to_sql("entry_pk", row.entry.entry_pk)?),
        optional_key("parent_pk", row.parent_pk)?,
    ])?;
    for link_row in &row.link_rows {
        writer.upsert::<LinkRow>(vec![
            optional_key("entry_pk", link_row.entry_pk)?,
            Value::Text(link_row.key.clone()),
            Value::Integer(link_row.link),
        ])?;
    }
    Ok(())
}

/// Children first; the parent's cleanup drops them anyway
fn cleanup_parent(row: &mut ParentRow, ctx: &HookContext<'_>) -> Result<()> {
    for entry_row in row.entry_rows.iter_mut() {
        entry_row.after_write(ctx)?;
    }
    row.after_write(ctx)
}

/// Row an operation was called for, echoed on its terminal log event
#[derive(Debug, Clone, Copy)]
enum RowKey {
    Parent(u64),
    Entry(u64),
}

impl RowKey {
    fn parent_pk(self) -> Option<u64> {
        match self {
            RowKey::Parent(pk) => Some(pk),
            RowKey::Entry(_) => None,
        }
    }

    fn entry_pk(self) -> Option<u64> {
        match self {
            RowKey::Entry(pk) => Some(pk),
            RowKey::Parent(_) => None,
        }
    }
}

fn observe<T>(op: &'static str, key: RowKey, start: Instant, result: Result<T>) -> Result<T> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!(
            op,
            duration_ms = duration_ms,
            parent_pk = key.parent_pk(),
            entry_pk = key.entry_pk()
        ),
        Err(err) => log_op_error!(
            op,
            ExError::clone(err),
            duration_ms = duration_ms,
            parent_pk = key.parent_pk(),
            entry_pk = key.entry_pk()
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkmap_core::{Entry, Parent};

    #[test]
    fn test_journal_disabled_by_default() {
        let mut repo = SqliteRepo::open(&StoreConfig::in_memory()).unwrap();
        let mut row = ParentRow::new(Parent::new(1));
        repo.save_parent(&mut row).unwrap();
        assert!(repo.statements().is_empty());
    }

    #[test]
    fn test_clear_statements() {
        let mut repo = SqliteRepo::open_in_memory().unwrap();
        let mut row = ParentRow::new(Parent::new(1).with_entry(Entry::new(2)));
        repo.save_parent(&mut row).unwrap();
        assert_eq!(repo.statements().len(), 2);

        repo.clear_statements();
        assert!(repo.statements().is_empty());
    }

    #[test]
    fn test_key_out_of_range_aborts_before_sql() {
        let mut repo = SqliteRepo::open_in_memory().unwrap();
        let mut row = ParentRow::new(Parent::new(u64::MAX).with_entry(Entry::new(1)));

        let err = repo.save_parent(&mut row).unwrap_err();

        assert_eq!(err.kind(), linkmap_core::ExErrorKind::InvalidInput);
        assert!(row.entry_rows.is_empty());
        assert!(repo.statements().is_empty());
    }
}
