//! Hydration layer - loads row graphs from SQLite
//!
//! Populates `ParentRow`/`EntryRow`/`LinkRow` scratch state with
//! deterministic ordering (entries by `entry_pk`, links by key), then runs
//! the `after_read` hooks child-before-parent.

use linkmap_core::schema::{ENTRIES, ENTRY_LINKS, PARENTS};
use linkmap_core::{
    Entry, EntryRow, HookContext, LinkMapError, LinkRow, Parent, ParentRow, RowLifecycle,
};
use rusqlite::{Connection, OptionalExtension};

use super::sql;
use super::{OP_FIND_ENTRY, OP_FIND_PARENT};
use crate::errors::{key_from_sql, key_to_sql, upstream_read, Result};

/// Load one parent with its entries and their links
pub fn load_parent(conn: &Connection, parent_pk: u64) -> Result<ParentRow> {
    let key = key_to_sql("parent_pk", parent_pk)?;

    let found: Option<i64> = conn
        .query_row(
            &sql::select_where(&PARENTS, "parent_pk", &[]),
            [key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| upstream_read(OP_FIND_PARENT, e))?;
    if found.is_none() {
        return Err(LinkMapError::ParentNotFound { parent_pk }.into());
    }

    let mut row = ParentRow::new(Parent::new(parent_pk));
    let loaded = read_entry_rows(conn, key).and_then(|mut entry_rows| {
        for entry_row in entry_rows.iter_mut() {
            finish_read(OP_FIND_PARENT, entry_row, Ok(()))?;
        }
        row.entry_rows = entry_rows;
        Ok(())
    });

    finish_read(OP_FIND_PARENT, &mut row, loaded)?;
    Ok(row)
}

/// Load one entry with its links
pub fn load_entry(conn: &Connection, entry_pk: u64) -> Result<EntryRow> {
    let key = key_to_sql("entry_pk", entry_pk)?;

    let found: Option<Option<i64>> = conn
        .query_row(
            &sql::select_where(&ENTRIES, "entry_pk", &[]),
            [key],
            |row| row.get(1),
        )
        .optional()
        .map_err(|e| upstream_read(OP_FIND_ENTRY, e))?;
    let parent_pk = match found {
        Some(parent_pk) => parent_pk
            .map(|pk| key_from_sql("parent_pk", pk))
            .transpose()?,
        None => return Err(LinkMapError::EntryNotFound { entry_pk }.into()),
    };

    let mut row = EntryRow::new(Entry::new(entry_pk), parent_pk);
    let loaded = read_link_rows(conn, OP_FIND_ENTRY, key).map(|link_rows| {
        row.link_rows = link_rows;
    });

    finish_read(OP_FIND_ENTRY, &mut row, loaded)?;
    Ok(row)
}

/// Run `after_read` with the outcome of the populate step, then report
/// whichever failed first
fn finish_read<R: RowLifecycle>(op: &'static str, row: &mut R, loaded: Result<()>) -> Result<()> {
    let folded = {
        let ctx = HookContext::new(op).with_upstream_error(loaded.as_ref().err());
        row.after_read(&ctx)
    };
    loaded.and(folded)
}

fn read_entry_rows(conn: &Connection, parent_key: i64) -> Result<Vec<EntryRow>> {
    let mut stmt = conn
        .prepare_cached(&sql::select_where(&ENTRIES, "parent_pk", &["entry_pk"]))
        .map_err(|e| upstream_read(OP_FIND_PARENT, e))?;

    let raw: Vec<(i64, Option<i64>)> = stmt
        .query_map([parent_key], |row| Ok((row.get(0)?, row.get(1)?)))
        .and_then(|rows| rows.collect())
        .map_err(|e| upstream_read(OP_FIND_PARENT, e))?;

    let mut entry_rows = Vec::with_capacity(raw.len());
    for (entry_key, parent_key) in raw {
        let parent_pk = parent_key
            .map(|pk| key_from_sql("parent_pk", pk))
            .transpose()?;
        let entry = Entry::new(key_from_sql("entry_pk", entry_key)?);
        let mut entry_row = EntryRow::new(entry, parent_pk);
        entry_row.link_rows = read_link_rows(conn, OP_FIND_PARENT, entry_key)?;
        entry_rows.push(entry_row);
    }
    Ok(entry_rows)
}

fn read_link_rows(conn: &Connection, op: &'static str, entry_key: i64) -> Result<Vec<LinkRow>> {
    let mut stmt = conn
        .prepare_cached(&sql::select_where(&ENTRY_LINKS, "entry_pk", &["key"]))
        .map_err(|e| upstream_read(op, e))?;

    let raw: Vec<(Option<i64>, String, i64)> = stmt
        .query_map([entry_key], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .and_then(|rows| rows.collect())
        .map_err(|e| upstream_read(op, e))?;

    raw.into_iter()
        .map(|(entry_pk, key, link)| {
            Ok(LinkRow {
                entry_pk: entry_pk
                    .map(|pk| key_from_sql("entry_pk", pk))
                    .transpose()?,
                key,
                link,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::migrations::apply_migrations;
    use linkmap_core::ExErrorKind;

    fn setup() -> Connection {
        let mut conn = db::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_load_entry_orders_and_folds_links() {
        let conn = setup();
        conn.execute_batch(
            r#"
            INSERT INTO parents (parent_pk) VALUES (1);
            INSERT INTO entries (entry_pk, parent_pk) VALUES (123, 1);
            INSERT INTO entry_links (entry_pk, "key", link) VALUES (123, 'two', 2);
            INSERT INTO entry_links (entry_pk, "key", link) VALUES (123, 'one', 1);
            "#,
        )
        .unwrap();

        let row = load_entry(&conn, 123).unwrap();

        assert_eq!(row.parent_pk, Some(1));
        assert!(row.link_rows.is_empty());
        assert_eq!(row.entry.sorted_keys(), vec!["one", "two"]);
        assert_eq!(row.entry.links["two"], 2);
    }

    #[test]
    fn test_load_parent_orders_entries() {
        let conn = setup();
        conn.execute_batch(
            r#"
            INSERT INTO parents (parent_pk) VALUES (1);
            INSERT INTO entries (entry_pk, parent_pk) VALUES (30, 1);
            INSERT INTO entries (entry_pk, parent_pk) VALUES (10, 1);
            INSERT INTO entries (entry_pk, parent_pk) VALUES (20, 1);
            "#,
        )
        .unwrap();

        let row = load_parent(&conn, 1).unwrap();

        let pks: Vec<u64> = row.parent.entries.iter().map(|e| e.entry_pk).collect();
        assert_eq!(pks, vec![10, 20, 30]);
        assert!(row.entry_rows.is_empty());
    }

    #[test]
    fn test_missing_rows_are_not_found() {
        let conn = setup();
        assert_eq!(
            load_parent(&conn, 9).unwrap_err().kind(),
            ExErrorKind::NotFound
        );
        assert_eq!(
            load_entry(&conn, 9).unwrap_err().kind(),
            ExErrorKind::NotFound
        );
    }

    #[test]
    fn test_read_failure_is_upstream() {
        let conn = db::open_in_memory().unwrap();

        let err = load_entry(&conn, 1).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Upstream);
        assert_eq!(err.op(), Some(OP_FIND_ENTRY));
    }

    #[test]
    fn test_negative_stored_key_is_integrity_error() {
        let conn = setup();
        conn.execute_batch(
            r#"
            INSERT INTO parents (parent_pk) VALUES (1);
            INSERT INTO entries (entry_pk, parent_pk) VALUES (-4, 1);
            "#,
        )
        .unwrap();

        let err = load_parent(&conn, 1).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::DataIntegrity);
    }
}
