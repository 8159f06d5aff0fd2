// Integration tests for failure paths through the row pipeline
// Covers integrity violations, upstream read failures, rollback and cascades

#![allow(clippy::unwrap_used, clippy::expect_used)]

use linkmap_core::{Entry, EntryRow, ExErrorKind, Parent, ParentRow};
use linkmap_store::{SqliteRepo, StoreConfig};

fn seeded_repo(links_sql: &str) -> SqliteRepo {
    let repo = SqliteRepo::open_in_memory().unwrap();
    repo.connection()
        .execute_batch(
            "INSERT INTO parents (parent_pk) VALUES (1);
             INSERT INTO entries (entry_pk, parent_pk) VALUES (123, 1);",
        )
        .unwrap();
    repo.connection().execute_batch(links_sql).unwrap();
    repo
}

fn count(repo: &SqliteRepo, sql: &str) -> i64 {
    repo.connection().query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn test_stored_empty_key_is_data_integrity_error() {
    // Given: A stored link row with an empty key
    let repo = seeded_repo(
        r#"INSERT INTO entry_links (entry_pk, "key", link) VALUES (123, 'ok', 1);
           INSERT INTO entry_links (entry_pk, "key", link) VALUES (123, '', 2);"#,
    );

    // When: The entry is loaded
    let err = repo.find_entry(123).unwrap_err();

    // Then: The load fails with an integrity error naming the entry
    assert_eq!(err.kind(), ExErrorKind::DataIntegrity);
    assert_eq!(err.entity_id(), Some("123"));
    assert!(err.message().contains("empty key for entry links"));
}

#[test]
fn test_empty_key_fails_parent_load_too() {
    let repo = seeded_repo(
        r#"INSERT INTO entry_links (entry_pk, "key", link) VALUES (123, '', 2);"#,
    );

    let err = repo.find_parent(1).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::DataIntegrity);
}

#[test]
fn test_unreadable_column_is_upstream_error() {
    // Given: A link value that cannot be read as an integer
    let repo = seeded_repo(
        r#"INSERT INTO entry_links (entry_pk, "key", link) VALUES (123, 'bad', 'abc');"#,
    );

    // When: The entry is loaded
    let err = repo.find_entry(123).unwrap_err();

    // Then: The read failure surfaces as-is and the fold never ran
    assert_eq!(err.kind(), ExErrorKind::Upstream);
    assert_eq!(
        err.source_error().map(|e| e.kind()),
        Some(ExErrorKind::Persistence)
    );
}

#[test]
fn test_empty_key_rejected_before_any_write() {
    // Given: An entry whose links include an empty key
    let mut repo = SqliteRepo::open_in_memory().unwrap();
    let parent = Parent::new(1).with_entry(Entry::new(2).with_link("", 1));
    let mut row = ParentRow::new(parent);

    // When: We try to save it
    let err = repo.save_parent(&mut row).unwrap_err();

    // Then: Nothing was written and scratch state is clean
    assert_eq!(err.kind(), ExErrorKind::DataIntegrity);
    assert_eq!(err.op(), Some("save_parent"));
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM parents"), 0);
    assert!(row.entry_rows.is_empty());
    assert!(repo.statements().is_empty());
}

#[test]
fn test_failure_mid_transaction_rolls_back() {
    // Given: A parent whose second entry key does not fit INT8
    let mut repo = SqliteRepo::open_in_memory().unwrap();
    let parent = Parent::new(1)
        .with_entry(Entry::new(2).with_link("a", 1))
        .with_entry(Entry::new(u64::MAX));
    let mut row = ParentRow::new(parent);

    // When: We try to save it
    let err = repo.save_parent(&mut row).unwrap_err();

    // Then: Statements already run inside the transaction are undone
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM parents"), 0);
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM entries"), 0);
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM entry_links"), 0);
    assert!(repo.statements().is_empty());
    assert!(row.entry_rows.is_empty());
}

#[test]
fn test_entry_with_unknown_parent_violates_foreign_key() {
    let mut repo = SqliteRepo::open_in_memory().unwrap();
    let mut row = EntryRow::new(Entry::new(5).with_link("k", 1), Some(99));

    let err = repo.save_entry(&mut row).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(row.link_rows.is_empty());
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM entry_links"), 0);
}

#[test]
fn test_unknown_keys_are_not_found() {
    let mut repo = SqliteRepo::open_in_memory().unwrap();

    assert_eq!(repo.find_parent(1).unwrap_err().kind(), ExErrorKind::NotFound);
    assert_eq!(repo.find_entry(1).unwrap_err().kind(), ExErrorKind::NotFound);
    assert_eq!(repo.delete_parent(1).unwrap_err().kind(), ExErrorKind::NotFound);
    assert_eq!(repo.delete_entry(1).unwrap_err().kind(), ExErrorKind::NotFound);
}

#[test]
fn test_delete_parent_nulls_entry_reference() {
    // Given: A saved parent with one entry
    let mut repo = SqliteRepo::open_in_memory().unwrap();
    let parent = Parent::new(1).with_entry(Entry::new(123).with_link("a", 1));
    repo.save_parent(&mut ParentRow::new(parent)).unwrap();

    // When: The parent is deleted
    repo.delete_parent(1).unwrap();

    // Then: The entry survives with no parent
    let entry = repo.find_entry(123).unwrap();
    assert_eq!(entry.parent_pk, None);
    assert_eq!(entry.entry.links["a"], 1);
    assert_eq!(repo.find_parent(1).unwrap_err().kind(), ExErrorKind::NotFound);
}

#[test]
fn test_delete_entry_nulls_link_reference() {
    let mut repo = SqliteRepo::open_in_memory().unwrap();
    let parent = Parent::new(1).with_entry(Entry::new(123).with_link("a", 1).with_link("b", 2));
    repo.save_parent(&mut ParentRow::new(parent)).unwrap();

    repo.delete_entry(123).unwrap();

    assert_eq!(
        count(&repo, "SELECT COUNT(*) FROM entry_links WHERE entry_pk IS NULL"),
        2
    );
    assert!(repo.find_parent(1).unwrap().parent.entries.is_empty());
}

#[test]
fn test_foreign_keys_off_leaves_orphans() {
    // Given: A repo with foreign key enforcement disabled
    let mut repo = SqliteRepo::open(&StoreConfig::in_memory().with_foreign_keys(false)).unwrap();
    let parent = Parent::new(1).with_entry(Entry::new(123));
    repo.save_parent(&mut ParentRow::new(parent)).unwrap();

    // When: The parent is deleted
    repo.delete_parent(1).unwrap();

    // Then: The entry keeps its dangling reference
    assert_eq!(repo.find_entry(123).unwrap().parent_pk, Some(1));
}
