// Integration test for structured operation logging from the repository

#![allow(clippy::unwrap_used, clippy::expect_used)]

use linkmap_core::linkmap_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use linkmap_core::logging_facility::test_capture::init_test_capture;
use linkmap_core::{Entry, EntryRow, Parent, ParentRow};
use linkmap_store::SqliteRepo;

#[test]
fn test_repo_operations_emit_keyed_start_and_end_events() {
    // Given: A capture layer and a repo
    let capture = init_test_capture();
    let mut repo = SqliteRepo::open_in_memory().unwrap();

    // When: We save, load, and miss
    let parent = Parent::new(1).with_entry(Entry::new(2).with_link("a", 1));
    repo.save_parent(&mut ParentRow::new(parent)).unwrap();
    repo.save_entry(&mut EntryRow::new(Entry::new(3), Some(1)))
        .unwrap();
    repo.find_parent(1).unwrap();
    repo.find_entry(404).unwrap_err();

    // Then: Each event names the row it was logged for
    let start = capture.expect_event("save_parent", EVENT_START);
    assert_eq!(start.parent_pk(), Some(1));
    assert_eq!(start.entry_pk(), None);

    let end = capture.expect_event("save_parent", EVENT_END);
    assert_eq!(end.parent_pk(), Some(1));
    assert!(end.duration_ms().is_some());

    let saved_entry = capture.expect_event("save_entry", EVENT_END);
    assert_eq!(saved_entry.entry_pk(), Some(3));
    assert_eq!(saved_entry.parent_pk(), None);

    assert_eq!(
        capture.expect_event("find_parent", EVENT_END).parent_pk(),
        Some(1)
    );

    // And: The miss is classified and keyed
    let miss = capture.expect_event("find_entry", EVENT_END_ERROR);
    assert_eq!(miss.entry_pk(), Some(404));
    assert_eq!(miss.err_code(), Some("ERR_NOT_FOUND"));
    assert_eq!(miss.err_kind(), Some("NotFound"));
}
