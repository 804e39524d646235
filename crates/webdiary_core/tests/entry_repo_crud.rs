use rusqlite::Connection;
use std::collections::HashSet;
use webdiary_core::db::migrations::latest_version;
use webdiary_core::db::open_db_in_memory;
use webdiary_core::{
    DiaryEntry, EntryRepository, RepoError, SqliteEntryRepository, UNSAVED_ENTRY_ID,
};

#[test]
fn add_and_fetch_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let draft = DiaryEntry::new(
        Some("What a day".to_string()),
        Some("Strange day".to_string()),
    );
    let stamped_at = draft.created_at;
    let persisted = repo.add(Some(draft)).unwrap();
    assert!(persisted.id > UNSAVED_ENTRY_ID);

    let loaded = repo.fetch_by_id(persisted.id).unwrap().unwrap();
    assert_eq!(loaded.id, persisted.id);
    assert_eq!(loaded.title.as_deref(), Some("What a day"));
    assert_eq!(loaded.content.as_deref(), Some("Strange day"));
    assert_eq!(loaded.created_at, stamped_at);
}

#[test]
fn add_assigns_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let first = repo
        .add(Some(DiaryEntry::new(Some("first".to_string()), None)))
        .unwrap();
    let second = repo
        .add(Some(DiaryEntry::new(Some("second".to_string()), None)))
        .unwrap();

    assert!(first.id > UNSAVED_ENTRY_ID);
    assert!(second.id > first.id);
}

#[test]
fn add_discards_caller_supplied_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let presumptuous = DiaryEntry::with_id(42, Some("claimed id".to_string()), None);
    let persisted = repo.add(Some(presumptuous)).unwrap();

    assert_eq!(persisted.id, 1);
    assert!(repo.fetch_by_id(42).unwrap().is_none());
    assert_eq!(repo.fetch_all().unwrap().len(), 1);
}

#[test]
fn add_does_not_reuse_ids_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let first = repo
        .add(Some(DiaryEntry::new(Some("kept".to_string()), None)))
        .unwrap();
    let second = repo
        .add(Some(DiaryEntry::new(Some("removed".to_string()), None)))
        .unwrap();
    repo.delete_by_id(second.id).unwrap();

    let third = repo
        .add(Some(DiaryEntry::new(Some("later".to_string()), None)))
        .unwrap();
    assert!(third.id > second.id);
    assert!(third.id > first.id);
}

#[test]
fn add_rejects_absent_payload() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let err = repo.add(None).unwrap_err();
    assert!(matches!(err, RepoError::MissingEntry));
    assert!(repo.fetch_all().unwrap().is_empty());
}

#[test]
fn fetch_by_id_returns_none_for_absent_row() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    assert!(repo.fetch_by_id(3).unwrap().is_none());
}

#[test]
fn fetch_by_id_rejects_zero_and_negative_ids() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let zero = repo.fetch_by_id(0).unwrap_err();
    assert!(matches!(zero, RepoError::IdOutOfRange { supplied: 0 }));

    let negative = repo.fetch_by_id(-1).unwrap_err();
    assert!(matches!(negative, RepoError::IdOutOfRange { supplied: -1 }));
    assert_eq!(negative.to_string(), "Id must be greater than zero");
}

#[test]
fn fetch_all_returns_every_row() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let titles: HashSet<String> = repo
        .fetch_all()
        .unwrap()
        .into_iter()
        .filter_map(|entry| entry.title)
        .collect();

    assert_eq!(titles.len(), 2);
    assert!(titles.contains("What a day"));
    assert!(titles.contains("Another day"));
}

#[test]
fn fetch_all_rejects_non_positive_persisted_id() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO diary_entries (id, title, content, created_at) VALUES (-4, 'bad', NULL, 1);",
        [],
    )
    .unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let err = repo.fetch_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn update_replaces_every_field_of_the_row() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let replacement = DiaryEntry {
        id: 1,
        title: Some("Revised day".to_string()),
        content: None,
        created_at: 1_234_567_890_000,
    };
    repo.update(Some(&replacement)).unwrap();

    let loaded = repo.fetch_by_id(1).unwrap().unwrap();
    assert_eq!(loaded, replacement);
}

#[test]
fn update_rejects_absent_payload() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let err = repo.update(None).unwrap_err();
    assert!(matches!(err, RepoError::MissingEntry));
}

#[test]
fn update_rejects_zero_and_negative_ids() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let unsaved = DiaryEntry::new(Some("no identity".to_string()), None);
    let zero = repo.update(Some(&unsaved)).unwrap_err();
    assert!(matches!(zero, RepoError::IdOutOfRange { supplied: 0 }));

    let negative = DiaryEntry::with_id(-7, Some("bad identity".to_string()), None);
    let err = repo.update(Some(&negative)).unwrap_err();
    assert!(matches!(err, RepoError::IdOutOfRange { supplied: -7 }));
}

#[test]
fn update_of_missing_row_is_a_write_conflict() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let phantom = DiaryEntry::with_id(5, Some("never stored".to_string()), None);
    let err = repo.update(Some(&phantom)).unwrap_err();
    assert!(matches!(err, RepoError::WriteConflict(5)));
}

#[test]
fn delete_by_id_removes_the_row() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    repo.delete_by_id(1).unwrap();

    assert!(repo.fetch_by_id(1).unwrap().is_none());
    assert!(!repo.exists(1));
    assert_eq!(repo.fetch_all().unwrap().len(), 1);
}

#[test]
fn delete_by_id_rejects_zero_and_negative_ids() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    assert!(matches!(
        repo.delete_by_id(0).unwrap_err(),
        RepoError::IdOutOfRange { supplied: 0 }
    ));
    assert!(matches!(
        repo.delete_by_id(-1).unwrap_err(),
        RepoError::IdOutOfRange { supplied: -1 }
    ));
    assert_eq!(repo.fetch_all().unwrap().len(), 2);
}

#[test]
fn delete_by_id_classifies_missing_row_every_time() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    assert!(matches!(
        repo.delete_by_id(3).unwrap_err(),
        RepoError::MissingEntry
    ));
    assert!(matches!(
        repo.delete_by_id(3).unwrap_err(),
        RepoError::MissingEntry
    ));
}

#[test]
fn exists_reflects_store_state_without_failing() {
    let conn = seeded_conn();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    assert!(repo.exists(1));
    assert!(repo.exists(2));
    assert!(!repo.exists(99));
    assert!(!repo.exists(0));
    assert!(!repo.exists(-1));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_entries_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("diary_entries"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE diary_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            content TEXT
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "diary_entries",
            column: "created_at"
        })
    ));
}

fn seeded_conn() -> Connection {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteEntryRepository::try_new(&conn).unwrap();
        repo.add(Some(DiaryEntry::new(
            Some("What a day".to_string()),
            Some("Strange day".to_string()),
        )))
        .unwrap();
        repo.add(Some(DiaryEntry::new(
            Some("Another day".to_string()),
            Some("Another strange day".to_string()),
        )))
        .unwrap();
    }
    conn
}
