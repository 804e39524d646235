//! Entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage-access API over the canonical `diary_entries` table.
//! - Classify every domain failure (id range, absent input, write conflict)
//!   before it crosses the handler seam.
//!
//! # Invariants
//! - Non-positive ids are rejected before any SQL runs.
//! - Absent payloads are classified here rather than in the handler, so
//!   callers that bypass the handler get the same guarantees.
//! - Absence on reads is `Ok(None)`; absence on delete is a failure.
//! - Inserts never bind a caller-supplied id; the store assigns it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::entry::{DiaryEntry, EntryId, UNSAVED_ENTRY_ID};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ENTRIES_TABLE: &str = "diary_entries";
const ENTRIES_COLUMNS: [&str; 4] = ["id", "title", "content", "created_at"];

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at
FROM diary_entries";

pub type RepoResult<T> = Result<T, RepoError>;

/// Classified failure raised by entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller supplied a non-positive id where a persisted id is required.
    IdOutOfRange { supplied: EntryId },
    /// Required entry value was absent: no payload, or no row to delete.
    MissingEntry,
    /// The targeted row changed or vanished between read and write time.
    /// Never surfaced to callers raw; the handler resolves it with an
    /// existence re-check.
    WriteConflict(EntryId),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing from the connection.
    MissingRequiredTable(&'static str),
    /// Required column is missing from an expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid entry.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            // Caller-visible validation message; the handler forwards it
            // verbatim, so the wording is part of the contract.
            Self::IdOutOfRange { .. } => write!(f, "Id must be greater than zero"),
            Self::MissingEntry => write!(f, "required diary entry was absent"),
            Self::WriteConflict(id) => write!(f, "write conflict on diary entry {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "entries repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "entries repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "entries repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage-access contract for diary entries.
///
/// Implementations own all domain validation: range checks and absent-input
/// classification happen behind this trait, never in request orchestration.
pub trait EntryRepository {
    /// Fetches one entry by id. Absence is `Ok(None)`, not a failure.
    fn fetch_by_id(&self, id: EntryId) -> RepoResult<Option<DiaryEntry>>;
    /// Fetches every persisted entry. Callers get no ordering guarantee.
    fn fetch_all(&self) -> RepoResult<Vec<DiaryEntry>>;
    /// Persists a new entry and returns it carrying its store-assigned id.
    /// Any id the caller supplied is discarded, not validated against.
    fn add(&self, entry: Option<DiaryEntry>) -> RepoResult<DiaryEntry>;
    /// Replaces the full row identified by `entry.id`.
    fn update(&self, entry: Option<&DiaryEntry>) -> RepoResult<()>;
    /// Removes the row identified by `id`.
    fn delete_by_id(&self, id: EntryId) -> RepoResult<()>;
    /// Existence probe used to disambiguate write conflicts after the fact.
    /// Never fails; a store error during the probe reads as absent.
    fn exists(&self, id: EntryId) -> bool;
}

/// SQLite-backed entry repository.
///
/// Borrows its connection for one request scope; dropping the repository
/// releases the handle exactly once on every exit path.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository over a migrated, ready connection.
    ///
    /// Connections that skipped `open_db` bootstrap are rejected so callers
    /// fail loudly instead of hitting missing-schema SQL errors later.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn fetch_by_id(&self, id: EntryId) -> RepoResult<Option<DiaryEntry>> {
        ensure_id_in_range(id)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn fetch_all(&self) -> RepoResult<Vec<DiaryEntry>> {
        let mut stmt = self.conn.prepare(&format!("{ENTRY_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn add(&self, entry: Option<DiaryEntry>) -> RepoResult<DiaryEntry> {
        let mut entry = match entry {
            Some(entry) => entry,
            None => return Err(RepoError::MissingEntry),
        };

        // The id column is never bound here: the store is the sole authority
        // for id assignment.
        self.conn.execute(
            "INSERT INTO diary_entries (title, content, created_at)
             VALUES (?1, ?2, ?3);",
            params![
                entry.title.as_deref(),
                entry.content.as_deref(),
                entry.created_at,
            ],
        )?;

        entry.id = self.conn.last_insert_rowid();
        Ok(entry)
    }

    fn update(&self, entry: Option<&DiaryEntry>) -> RepoResult<()> {
        let entry = match entry {
            Some(entry) => entry,
            None => return Err(RepoError::MissingEntry),
        };
        ensure_id_in_range(entry.id)?;

        let changed = self.conn.execute(
            "UPDATE diary_entries
             SET
                title = ?1,
                content = ?2,
                created_at = ?3
             WHERE id = ?4;",
            params![
                entry.title.as_deref(),
                entry.content.as_deref(),
                entry.created_at,
                entry.id,
            ],
        )?;

        // Zero changed rows is the store's stale-write signal.
        if changed == 0 {
            return Err(RepoError::WriteConflict(entry.id));
        }

        Ok(())
    }

    fn delete_by_id(&self, id: EntryId) -> RepoResult<()> {
        ensure_id_in_range(id)?;

        let changed = self
            .conn
            .execute("DELETE FROM diary_entries WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::MissingEntry);
        }

        Ok(())
    }

    fn exists(&self, id: EntryId) -> bool {
        let probe = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM diary_entries
                WHERE id = ?1
            );",
            [id],
            |row| row.get::<_, i64>(0),
        );
        matches!(probe, Ok(1))
    }
}

fn ensure_id_in_range(id: EntryId) -> RepoResult<()> {
    if id <= UNSAVED_ENTRY_ID {
        return Err(RepoError::IdOutOfRange { supplied: id });
    }
    Ok(())
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<DiaryEntry> {
    let id: EntryId = row.get("id")?;
    if id <= UNSAVED_ENTRY_ID {
        return Err(RepoError::InvalidData(format!(
            "non-positive id `{id}` in diary_entries.id"
        )));
    }

    Ok(DiaryEntry {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, ENTRIES_TABLE)? {
        return Err(RepoError::MissingRequiredTable(ENTRIES_TABLE));
    }

    for column in ENTRIES_COLUMNS {
        if !table_has_column(conn, ENTRIES_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: ENTRIES_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(found == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
