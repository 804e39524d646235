//! Diary entry domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted by the entries store.
//! - Provide constructors that keep the unsaved-id sentinel consistent.
//!
//! # Invariants
//! - `id == 0` means "not yet persisted"; any stored entry has `id > 0`.
//! - `id` is assigned by the store and never changes afterwards.
//! - `created_at` is set by the caller (or defaulted at creation time) and
//!   is never re-derived by the store.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned identifier for a persisted diary entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = i64;

/// Sentinel id carried by entries that have not been persisted yet.
pub const UNSAVED_ENTRY_ID: EntryId = 0;

/// One diary entry.
///
/// Serde defaults keep creation payloads ergonomic: a body without `id`
/// decodes to the unsaved sentinel, and a body without `created_at` is
/// stamped at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Row identifier; `0` until the store assigns one.
    #[serde(default)]
    pub id: EntryId,
    /// Short free-form heading.
    pub title: Option<String>,
    /// Free-form body text.
    pub content: Option<String>,
    /// Creation instant in Unix epoch milliseconds.
    #[serde(default = "current_epoch_ms")]
    pub created_at: i64,
}

impl DiaryEntry {
    /// Creates an unsaved entry stamped with the current instant.
    pub fn new(title: Option<String>, content: Option<String>) -> Self {
        Self {
            id: UNSAVED_ENTRY_ID,
            title,
            content,
            created_at: current_epoch_ms(),
        }
    }

    /// Creates an entry carrying a known id.
    ///
    /// Used by update payloads and test fixtures where identity already
    /// exists; the store itself never accepts a caller-chosen id on insert.
    pub fn with_id(id: EntryId, title: Option<String>, content: Option<String>) -> Self {
        Self {
            id,
            ..Self::new(title, content)
        }
    }
}

/// Returns the current instant as Unix epoch milliseconds.
pub fn current_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
