//! Core domain logic for WebDiary.
//! This crate is the single source of truth for request and storage contracts.
//!
//! # Responsibility
//! - Own the diary entry model and every rule about reading and writing it.
//! - Expose a request handler that maps storage results onto caller outcomes.
//! - Keep SQLite access behind one repository seam.
//!
//! # Invariants
//! - All fallible APIs return explicit `Result` types; failures carry enough
//!   context for the caller to classify them without string matching.
//! - The handler layer never touches the database directly.

pub mod db;
pub mod handler;
pub mod logging;
pub mod model;
pub mod repo;

pub use handler::entry_handler::{EntryHandler, Outcome};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{DiaryEntry, EntryId, UNSAVED_ENTRY_ID};
pub use repo::entry_repo::{EntryRepository, RepoError, RepoResult, SqliteEntryRepository};
