//! Storage access layer.
//!
//! # Responsibility
//! - Define the data-access contract for diary entries.
//! - Isolate SQLite query details from request orchestration.
//!
//! # Invariants
//! - Repository APIs return classified errors (`RepoError`), never raw
//!   SQLite failures.
//! - Identifier validation lives behind this layer so every call path gets
//!   the same guarantees.

pub mod entry_repo;
