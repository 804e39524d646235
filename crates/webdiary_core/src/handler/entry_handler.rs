//! Request orchestration for diary entries.
//!
//! # Responsibility
//! - Map each verb (list/get/create/delete/update) onto storage access.
//! - Translate storage classifications into caller-visible outcomes.
//!
//! # Invariants
//! - Every failure maps to exactly one outcome on the first attempt;
//!   nothing is retried.
//! - A write conflict is resolved by re-checking existence, in that order.
//! - Path/body id equality and the non-zero-id creation check are the only
//!   validation owned by this layer; all other domain rules live in storage.

use crate::model::entry::{DiaryEntry, EntryId, UNSAVED_ENTRY_ID};
use crate::repo::entry_repo::{EntryRepository, RepoError};

const MSG_ENTRY_NULL: &str = "Entry cannot be null";
const MSG_ID_NOT_ZERO: &str = "Id must be zero or not be set when adding a new entry";
const MSG_ID_MISMATCH: &str = "Id in the URL does not match Id in the body";
const MSG_NO_MATCHING_ENTRY: &str = "No matching entry found.";
const MSG_DELETE_NO_ENTRY: &str = "No entry found with given Id. Delete failed.";

/// Transport-agnostic outcome of one diary request.
///
/// A transport shell maps these onto whatever status-code convention it
/// uses; the five-way split (entity / no entity / invalid input / not found
/// / internal) is the part that must survive the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Success carrying one entry.
    Entry(DiaryEntry),
    /// Success carrying the full entry collection.
    Entries(Vec<DiaryEntry>),
    /// Entry persisted; carries the stored row and its location reference.
    Created { entry: DiaryEntry, location: String },
    /// Success with no body.
    NoContent,
    /// A caller-supplied value was malformed or disallowed.
    InvalidInput(String),
    /// The referenced entry does not exist. The message is absent only for
    /// the empty-listing outcome.
    NotFound(Option<String>),
    /// A failure the handler cannot classify further. Carries no message.
    Internal,
}

/// Request handler for the five diary verbs.
///
/// Owns its storage access for one request scope; drop order releases the
/// underlying connection handle exactly once on every exit path.
pub struct EntryHandler<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryHandler<R> {
    /// Creates a handler over the provided storage access implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every entry.
    ///
    /// An empty store is reported as a not-found style outcome rather than
    /// a success with an empty collection, so callers can tell the two
    /// apart.
    pub fn list(&self) -> Outcome {
        match self.repo.fetch_all() {
            Ok(entries) if entries.is_empty() => Outcome::NotFound(None),
            Ok(entries) => Outcome::Entries(entries),
            Err(_) => Outcome::Internal,
        }
    }

    /// Gets one entry by its path id.
    pub fn get(&self, id: EntryId) -> Outcome {
        match self.repo.fetch_by_id(id) {
            Ok(Some(entry)) => Outcome::Entry(entry),
            Ok(None) => Outcome::NotFound(Some(MSG_NO_MATCHING_ENTRY.to_string())),
            Err(err @ RepoError::IdOutOfRange { .. }) => Outcome::InvalidInput(err.to_string()),
            Err(_) => Outcome::Internal,
        }
    }

    /// Creates an entry from an optional request body.
    ///
    /// # Contract
    /// - A body carrying a non-zero id is rejected here; storage access is
    ///   not invoked for it.
    /// - An absent body is delegated so storage classifies it.
    /// - Success carries the persisted entry and a location reference built
    ///   from its assigned id.
    pub fn create(&self, entry: Option<DiaryEntry>) -> Outcome {
        if let Some(body) = entry.as_ref() {
            if body.id != UNSAVED_ENTRY_ID {
                return Outcome::InvalidInput(MSG_ID_NOT_ZERO.to_string());
            }
        }

        match self.repo.add(entry) {
            Ok(persisted) => Outcome::Created {
                location: entry_location(persisted.id),
                entry: persisted,
            },
            Err(RepoError::MissingEntry) => Outcome::InvalidInput(MSG_ENTRY_NULL.to_string()),
            Err(_) => Outcome::Internal,
        }
    }

    /// Deletes one entry by its path id.
    pub fn delete(&self, id: EntryId) -> Outcome {
        match self.repo.delete_by_id(id) {
            Ok(()) => Outcome::NoContent,
            Err(err @ RepoError::IdOutOfRange { .. }) => Outcome::InvalidInput(err.to_string()),
            Err(RepoError::MissingEntry) => {
                Outcome::NotFound(Some(MSG_DELETE_NO_ENTRY.to_string()))
            }
            Err(_) => Outcome::Internal,
        }
    }

    /// Replaces one entry identified by its path id.
    ///
    /// # Contract
    /// - Path/body id mismatch fails before storage access is invoked.
    /// - A write conflict is resolved by re-checking existence: row gone
    ///   maps to not-found; row still present maps to the internal outcome.
    ///   The conflict is never retried.
    pub fn update(&self, id: EntryId, entry: Option<DiaryEntry>) -> Outcome {
        if let Some(body) = entry.as_ref() {
            if body.id != id {
                return Outcome::InvalidInput(MSG_ID_MISMATCH.to_string());
            }
        }

        match self.repo.update(entry.as_ref()) {
            Ok(()) => Outcome::NoContent,
            Err(RepoError::MissingEntry) => Outcome::InvalidInput(MSG_ENTRY_NULL.to_string()),
            Err(err @ RepoError::IdOutOfRange { .. }) => Outcome::InvalidInput(err.to_string()),
            Err(RepoError::WriteConflict(conflicted)) => {
                // The probe runs only after the failed write, never before.
                if self.repo.exists(conflicted) {
                    Outcome::Internal
                } else {
                    Outcome::NotFound(Some(MSG_NO_MATCHING_ENTRY.to_string()))
                }
            }
            Err(_) => Outcome::Internal,
        }
    }
}

/// Builds the relative location reference for a persisted entry.
fn entry_location(id: EntryId) -> String {
    format!("api/diary-entries/{id}")
}
