//! Domain model for diary records.
//!
//! # Responsibility
//! - Define the canonical data structure shared by handler and storage.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned positive id.
//! - Deletion is a hard row removal; there are no tombstones.

pub mod entry;
