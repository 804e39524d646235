//! Request handling layer.
//!
//! # Responsibility
//! - Orchestrate storage access per request verb.
//! - Own the outcome vocabulary consumed by transport shells.
//!
//! # Invariants
//! - Control flow per request runs from handler into storage and back.
//!   No cross-request state is held here.

pub mod entry_handler;
