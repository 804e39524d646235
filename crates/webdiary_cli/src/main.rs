//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive the core crate end to end against an in-memory database.
//! - Keep output deterministic for quick local sanity checks.

use webdiary_core::db::open_db_in_memory;
use webdiary_core::{DiaryEntry, EntryHandler, Outcome, SqliteEntryRepository};

fn main() {
    match smoke() {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(message) => {
            eprintln!("webdiary smoke failed: {message}");
            std::process::exit(1);
        }
    }
}

/// Runs one create/list/get cycle and returns the lines to print.
///
/// A fresh in-memory database always assigns id 1 to the first entry, so the
/// output is stable across runs.
fn smoke() -> Result<Vec<String>, String> {
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let repo = SqliteEntryRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let handler = EntryHandler::new(repo);

    let mut lines = Vec::new();
    lines.push(format!("webdiary_core version={}", env!("CARGO_PKG_VERSION")));

    let draft = DiaryEntry::new(
        Some("First entry".to_string()),
        Some("Written through the full stack".to_string()),
    );
    let created_id = match handler.create(Some(draft)) {
        Outcome::Created { entry, location } => {
            lines.push(format!("created id={} location={location}", entry.id));
            entry.id
        }
        other => return Err(format!("create produced unexpected outcome: {other:?}")),
    };

    match handler.list() {
        Outcome::Entries(entries) => lines.push(format!("listed entries={}", entries.len())),
        other => return Err(format!("list produced unexpected outcome: {other:?}")),
    }

    match handler.get(created_id) {
        Outcome::Entry(entry) => lines.push(format!(
            "fetched id={} title={}",
            entry.id,
            entry.title.unwrap_or_default()
        )),
        other => return Err(format!("get produced unexpected outcome: {other:?}")),
    }

    Ok(lines)
}
