//! Add command implementation.

use super::{commit, open_existing};
use aerodesk_core::NewEntry;
use std::path::Path;

/// Runs the add command.
pub fn run(path: &Path, entry: NewEntry) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let outcome = db.add_entry(entry);
    commit(&db, outcome)
}
