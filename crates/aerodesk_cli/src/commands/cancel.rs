//! Cancel command implementation.

use super::{commit, open_existing};
use aerodesk_core::EntityKind;
use std::path::Path;

/// Runs the cancel command.
pub fn run(path: &Path, entity: EntityKind, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let outcome = db.cancel_entry(entity, id);
    commit(&db, outcome)
}
