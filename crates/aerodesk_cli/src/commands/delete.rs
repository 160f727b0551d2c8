//! Delete command implementation.

use super::{commit, open_existing};
use aerodesk_core::EntityKind;
use std::path::Path;

/// Runs the delete command.
pub fn run(path: &Path, entity: EntityKind, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let outcome = db.delete_entry(entity, id);
    commit(&db, outcome)
}
