//! Init command implementation.

use aerodesk_core::{Config, Database};
use std::path::Path;

/// Runs the init command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_with_config(path, Config::default().error_if_exists(true))?;
    db.save()?;
    db.close()?;

    println!("Initialized empty data directory at {}", path.display());
    Ok(())
}
