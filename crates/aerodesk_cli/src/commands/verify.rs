//! Verify command implementation.

use super::open_existing;
use std::path::Path;

/// Runs the verify command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let report = db.verify()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Verifying data directory at {}", path.display());
        println!();
        for issue in &report.issues {
            println!("  ✗ {issue}");
        }
    }

    if report.is_ok() {
        if format != "json" {
            println!("✓ Tables and indexes are consistent");
        }
        Ok(())
    } else {
        Err(format!("{} issue(s) found", report.issues.len()).into())
    }
}
