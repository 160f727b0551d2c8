//! Search command implementation.

use super::list::print_flights;
use super::open_existing;
use chrono::NaiveDate;
use std::path::Path;

/// Runs the search command.
pub fn run(
    path: &Path,
    from: &str,
    to: &str,
    date: NaiveDate,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let flights = db.search(from, to, date)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&flights)?),
        _ if flights.is_empty() => println!("No scheduled flights from {from} to {to} on {date}"),
        _ => print_flights(&flights),
    }
    Ok(())
}
