//! Inspect command implementation.

use super::open_existing;
use aerodesk_core::DatabaseStats;
use serde::Serialize;
use std::path::Path;

/// Data directory inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Data directory path.
    pub path: String,
    /// Record counts.
    #[serde(flatten)]
    pub stats: DatabaseStats,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let result = InspectResult {
        path: path.display().to_string(),
        stats: db.stats()?,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }
    Ok(())
}

fn print_text_output(result: &InspectResult) {
    let stats = &result.stats;
    println!("aerodesk Data Directory");
    println!("=======================");
    println!();
    println!("Path: {}", result.path);
    println!();
    println!("Aircraft:    {}", stats.aircraft);
    println!(
        "Flights:     {} ({} scheduled, {} cancelled)",
        stats.flights, stats.scheduled_flights, stats.cancelled_flights
    );
    println!("Passengers:  {}", stats.passengers);
    println!(
        "Bookings:    {} ({} active, {} cancelled)",
        stats.bookings, stats.active_bookings, stats.cancelled_bookings
    );
    println!();
    println!("Total records: {}", stats.total());
}
