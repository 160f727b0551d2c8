//! Book command implementation.

use super::{commit, open_existing};
use aerodesk_core::{FlightId, PassengerId};
use std::path::Path;

/// Runs the book command.
pub fn run(
    path: &Path,
    flight_id: FlightId,
    passenger_id: PassengerId,
    seat_label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let outcome = db.book_seat_entry(flight_id, passenger_id, seat_label);
    commit(&db, outcome)
}
