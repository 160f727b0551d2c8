//! Seats command implementation.

use super::open_existing;
use aerodesk_core::{seat_number_to_label, FlightId};
use std::path::Path;

/// Runs the seats command.
pub fn run(path: &Path, flight_id: FlightId, map: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let flight = db.flight(flight_id)?;
    let seat_map = db.seat_map(flight_id)?;

    println!("SEAT MAP - Flight {flight_id}");
    println!("{} → {}", flight.departure_city, flight.arrival_city);
    println!(
        "Aircraft: {} ({} rows x {} seats per row)",
        seat_map.aircraft,
        seat_map.rows.len(),
        seat_map.seats_per_row
    );
    println!();

    if map {
        print!("{seat_map}");
        println!();
        println!("◯ = Available  ● = Booked");
        return Ok(());
    }

    let available = db.available_seats(flight_id)?;
    let labels = available
        .iter()
        .map(|seat| seat_number_to_label(*seat, seat_map.seats_per_row))
        .collect::<Result<Vec<_>, _>>()?;
    println!(
        "{} seats available out of {} total seats.",
        available.len(),
        seat_map.total()
    );
    println!("{}", labels.join(" "));
    Ok(())
}
