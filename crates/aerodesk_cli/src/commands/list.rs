//! List command implementation.

use super::open_existing;
use aerodesk_core::{date_time_column, Aircraft, Booking, EntityKind, Flight, Passenger};
use std::path::Path;

/// Runs the list command.
///
/// `sorted` orders flights by price (highest first) and bookings by id.
pub fn run(
    path: &Path,
    entity: EntityKind,
    sorted: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_existing(path)?;
    let json = format == "json";

    match entity {
        EntityKind::Flight => {
            let flights = if sorted {
                db.flights_by_price()?
            } else {
                db.flights()?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&flights)?);
            } else {
                print_flights(&flights);
            }
        }
        EntityKind::Passenger => {
            let passengers = db.passengers()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&passengers)?);
            } else {
                print_passengers(&passengers);
            }
        }
        EntityKind::Booking => {
            let bookings = if sorted {
                db.bookings_by_id()?
            } else {
                db.bookings()?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&bookings)?);
            } else {
                print_bookings(&bookings);
            }
        }
        EntityKind::Aircraft => {
            let aircraft = db.all_aircraft()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&aircraft)?);
            } else {
                print_aircraft(&aircraft);
            }
        }
    }
    Ok(())
}

pub(crate) fn print_flights(flights: &[Flight]) {
    println!(
        "{:>6}  {:<14} {:<14} {:<19}  {:>8}  {:>8}  {:<8}  Status",
        "ID", "From", "To", "Date/Time", "Capacity", "Cost", "Aircraft"
    );
    for flight in flights {
        println!(
            "{:>6}  {:<14} {:<14} {:<19}  {:>8}  {:>8.2}  {:<8}  {}",
            flight.id,
            flight.departure_city,
            flight.arrival_city,
            flight.date_time.format(date_time_column::FORMAT).to_string(),
            flight.capacity,
            flight.cost_per_seat,
            flight.aircraft_id,
            flight.status
        );
    }
    println!("{} flight(s)", flights.len());
}

fn print_passengers(passengers: &[Passenger]) {
    for passenger in passengers {
        println!(
            "{:>6}  {:<24} {}  {:<28} {:<14} {}",
            passenger.id,
            passenger.full_name(),
            passenger.date_of_birth,
            passenger.email,
            passenger.phone,
            passenger.address
        );
    }
    println!("{} passenger(s)", passengers.len());
}

fn print_bookings(bookings: &[Booking]) {
    println!(
        "{:>6}  {:>6}  {:>9}  {:>4}  Status",
        "ID", "Flight", "Passenger", "Seat"
    );
    for booking in bookings {
        println!(
            "{:>6}  {:>6}  {:>9}  {:>4}  {}",
            booking.id, booking.flight_id, booking.passenger_id, booking.seat_number, booking.status
        );
    }
    println!("{} booking(s)", bookings.len());
}

fn print_aircraft(aircraft: &[Aircraft]) {
    for plane in aircraft {
        println!(
            "{:<10} {} rows x {} seats ({} total)",
            plane.id.as_str(),
            plane.rows,
            plane.seats_per_row,
            plane.total_seats()
        );
    }
    println!("{} aircraft", aircraft.len());
}
