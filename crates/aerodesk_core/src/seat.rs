//! Seat inventory: seat numbering, labels and availability.
//!
//! Seats are numbered from 1 row by row. With `s` seats per row, seat `n`
//! sits in row `(n - 1) / s + 1` and column `(n - 1) % s`, and its label is
//! the row followed by a column letter: seat 12 with 6 seats per row is
//! `"2F"`.

use crate::entity::{Aircraft, AircraftId, Booking, Flight, FlightId, RecordStore};
use crate::error::{CoreError, CoreResult};
use crate::index::IndexManager;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Widest supported row; columns are the single letters `A`..=`Z`.
pub const MAX_SEATS_PER_ROW: u32 = 26;

/// Checks an aircraft geometry.
///
/// # Errors
///
/// Returns `Validation` if `rows` is zero or `seats_per_row` is outside
/// `1..=26`.
pub fn validate_geometry(rows: u32, seats_per_row: u32) -> CoreResult<()> {
    if rows == 0 {
        return Err(CoreError::validation("Rows must be at least 1."));
    }
    if seats_per_row == 0 || seats_per_row > MAX_SEATS_PER_ROW {
        return Err(CoreError::validation(format!(
            "Seats per row must be between 1 and {MAX_SEATS_PER_ROW}."
        )));
    }
    if rows.checked_mul(seats_per_row).is_none() {
        return Err(CoreError::validation("Too many seats."));
    }
    Ok(())
}

/// Converts a seat number to its label.
///
/// # Errors
///
/// Returns `Validation` for seat 0 or an unsupported row width.
pub fn seat_number_to_label(seat_number: u32, seats_per_row: u32) -> CoreResult<String> {
    if seats_per_row == 0 || seats_per_row > MAX_SEATS_PER_ROW {
        return Err(CoreError::validation(format!(
            "Seats per row must be between 1 and {MAX_SEATS_PER_ROW}."
        )));
    }
    if seat_number == 0 {
        return Err(CoreError::validation("Seat numbers start at 1."));
    }

    let index = seat_number - 1;
    let row = index / seats_per_row + 1;
    // column < 26, so the cast cannot truncate
    let letter = char::from(b'A' + (index % seats_per_row) as u8);
    Ok(format!("{row}{letter}"))
}

/// Parses a seat label such as `"12F"` into a seat number.
///
/// The column letter is case-insensitive.
///
/// # Errors
///
/// Returns `Validation` if the row digits or the column letter are
/// missing, the row is 0, or the column does not exist for `seats_per_row`.
pub fn seat_label_to_number(label: &str, seats_per_row: u32) -> CoreResult<u32> {
    let invalid = || {
        CoreError::validation(format!(
            "Invalid seat label '{label}'. Please use format like 1A, 12F, etc."
        ))
    };

    let text = label.trim();
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    let (row_text, column_text) = text.split_at(digits);

    let mut column_chars = column_text.chars();
    let letter = match (column_chars.next(), column_chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
        _ => return Err(invalid()),
    };
    let row: u32 = row_text.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }

    let column = u32::from(letter) - u32::from('A');
    if column >= seats_per_row.min(MAX_SEATS_PER_ROW) {
        return Err(CoreError::validation(format!(
            "Seat {label} does not exist: this aircraft has {seats_per_row} seats per row."
        )));
    }

    (row - 1)
        .checked_mul(seats_per_row)
        .and_then(|n| n.checked_add(column + 1))
        .ok_or_else(invalid)
}

/// State of one seat on a seat map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    /// No active booking holds the seat.
    Available,
    /// An active booking holds the seat.
    Booked,
}

/// Seat-by-seat occupancy of one flight, laid out by row.
#[derive(Debug, Clone, Serialize)]
pub struct SeatMap {
    /// Flight the map describes.
    pub flight: FlightId,
    /// Aircraft operating the flight.
    pub aircraft: AircraftId,
    /// Seats in each row.
    pub seats_per_row: u32,
    /// One entry per row, one state per seat.
    pub rows: Vec<Vec<SeatState>>,
}

impl SeatMap {
    /// Returns the number of free seats.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|state| **state == SeatState::Available)
            .count()
    }

    /// Returns the number of seats on the aircraft.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

impl fmt::Display for SeatMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.len().to_string().len();
        write!(f, "{:width$} ", "")?;
        for column in 0..self.seats_per_row {
            let letter = u8::try_from(column)
                .ok()
                .filter(|c| u32::from(*c) < MAX_SEATS_PER_ROW)
                .map_or('?', |c| char::from(b'A' + c));
            write!(f, " {letter}")?;
        }
        writeln!(f)?;
        for (row, seats) in self.rows.iter().enumerate() {
            write!(f, "{:>width$} ", row + 1)?;
            for seat in seats {
                let mark = match seat {
                    SeatState::Available => '◯',
                    SeatState::Booked => '●',
                };
                write!(f, " {mark}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read-only seat queries over the record store.
#[derive(Debug, Clone, Copy)]
pub struct SeatInventory<'a> {
    store: &'a RecordStore,
    indexes: &'a IndexManager,
}

impl<'a> SeatInventory<'a> {
    /// Creates an inventory view.
    #[must_use]
    pub fn new(store: &'a RecordStore, indexes: &'a IndexManager) -> Self {
        Self { store, indexes }
    }

    /// Resolves a flight and the aircraft operating it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown flight or a missing aircraft.
    pub fn resolve(&self, flight_id: FlightId) -> CoreResult<(&'a Flight, &'a Aircraft)> {
        let flight: &Flight = self.indexes.get(self.store, &flight_id)?;
        let aircraft: &Aircraft = self.indexes.get(self.store, &flight.aircraft_id)?;
        Ok((flight, aircraft))
    }

    /// Returns the seat numbers held by active bookings on `flight_id`.
    #[must_use]
    pub fn booked_seats(&self, flight_id: FlightId) -> BTreeSet<u32> {
        self.indexes
            .bookings_for_flight(self.store, flight_id)
            .into_iter()
            .filter(|booking| booking.is_active())
            .map(|booking| booking.seat_number)
            .collect()
    }

    /// Returns the free seat numbers in ascending order, possibly none.
    pub fn free_seats(&self, flight_id: FlightId) -> CoreResult<Vec<u32>> {
        let (_, aircraft) = self.resolve(flight_id)?;
        let booked = self.booked_seats(flight_id);
        Ok((1..=aircraft.total_seats())
            .filter(|seat| !booked.contains(seat))
            .collect())
    }

    /// Returns the free seat numbers in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown flight or aircraft and `Conflict`
    /// when every seat is taken.
    pub fn available_seats(&self, flight_id: FlightId) -> CoreResult<Vec<u32>> {
        let seats = self.free_seats(flight_id)?;
        if seats.is_empty() {
            return Err(CoreError::conflict(format!(
                "Flight {flight_id} is fully booked."
            )));
        }
        Ok(seats)
    }

    /// Returns the active booking holding `seat_number`, if any.
    #[must_use]
    pub fn holder(&self, flight_id: FlightId, seat_number: u32) -> Option<&'a Booking> {
        self.indexes
            .bookings_for_flight(self.store, flight_id)
            .into_iter()
            .find(|booking| booking.is_active() && booking.seat_number == seat_number)
    }

    /// Builds the seat map of a flight.
    pub fn seat_map(&self, flight_id: FlightId) -> CoreResult<SeatMap> {
        let (flight, aircraft) = self.resolve(flight_id)?;
        let booked = self.booked_seats(flight_id);

        let rows = (0..aircraft.rows)
            .map(|row| {
                (1..=aircraft.seats_per_row)
                    .map(|column| {
                        let seat = row * aircraft.seats_per_row + column;
                        if booked.contains(&seat) {
                            SeatState::Booked
                        } else {
                            SeatState::Available
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(SeatMap {
            flight: flight.id,
            aircraft: aircraft.id.clone(),
            seats_per_row: aircraft.seats_per_row,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{date_time_column, BookingId, PassengerId};
    use crate::persistence::Tables;
    use crate::types::{BookingStatus, FlightStatus};
    use proptest::prelude::*;

    #[test]
    fn number_to_label() {
        assert_eq!(seat_number_to_label(1, 6).unwrap(), "1A");
        assert_eq!(seat_number_to_label(12, 6).unwrap(), "2F");
        assert_eq!(seat_number_to_label(5, 3).unwrap(), "2B");
        assert_eq!(seat_number_to_label(26, 26).unwrap(), "1Z");
    }

    #[test]
    fn number_to_label_rejects_bad_input() {
        assert!(seat_number_to_label(0, 6).is_err());
        assert!(seat_number_to_label(1, 0).is_err());
        assert!(seat_number_to_label(1, 27).is_err());
    }

    #[test]
    fn label_to_number() {
        assert_eq!(seat_label_to_number("2B", 3).unwrap(), 5);
        assert_eq!(seat_label_to_number("12f", 6).unwrap(), 72);
        assert_eq!(seat_label_to_number(" 1A ", 1).unwrap(), 1);
    }

    #[test]
    fn label_to_number_rejects_malformed() {
        for label in ["", "A", "12", "0A", "1AB", "A1", "1-", "1é"] {
            let err = seat_label_to_number(label, 6).unwrap_err();
            assert!(
                matches!(err, CoreError::Validation { .. }),
                "label {label:?}"
            );
        }
    }

    #[test]
    fn label_column_beyond_row_width() {
        let err = seat_label_to_number("1D", 3).unwrap_err();
        assert!(err.to_string().contains("3 seats per row"));
    }

    #[test]
    fn geometry_limits() {
        assert!(validate_geometry(2, 3).is_ok());
        assert!(validate_geometry(0, 3).is_err());
        assert!(validate_geometry(2, 0).is_err());
        assert!(validate_geometry(2, 27).is_err());
    }

    proptest! {
        #[test]
        fn label_round_trip(spr in 1u32..=26, row in 1u32..=200, column in 0u32..26) {
            prop_assume!(column < spr);
            let n = (row - 1) * spr + column + 1;
            let label = seat_number_to_label(n, spr).unwrap();
            prop_assert_eq!(seat_label_to_number(&label, spr).unwrap(), n);
        }
    }

    fn scenario(bookings: Vec<(u64, u32, BookingStatus)>) -> (RecordStore, IndexManager) {
        let tables = Tables {
            aircraft: vec![Aircraft {
                id: AircraftId::new("A320").unwrap(),
                rows: 2,
                seats_per_row: 3,
            }],
            flights: vec![Flight {
                id: FlightId(1),
                departure_city: "Dublin".into(),
                arrival_city: "Paris".into(),
                date_time: date_time_column::parse("2025-12-25 14:30:00").unwrap(),
                capacity: 6,
                cost_per_seat: 99.0,
                aircraft_id: AircraftId::new("A320").unwrap(),
                status: FlightStatus::Scheduled,
            }],
            bookings: bookings
                .into_iter()
                .map(|(id, seat, status)| Booking {
                    id: BookingId(id),
                    flight_id: FlightId(1),
                    passenger_id: PassengerId(1),
                    seat_number: seat,
                    status,
                })
                .collect(),
            ..Tables::default()
        };
        let store = RecordStore::from_tables(tables);
        let indexes = IndexManager::build(&store).unwrap();
        (store, indexes)
    }

    #[test]
    fn available_excludes_active_bookings_only() {
        let (store, indexes) = scenario(vec![
            (1, 5, BookingStatus::Booked),
            (2, 2, BookingStatus::Cancelled),
        ]);
        let seats = SeatInventory::new(&store, &indexes);

        assert_eq!(seats.available_seats(FlightId(1)).unwrap(), vec![1, 2, 3, 4, 6]);
        assert_eq!(seats.holder(FlightId(1), 5).unwrap().id, BookingId(1));
        assert!(seats.holder(FlightId(1), 2).is_none());
    }

    #[test]
    fn fully_booked_is_conflict() {
        let (store, indexes) = scenario(
            (1..=6)
                .map(|seat| (u64::from(seat), seat, BookingStatus::Booked))
                .collect(),
        );
        let seats = SeatInventory::new(&store, &indexes);

        let err = seats.available_seats(FlightId(1)).unwrap_err();
        assert_eq!(err.to_string(), "Flight 1 is fully booked.");
        assert!(seats.free_seats(FlightId(1)).unwrap().is_empty());

        let map = seats.seat_map(FlightId(1)).unwrap();
        assert_eq!(map.available_count(), 0);
        assert_eq!(map.total(), 6);
    }

    #[test]
    fn unknown_flight_is_not_found() {
        let (store, indexes) = scenario(vec![]);
        let seats = SeatInventory::new(&store, &indexes);
        let err = seats.available_seats(FlightId(2)).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn seat_map_layout() {
        let (store, indexes) = scenario(vec![(1, 5, BookingStatus::Booked)]);
        let map = SeatInventory::new(&store, &indexes).seat_map(FlightId(1)).unwrap();

        assert_eq!(map.rows.len(), 2);
        assert_eq!(map.rows[1][1], SeatState::Booked);
        assert_eq!(map.available_count(), 5);

        let text = map.to_string();
        assert!(text.starts_with("   A B C\n"));
        assert!(text.contains("2  ◯ ● ◯"));
    }

    #[test]
    fn wide_seat_map_displays_unlabelled_columns() {
        let map = SeatMap {
            flight: FlightId(1),
            aircraft: AircraftId::new("WIDE").unwrap(),
            seats_per_row: 300,
            rows: vec![vec![SeatState::Available; 300]],
        };

        let text = map.to_string();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("   A B"));
        assert!(header.contains(" Z ?"));
        assert_eq!(header.matches('?').count(), 274);
    }
}
