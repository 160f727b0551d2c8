//! Consistency checks over the record store and its indexes.

use crate::entity::{
    Aircraft, AircraftId, Booking, BookingId, Flight, FlightId, Passenger, Record, RecordStore,
};
use crate::index::{Index, IndexManager, Indexed};
use crate::seat::validate_geometry;
use crate::types::EntityKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One consistency problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum Issue {
    /// An aircraft has no seats or more seats per row than labels allow.
    InvalidGeometry {
        /// Offending aircraft.
        aircraft: AircraftId,
        /// Seat rows.
        rows: u32,
        /// Seats in each row.
        seats_per_row: u32,
    },
    /// An index disagrees with the table it covers.
    IndexDivergence {
        /// Table the index covers.
        kind: EntityKind,
        /// What disagrees.
        detail: String,
    },
    /// A foreign key names a record that does not exist.
    DanglingReference {
        /// Table of the referencing record.
        kind: EntityKind,
        /// Key of the referencing record.
        key: String,
        /// Referenced table.
        target: EntityKind,
        /// Referenced key.
        target_key: String,
    },
    /// Two active bookings hold the same seat.
    DuplicateActiveSeat {
        /// Flight of the bookings.
        flight: FlightId,
        /// Contested seat number.
        seat: u32,
        /// Active bookings on that seat.
        bookings: Vec<BookingId>,
    },
    /// A booking names a seat the aircraft does not have.
    SeatOutOfRange {
        /// Offending booking.
        booking: BookingId,
        /// Seat number it holds.
        seat: u32,
        /// Seats on the aircraft.
        total: u32,
    },
}

impl Issue {
    /// Returns true for issues a hand-edited table can legitimately carry.
    ///
    /// Index divergence is always a defect. Invalid geometry makes every
    /// seat operation on the aircraft meaningless.
    #[must_use]
    pub fn is_data_issue(&self) -> bool {
        !matches!(
            self,
            Self::IndexDivergence { .. } | Self::InvalidGeometry { .. }
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry {
                aircraft,
                rows,
                seats_per_row,
            } => write!(
                f,
                "aircraft {aircraft} has invalid geometry: {rows} rows x {seats_per_row} seats per row"
            ),
            Self::IndexDivergence { kind, detail } => {
                write!(f, "{kind} index diverges from table: {detail}")
            }
            Self::DanglingReference {
                kind,
                key,
                target,
                target_key,
            } => write!(f, "{kind} {key} references missing {target} {target_key}"),
            Self::DuplicateActiveSeat {
                flight,
                seat,
                bookings,
            } => {
                let ids: Vec<String> = bookings.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "seat {seat} on flight {flight} is held by bookings {}",
                    ids.join(", ")
                )
            }
            Self::SeatOutOfRange {
                booking,
                seat,
                total,
            } => write!(f, "booking {booking} holds seat {seat} of {total}"),
        }
    }
}

/// Outcome of a verification run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    /// Problems found, in check order.
    pub issues: Vec<Issue>,
}

impl VerifyReport {
    /// Returns true if no problem was found.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Runs every check.
#[must_use]
pub fn verify(store: &RecordStore, indexes: &IndexManager) -> VerifyReport {
    let mut issues = Vec::new();
    check_geometry(store, &mut issues);
    check_primary::<Aircraft>(store, indexes, &mut issues);
    check_primary::<Flight>(store, indexes, &mut issues);
    check_primary::<Passenger>(store, indexes, &mut issues);
    check_primary::<Booking>(store, indexes, &mut issues);
    check_flight_bookings(store, indexes, &mut issues);
    check_references(store, indexes, &mut issues);
    check_seats(store, indexes, &mut issues);
    VerifyReport { issues }
}

fn check_geometry(store: &RecordStore, issues: &mut Vec<Issue>) {
    for aircraft in store.aircraft() {
        if validate_geometry(aircraft.rows, aircraft.seats_per_row).is_err() {
            issues.push(Issue::InvalidGeometry {
                aircraft: aircraft.id.clone(),
                rows: aircraft.rows,
                seats_per_row: aircraft.seats_per_row,
            });
        }
    }
}

/// Every row is reachable by its key and every mapping points at its row.
fn check_primary<T: Indexed>(store: &RecordStore, indexes: &IndexManager, issues: &mut Vec<Issue>) {
    let table = store.table::<T>();
    let index = indexes.primary::<T>();

    for (handle, record) in table.entries() {
        if index.get(&record.key()) != Some(handle) {
            issues.push(Issue::IndexDivergence {
                kind: T::KIND,
                detail: format!("{} {} is not indexed at its row", T::KIND, record.key()),
            });
        }
    }
    for (key, handle) in index.iter() {
        if table.get(handle).map(|row| row.key()).as_ref() != Some(key) {
            issues.push(Issue::IndexDivergence {
                kind: T::KIND,
                detail: format!("key {key} points at a different or missing row"),
            });
        }
    }
    if index.len() != table.len() {
        issues.push(Issue::IndexDivergence {
            kind: T::KIND,
            detail: format!("{} keys for {} rows", index.len(), table.len()),
        });
    }
}

fn check_flight_bookings(store: &RecordStore, indexes: &IndexManager, issues: &mut Vec<Issue>) {
    let index = indexes.flight_bookings();
    for (flight, handle) in index.iter() {
        let matches = store
            .bookings()
            .get(handle)
            .is_some_and(|booking| booking.flight_id == *flight);
        if !matches {
            issues.push(Issue::IndexDivergence {
                kind: EntityKind::Booking,
                detail: format!("flight {flight} lists a booking of another flight"),
            });
        }
    }
    if index.len() != store.bookings().len() {
        issues.push(Issue::IndexDivergence {
            kind: EntityKind::Booking,
            detail: format!(
                "{} flight links for {} bookings",
                index.len(),
                store.bookings().len()
            ),
        });
    }
}

fn check_references(store: &RecordStore, indexes: &IndexManager, issues: &mut Vec<Issue>) {
    for flight in store.flights() {
        if !indexes.contains::<Aircraft>(&flight.aircraft_id) {
            issues.push(dangling(
                EntityKind::Flight,
                flight.id,
                EntityKind::Aircraft,
                &flight.aircraft_id,
            ));
        }
    }
    for booking in store.bookings() {
        if !indexes.contains::<Flight>(&booking.flight_id) {
            issues.push(dangling(
                EntityKind::Booking,
                booking.id,
                EntityKind::Flight,
                booking.flight_id,
            ));
        }
        if !indexes.contains::<Passenger>(&booking.passenger_id) {
            issues.push(dangling(
                EntityKind::Booking,
                booking.id,
                EntityKind::Passenger,
                booking.passenger_id,
            ));
        }
    }
}

fn dangling(
    kind: EntityKind,
    key: impl fmt::Display,
    target: EntityKind,
    target_key: impl fmt::Display,
) -> Issue {
    Issue::DanglingReference {
        kind,
        key: key.to_string(),
        target,
        target_key: target_key.to_string(),
    }
}

fn check_seats(store: &RecordStore, indexes: &IndexManager, issues: &mut Vec<Issue>) {
    let mut holders: BTreeMap<(FlightId, u32), Vec<BookingId>> = BTreeMap::new();

    for booking in store.bookings().iter().filter(|b| b.is_active()) {
        holders
            .entry((booking.flight_id, booking.seat_number))
            .or_default()
            .push(booking.id);

        let total = indexes
            .get::<Flight>(store, &booking.flight_id)
            .and_then(|flight| indexes.get::<Aircraft>(store, &flight.aircraft_id))
            .map(Aircraft::total_seats);
        if let Ok(total) = total {
            if booking.seat_number == 0 || booking.seat_number > total {
                issues.push(Issue::SeatOutOfRange {
                    booking: booking.id,
                    seat: booking.seat_number,
                    total,
                });
            }
        }
    }

    for ((flight, seat), bookings) in holders {
        if bookings.len() > 1 {
            issues.push(Issue::DuplicateActiveSeat {
                flight,
                seat,
                bookings,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{date_time_column, AircraftId, PassengerId};
    use crate::persistence::Tables;
    use crate::types::{BookingStatus, FlightStatus};

    fn tables() -> Tables {
        Tables {
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
                cost_per_seat: 120.0,
                aircraft_id: AircraftId::new("A320").unwrap(),
                status: FlightStatus::Scheduled,
            }],
            passengers: vec![Passenger {
                id: PassengerId(1),
                first_name: "Ada".into(),
                surname: "Byrne".into(),
                date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
                email: "ada@example.com".into(),
                phone: "0871234567".into(),
                address: "1 Main St".into(),
            }],
            bookings: vec![],
        }
    }

    fn booking(id: u64, flight: u64, passenger: u64, seat: u32, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId(id),
            flight_id: FlightId(flight),
            passenger_id: PassengerId(passenger),
            seat_number: seat,
            status,
        }
    }

    fn run(tables: Tables) -> VerifyReport {
        let store = RecordStore::from_tables(tables);
        let indexes = IndexManager::build(&store).unwrap();
        verify(&store, &indexes)
    }

    #[test]
    fn consistent_dataset() {
        let mut data = tables();
        data.bookings.push(booking(1, 1, 1, 5, BookingStatus::Booked));
        data.bookings.push(booking(2, 1, 1, 5, BookingStatus::Cancelled));

        let report = run(data);
        assert!(report.is_ok(), "{:?}", report.issues);
    }

    #[test]
    fn dangling_references() {
        let mut data = tables();
        data.bookings.push(booking(1, 7, 9, 1, BookingStatus::Booked));

        let report = run(data);
        let text: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
        assert_eq!(
            text,
            vec![
                "booking 1 references missing flight 7",
                "booking 1 references missing passenger 9",
            ]
        );
        assert!(report.issues.iter().all(Issue::is_data_issue));
    }

    #[test]
    fn duplicate_active_seat_and_range() {
        let mut data = tables();
        data.bookings.push(booking(1, 1, 1, 2, BookingStatus::Booked));
        data.bookings.push(booking(2, 1, 1, 2, BookingStatus::Booked));
        data.bookings.push(booking(3, 1, 1, 9, BookingStatus::Booked));

        let report = run(data);
        assert_eq!(
            report.issues,
            vec![
                Issue::SeatOutOfRange {
                    booking: BookingId(3),
                    seat: 9,
                    total: 6,
                },
                Issue::DuplicateActiveSeat {
                    flight: FlightId(1),
                    seat: 2,
                    bookings: vec![BookingId(1), BookingId(2)],
                },
            ]
        );
    }

    #[test]
    fn stale_index_is_divergence() {
        let mut store = RecordStore::from_tables(tables());
        let indexes = IndexManager::build(&store).unwrap();
        store.remove_where::<Flight, _>(|_| true);

        let report = verify(&store, &indexes);
        assert!(report
            .issues
            .iter()
            .any(|issue| matches!(issue, Issue::IndexDivergence { kind: EntityKind::Flight, .. })));
    }

    #[test]
    fn invalid_geometry_is_not_a_data_issue() {
        let mut data = tables();
        data.aircraft[0].seats_per_row = 30;
        data.aircraft.push(Aircraft {
            id: AircraftId::new("EMPTY").unwrap(),
            rows: 0,
            seats_per_row: 4,
        });

        let report = run(data);
        assert_eq!(
            report.issues[..2],
            [
                Issue::InvalidGeometry {
                    aircraft: AircraftId::new("A320").unwrap(),
                    rows: 2,
                    seats_per_row: 30,
                },
                Issue::InvalidGeometry {
                    aircraft: AircraftId::new("EMPTY").unwrap(),
                    rows: 0,
                    seats_per_row: 4,
                },
            ]
        );
        assert_eq!(
            report.issues[0].to_string(),
            "aircraft A320 has invalid geometry: 2 rows x 30 seats per row"
        );
        assert!(!report.issues[0].is_data_issue());
    }
}
