//! Cross-crate integration test helpers.
//!
//! [`IntegrationHarness`] replays generated [`Operation`]s against a
//! database and checks after every step that failed steps changed
//! nothing and that tables, indexes and seats still agree.

use crate::fixtures::TestDatabase;
use crate::generators::Operation;
use aerodesk_core::{
    AircraftId, BookingId, CoreError, CoreResult, Database, EntityKind, FlightId, NewAircraft,
    NewBooking, NewFlight, PassengerId, RecordKey, SeatState,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// A test harness for integration testing.
pub struct IntegrationHarness {
    /// The database under test.
    pub db: TestDatabase,
    /// Every aircraft id handed out, deleted ones included.
    aircraft: Vec<AircraftId>,
    applied: usize,
    rejected: usize,
}

impl IntegrationHarness {
    /// Creates a new integration harness with an in-memory database.
    pub fn new() -> Self {
        Self::over(TestDatabase::memory())
    }

    /// Creates a harness over a temporary data directory.
    pub fn file() -> Self {
        Self::over(TestDatabase::file())
    }

    fn over(db: TestDatabase) -> Self {
        Self {
            db,
            aircraft: Vec::new(),
            applied: 0,
            rejected: 0,
        }
    }

    /// Applies one operation, then checks consistency.
    ///
    /// # Panics
    ///
    /// Panics if a rejected operation changed any table, or if the
    /// store is inconsistent afterwards.
    pub fn apply(&mut self, op: &Operation) -> CoreResult<()> {
        let before = self.db.tables().expect("Failed to snapshot");
        let result = self.run(op);

        match &result {
            Ok(()) => self.applied += 1,
            Err(err) => {
                self.rejected += 1;
                assert_eq!(
                    self.db.tables().expect("Failed to snapshot"),
                    before,
                    "rejected {op:?} ({err}) changed the tables"
                );
            }
        }
        self.assert_consistent();
        result
    }

    /// Applies every operation, ignoring rejections.
    pub fn apply_all(&mut self, ops: &[Operation]) {
        for op in ops {
            let _ = self.apply(op);
        }
    }

    fn run(&mut self, op: &Operation) -> CoreResult<()> {
        let db = &self.db.db;
        match op {
            Operation::AddAircraft {
                rows,
                seats_per_row,
            } => {
                let id = AircraftId::new(format!("AC{}", self.aircraft.len() + 1))?;
                db.add(
                    NewAircraft {
                        id: id.clone(),
                        rows: *rows,
                        seats_per_row: *seats_per_row,
                    }
                    .into(),
                )?;
                self.aircraft.push(id);
            }
            Operation::AddFlight {
                aircraft,
                from,
                to,
                day,
                cost_cents,
            } => {
                let aircraft_id = match self.aircraft.get(*aircraft) {
                    Some(id) => id.clone(),
                    None => AircraftId::new("NONE")?,
                };
                let date = NaiveDate::from_ymd_opt(2025, 1, 1)
                    .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(*day))))
                    .and_then(|d| d.and_hms_opt(9, 0, 0))
                    .ok_or_else(|| CoreError::validation("date out of range"))?;
                db.add(
                    NewFlight {
                        aircraft_id,
                        departure_city: from.clone(),
                        arrival_city: to.clone(),
                        date_time: date,
                        cost_per_seat: f64::from(*cost_cents) / 100.0,
                    }
                    .into(),
                )?;
            }
            Operation::AddPassenger(passenger) => {
                db.add(passenger.clone().into())?;
            }
            Operation::Book {
                flight,
                passenger,
                seat,
            } => {
                db.add(
                    NewBooking {
                        flight_id: FlightId(*flight),
                        passenger_id: PassengerId(*passenger),
                        seat_number: *seat,
                    }
                    .into(),
                )?;
            }
            Operation::Cancel { kind, id } => {
                let key = match kind {
                    EntityKind::Flight => RecordKey::Flight(FlightId(*id)),
                    _ => RecordKey::Booking(BookingId(*id)),
                };
                db.cancel(&key)?;
            }
            Operation::Delete { kind, id } => {
                let key = match kind {
                    EntityKind::Flight => RecordKey::Flight(FlightId(*id)),
                    EntityKind::Passenger => RecordKey::Passenger(PassengerId(*id)),
                    EntityKind::Booking => RecordKey::Booking(BookingId(*id)),
                    EntityKind::Aircraft => {
                        let index = usize::try_from(*id).unwrap_or(usize::MAX);
                        match self.aircraft.get(index) {
                            Some(id) => RecordKey::Aircraft(id.clone()),
                            None => return Err(CoreError::not_found(EntityKind::Aircraft, id)),
                        }
                    }
                };
                db.delete(&key)?;
            }
        }
        Ok(())
    }

    /// Checks every index, reference and seat.
    ///
    /// # Panics
    ///
    /// Panics on the first inconsistency.
    pub fn assert_consistent(&self) {
        let report = self.db.verify().expect("Failed to verify");
        assert!(report.is_ok(), "inconsistent store: {:?}", report.issues);

        for flight in self.db.flights().expect("Failed to list flights") {
            assert_seats_partitioned(&self.db, flight.id);
        }
    }

    /// Returns how many operations succeeded.
    pub fn applied_count(&self) -> usize {
        self.applied
    }

    /// Returns how many operations were rejected.
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Asserts that the free and booked seats of a flight split its seat range.
///
/// # Panics
///
/// Panics if a seat is both free and booked, neither, or booked twice.
pub fn assert_seats_partitioned(db: &Database, flight_id: FlightId) {
    let map = db.seat_map(flight_id).expect("Failed to build seat map");
    let total = map.total();

    let active: Vec<u32> = db
        .bookings_for_flight(flight_id)
        .expect("Failed to list bookings")
        .into_iter()
        .filter(|b| b.is_active())
        .map(|b| b.seat_number)
        .collect();
    let booked: BTreeSet<u32> = active.iter().copied().collect();
    assert_eq!(booked.len(), active.len(), "flight {flight_id} has a seat booked twice");

    let free: BTreeSet<u32> = match db.available_seats(flight_id) {
        Ok(seats) => seats.into_iter().collect(),
        Err(CoreError::Conflict { .. }) => BTreeSet::new(),
        Err(err) => panic!("Failed to list seats of flight {flight_id}: {err}"),
    };
    assert!(free.is_disjoint(&booked), "flight {flight_id} seat both free and booked");
    assert_eq!(free.len() + booked.len(), total, "flight {flight_id} lost a seat");
    assert_eq!(free.len(), map.available_count());

    for (index, state) in map.rows.iter().flatten().enumerate() {
        let seat = u32::try_from(index + 1).expect("Seat number overflow");
        assert_eq!(*state == SeatState::Booked, booked.contains(&seat));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{scenarios, with_temp_db};
    use crate::generators::{operation_sequence_strategy, PropTestConfig};
    use aerodesk_core::{BookingStatus, FlightStatus};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn workloads_stay_consistent(ops in operation_sequence_strategy(1, 60)) {
            let mut harness = IntegrationHarness::new();
            harness.apply_all(&ops);
            prop_assert_eq!(harness.applied_count() + harness.rejected_count(), ops.len());
        }

        #[test]
        fn workloads_survive_reload(ops in operation_sequence_strategy(1, 40)) {
            let mut harness = IntegrationHarness::file();
            harness.apply_all(&ops);
            let before = harness.db.tables().unwrap();

            harness.db.reopen();
            prop_assert_eq!(harness.db.tables().unwrap(), before);
            harness.assert_consistent();
        }

        #[test]
        fn deleting_a_flight_removes_its_bookings(ops in operation_sequence_strategy(10, 60)) {
            let mut harness = IntegrationHarness::new();
            harness.apply_all(&ops);

            for flight in harness.db.flights().unwrap() {
                let expected = harness.db.bookings_for_flight(flight.id).unwrap().len();
                let report = harness.db.delete(&flight.id.into()).unwrap();
                prop_assert_eq!(report.cascaded_bookings.len(), expected);
                prop_assert!(harness
                    .db
                    .bookings()
                    .unwrap()
                    .iter()
                    .all(|b| b.flight_id != flight.id));
                harness.assert_consistent();
            }
        }
    }

    #[test]
    fn aircraft_in_use_cannot_be_deleted() {
        with_temp_db(|db| {
            let flight = scenarios::dublin_paris(db);
            let a320 = AircraftId::new("A320").unwrap();

            let err = db.delete(&a320.clone().into()).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Cannot delete aircraft A320. It is used in 1 flight(s)."
            );

            db.delete(&flight.into()).unwrap();
            db.delete(&a320.into()).unwrap();
            assert!(db.all_aircraft().unwrap().is_empty());
        });
    }

    #[test]
    fn cancelled_seat_can_be_rebooked() {
        with_temp_db(|db| {
            let flight = scenarios::dublin_paris(db);
            let ada = scenarios::passenger(db, "Ada", "Byrne");
            let brian = scenarios::passenger(db, "Brian", "Walsh");

            let first = db.book_seat(flight, ada, "2B").unwrap();
            assert!(db.book_seat(flight, brian, "2B").is_err());
            db.cancel(&first.id.into()).unwrap();

            let second = db.book_seat(flight, brian, "2B").unwrap();
            assert_eq!(second.seat_number, 5);
            assert_eq!(db.booking(first.id).unwrap().status, BookingStatus::Cancelled);
            assert_seats_partitioned(db, flight);
        });
    }

    #[test]
    fn full_flight_rejects_bookings() {
        with_temp_db(|db| {
            let tiny = scenarios::aircraft(db, "T1", 1, 2);
            let flight = scenarios::flight(db, &tiny, "Dublin", "Rome", scenarios::christmas(), 60.0);
            let ada = scenarios::passenger(db, "Ada", "Byrne");

            db.book_seat(flight, ada, "1A").unwrap();
            db.book_seat(flight, ada, "1B").unwrap();

            let err = db.available_seats(flight).unwrap_err();
            assert_eq!(err.to_string(), format!("Flight {flight} is fully booked."));
            assert_seats_partitioned(db, flight);
        });
    }

    #[test]
    fn cancelled_flight_is_hidden_from_search() {
        with_temp_db(|db| {
            let flight = scenarios::dublin_paris(db);
            let date = scenarios::christmas();
            assert_eq!(db.search(" dublin ", "PARIS", date).unwrap().len(), 1);

            db.cancel(&flight.into()).unwrap();
            assert_eq!(db.flight(flight).unwrap().status, FlightStatus::Cancelled);
            assert!(db.search("Dublin", "Paris", date).unwrap().is_empty());
        });
    }
}
