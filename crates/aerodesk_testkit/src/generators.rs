//! Property-based test generators using proptest.
//!
//! Provides strategies for records, seat geometry and sequences of
//! operations against a database.

use aerodesk_core::{EntityKind, NewPassenger, MAX_SEATS_PER_ROW};
use chrono::NaiveDate;
use proptest::prelude::*;

/// Cities flights are drawn between.
pub const CITIES: &[&str] = &["Dublin", "Paris", "London", "Madrid", "Berlin", "Rome"];

/// Strategy for generating aircraft ids.
pub fn aircraft_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Z0-9]{1,5}").expect("Invalid regex")
}

/// Strategy for generating valid seat geometry as `(rows, seats_per_row)`.
pub fn geometry_strategy(max_rows: u32) -> impl Strategy<Value = (u32, u32)> {
    (1..=max_rows, 1..=MAX_SEATS_PER_ROW)
}

/// Strategy for generating a geometry together with a seat number on it.
pub fn seat_strategy(max_rows: u32) -> impl Strategy<Value = (u32, u32, u32)> {
    geometry_strategy(max_rows).prop_flat_map(|(rows, seats_per_row)| {
        (Just(rows), Just(seats_per_row), 1..=rows * seats_per_row)
    })
}

/// Strategy for generating city names, including badly cased ones.
pub fn city_strategy() -> impl Strategy<Value = String> {
    (prop::sample::select(CITIES), any::<bool>()).prop_map(|(city, shout)| {
        if shout {
            city.to_ascii_uppercase()
        } else {
            (*city).to_string()
        }
    })
}

/// Strategy for generating new passengers.
pub fn new_passenger_strategy() -> impl Strategy<Value = NewPassenger> {
    (
        prop::string::string_regex("[A-Z][a-z]{1,9}").expect("Invalid regex"),
        prop::string::string_regex("[A-Z][a-z]{1,11}").expect("Invalid regex"),
        0u32..20_000,
        0u32..10_000_000,
    )
        .prop_map(|(first_name, surname, age_days, phone)| {
            let epoch = NaiveDate::from_ymd_opt(1950, 1, 1).expect("Invalid date");
            NewPassenger {
                email: format!(
                    "{}.{}@example.com",
                    first_name.to_ascii_lowercase(),
                    surname.to_ascii_lowercase()
                ),
                first_name,
                surname,
                date_of_birth: epoch + chrono::Days::new(u64::from(age_days)),
                phone: format!("087{phone:07}"),
                address: "1 Main St".into(),
            }
        })
}

/// One step of a generated workload.
///
/// Ids are drawn from a small range, so steps regularly name missing
/// or cancelled records and exercise the error paths.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Add an aircraft with the next free name.
    AddAircraft {
        /// Seat rows.
        rows: u32,
        /// Seats in each row.
        seats_per_row: u32,
    },
    /// Add a flight.
    AddFlight {
        /// Index into the aircraft added so far.
        aircraft: usize,
        /// Departure city.
        from: String,
        /// Arrival city.
        to: String,
        /// Days after 2025-01-01.
        day: u32,
        /// Cost per seat in cents.
        cost_cents: u32,
    },
    /// Add a passenger.
    AddPassenger(NewPassenger),
    /// Book a seat by number.
    Book {
        /// Flight id.
        flight: u64,
        /// Passenger id.
        passenger: u64,
        /// Seat number.
        seat: u32,
    },
    /// Cancel a flight or booking.
    Cancel {
        /// Flight or booking.
        kind: EntityKind,
        /// Record id.
        id: u64,
    },
    /// Delete a record. Aircraft are named by index.
    Delete {
        /// Collection.
        kind: EntityKind,
        /// Record id, or aircraft index.
        id: u64,
    },
}

fn cancellable_kind() -> impl Strategy<Value = EntityKind> {
    prop::sample::select(vec![EntityKind::Flight, EntityKind::Booking])
}

fn any_kind() -> impl Strategy<Value = EntityKind> {
    prop::sample::select(EntityKind::ALL.to_vec())
}

/// Strategy for generating one operation.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        1 => geometry_strategy(6).prop_map(|(rows, seats_per_row)| Operation::AddAircraft {
            rows,
            seats_per_row,
        }),
        2 => (0usize..4, city_strategy(), city_strategy(), 0u32..30, 1u32..100_000).prop_map(
            |(aircraft, from, to, day, cost_cents)| Operation::AddFlight {
                aircraft,
                from,
                to,
                day,
                cost_cents,
            }
        ),
        2 => new_passenger_strategy().prop_map(Operation::AddPassenger),
        6 => (1u64..8, 1u64..8, 0u32..40).prop_map(|(flight, passenger, seat)| Operation::Book {
            flight,
            passenger,
            seat,
        }),
        1 => (cancellable_kind(), 1u64..12).prop_map(|(kind, id)| Operation::Cancel { kind, id }),
        1 => (any_kind(), 0u64..12).prop_map(|(kind, id)| Operation::Delete { kind, id }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
