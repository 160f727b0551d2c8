//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common airline scenarios.

use aerodesk_core::persistence::encode_rows;
use aerodesk_core::{Config, CoreResult, Database, EntityKind, TableGateway, Tables};
use aerodesk_storage::InMemoryBackend;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test database with automatic cleanup.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// Data directory, if file-based.
    path: Option<PathBuf>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestDatabase {
    /// Creates a new in-memory test database.
    pub fn memory() -> Self {
        Self {
            db: Database::open_in_memory().expect("Failed to open in-memory database"),
            path: None,
            _temp_dir: None,
        }
    }

    /// Creates a new database over a temporary data directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("airline");
        let db = Database::open(&path).expect("Failed to open file database");

        Self {
            db,
            path: Some(path),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Creates an in-memory database whose tables start with `tables`.
    ///
    /// The rows go through the table encoding, so this also exercises loading.
    pub fn from_tables(tables: &Tables, config: Config) -> CoreResult<Self> {
        let backend = |bytes: Vec<u8>| Box::new(InMemoryBackend::with_data(bytes));
        let gateway = TableGateway::from_backends(
            backend(encode_rows(EntityKind::Flight, &tables.flights)?),
            backend(encode_rows(EntityKind::Passenger, &tables.passengers)?),
            backend(encode_rows(EntityKind::Booking, &tables.bookings)?),
            backend(encode_rows(EntityKind::Aircraft, &tables.aircraft)?),
        );

        Ok(Self {
            db: Database::open_with_gateway(config, Box::new(gateway))?,
            path: None,
            _temp_dir: None,
        })
    }

    /// Returns the data directory if file-based, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Saves, closes and reopens a file-based database.
    ///
    /// # Panics
    ///
    /// Panics on an in-memory database.
    pub fn reopen(&mut self) {
        let path = self.path.clone().expect("Only file databases can be reopened");
        self.db.save().expect("Failed to save");

        let old = std::mem::replace(
            &mut self.db,
            Database::open_in_memory().expect("Failed to open placeholder"),
        );
        old.close().expect("Failed to close");
        drop(old);

        self.db = Database::open(&path).expect("Failed to reopen database");
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory database.
///
/// # Example
///
/// ```rust,ignore
/// use aerodesk_testkit::with_temp_db;
///
/// #[test]
/// fn my_test() {
///     with_temp_db(|db| {
///         let flight = scenarios::dublin_paris(db);
///         // ... test operations
///     });
/// }
/// ```
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::memory();
    f(&test_db.db)
}

/// Runs a test with a database over a temporary data directory.
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database, &Path) -> R,
{
    let test_db = TestDatabase::file();
    let path = test_db.path().expect("File database should have a path");
    f(&test_db.db, path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use aerodesk_core::{
        AircraftId, FlightId, NewAircraft, NewFlight, NewPassenger, PassengerId,
    };
    use chrono::NaiveDate;

    /// Adds an aircraft with the given geometry.
    pub fn aircraft(db: &Database, id: &str, rows: u32, seats_per_row: u32) -> AircraftId {
        let id = AircraftId::new(id).expect("Invalid aircraft id");
        db.add(
            NewAircraft {
                id: id.clone(),
                rows,
                seats_per_row,
            }
            .into(),
        )
        .expect("Failed to add aircraft");
        id
    }

    /// Adds a scheduled flight on `aircraft`.
    pub fn flight(
        db: &Database,
        aircraft: &AircraftId,
        from: &str,
        to: &str,
        date: NaiveDate,
        cost: f64,
    ) -> FlightId {
        let key = db
            .add(
                NewFlight {
                    aircraft_id: aircraft.clone(),
                    departure_city: from.into(),
                    arrival_city: to.into(),
                    date_time: date.and_hms_opt(14, 30, 0).expect("Invalid time"),
                    cost_per_seat: cost,
                }
                .into(),
            )
            .expect("Failed to add flight");
        FlightId(key.as_u64().expect("Numeric flight id"))
    }

    /// Adds a passenger named `first_name surname`.
    pub fn passenger(db: &Database, first_name: &str, surname: &str) -> PassengerId {
        let key = db
            .add(
                NewPassenger {
                    first_name: first_name.into(),
                    surname: surname.into(),
                    date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 15).expect("Invalid date"),
                    email: format!("{}@example.com", first_name.to_ascii_lowercase()),
                    phone: "0871234567".into(),
                    address: "1 Main St".into(),
                }
                .into(),
            )
            .expect("Failed to add passenger");
        PassengerId(key.as_u64().expect("Numeric passenger id"))
    }

    /// Christmas day 2025, the date most scenarios fly on.
    pub fn christmas() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 25).expect("Invalid date")
    }

    /// A 2x3 `A320` flying Dublin to Paris on Christmas day, with no bookings.
    pub fn dublin_paris(db: &Database) -> FlightId {
        let a320 = aircraft(db, "A320", 2, 3);
        flight(db, &a320, "Dublin", "Paris", christmas(), 120.0)
    }

    /// Creates a database with two aircraft, three flights, three passengers
    /// and four bookings, one of them cancelled.
    pub fn populated_database() -> TestDatabase {
        let test_db = TestDatabase::memory();
        let db = &test_db.db;

        let a320 = aircraft(db, "A320", 2, 3);
        let b737 = aircraft(db, "B737", 30, 6);
        let dub_par = flight(db, &a320, "Dublin", "Paris", christmas(), 120.0);
        let dub_lon = flight(db, &b737, "Dublin", "London", christmas(), 89.5);
        let _par_dub = flight(db, &b737, "Paris", "Dublin", christmas(), 150.0);

        let ada = passenger(db, "Ada", "Byrne");
        let brian = passenger(db, "Brian", "Walsh");
        let _cara = passenger(db, "Cara", "Nolan");

        db.book_seat(dub_par, ada, "1A").expect("Failed to book");
        db.book_seat(dub_par, brian, "2B").expect("Failed to book");
        db.book_seat(dub_lon, ada, "12F").expect("Failed to book");
        let cancelled = db.book_seat(dub_lon, brian, "1A").expect("Failed to book");
        db.cancel(&cancelled.id.into()).expect("Failed to cancel");

        test_db
    }
}
