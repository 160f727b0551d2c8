//! CLI command implementations.

pub mod add;
pub mod book;
pub mod cancel;
pub mod delete;
pub mod init;
pub mod inspect;
pub mod list;
pub mod search;
pub mod seats;
pub mod verify;

use aerodesk_core::{Config, Database, Outcome};
use std::error::Error;
use std::path::Path;
use tracing::debug;

/// Opens an existing data directory.
pub(crate) fn open_existing(path: &Path) -> Result<Database, Box<dyn Error>> {
    if !path.is_dir() {
        return Err(format!("No data directory found at {}", path.display()).into());
    }
    debug!(path = %path.display(), "opening data directory");
    Ok(Database::open_with_config(
        path,
        Config::default().create_if_missing(false),
    )?)
}

/// Saves after a successful change and prints the outcome.
pub(crate) fn commit(db: &Database, outcome: Outcome) -> Result<(), Box<dyn Error>> {
    if !outcome.success {
        return Err(outcome.message.into());
    }
    db.save()?;
    debug!("saved changes");
    println!("{outcome}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use aerodesk_core::{
        AircraftId, BookingStatus, Database, EntityKind, FlightId, NewAircraft, NewEntry,
        NewFlight, NewPassenger, PassengerId,
    };
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn init_dir() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data");
        super::init::run(&path).unwrap();
        (dir, path)
    }

    fn seed(path: &std::path::Path) {
        super::add::run(
            path,
            NewEntry::Aircraft(NewAircraft {
                id: AircraftId::new("A320").unwrap(),
                rows: 2,
                seats_per_row: 3,
            }),
        )
        .unwrap();
        super::add::run(
            path,
            NewEntry::Flight(NewFlight {
                aircraft_id: AircraftId::new("A320").unwrap(),
                departure_city: "Dublin".into(),
                arrival_city: "Paris".into(),
                date_time: NaiveDate::from_ymd_opt(2025, 12, 25)
                    .unwrap()
                    .and_hms_opt(14, 30, 0)
                    .unwrap(),
                cost_per_seat: 120.0,
            }),
        )
        .unwrap();
        super::add::run(
            path,
            NewEntry::Passenger(NewPassenger {
                first_name: "Ada".into(),
                surname: "Byrne".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
                email: "ada@example.com".into(),
                phone: "0871234567".into(),
                address: "1 Main St".into(),
            }),
        )
        .unwrap();
    }

    #[test]
    fn init_refuses_existing_directory() {
        let (_dir, path) = init_dir();
        assert!(super::init::run(&path).is_err());
    }

    #[test]
    fn commands_require_existing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(super::inspect::run(&missing, "text").is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn changes_are_saved() {
        let (_dir, path) = init_dir();
        seed(&path);
        super::book::run(&path, FlightId(1), PassengerId(1), "2B").unwrap();
        super::cancel::run(&path, EntityKind::Booking, "1").unwrap();

        let db = Database::open(&path).unwrap();
        assert_eq!(db.flights().unwrap().len(), 1);
        let booking = db.booking(aerodesk_core::BookingId(1)).unwrap();
        assert_eq!(booking.seat_number, 5);
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[test]
    fn failed_change_is_an_error() {
        let (_dir, path) = init_dir();
        seed(&path);

        assert!(super::book::run(&path, FlightId(1), PassengerId(1), "9Z").is_err());
        assert!(super::cancel::run(&path, EntityKind::Passenger, "1").is_err());
        assert!(super::delete::run(&path, EntityKind::Aircraft, "A320").is_err());
        assert!(super::verify::run(&path, "text").is_ok());
    }

    #[test]
    fn delete_cascades_and_persists() {
        let (_dir, path) = init_dir();
        seed(&path);
        super::book::run(&path, FlightId(1), PassengerId(1), "1A").unwrap();
        super::delete::run(&path, EntityKind::Flight, "1").unwrap();

        let db = Database::open(&path).unwrap();
        assert!(db.flights().unwrap().is_empty());
        assert!(db.bookings().unwrap().is_empty());
        assert_eq!(db.passengers().unwrap().len(), 1);
    }
}
