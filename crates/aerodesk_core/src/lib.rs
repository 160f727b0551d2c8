//! # aerodesk Core
//!
//! Record store and booking engine for aerodesk.
//!
//! This crate provides:
//! - An indexed record store for flights, passengers, bookings and aircraft
//! - Seat inventory derived from aircraft geometry and active bookings
//! - A mutation engine enforcing keys, references and cascades
//! - Flat-file persistence with an exclusive data directory lock
//!
//! ```rust,ignore
//! use aerodesk_core::{Database, EntityKind};
//!
//! let db = Database::open_in_memory()?;
//! let outcome = db.cancel_entry(EntityKind::Booking, "10");
//! println!("{outcome}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
pub mod dir;
mod engine;
mod entity;
mod error;
pub mod index;
mod outcome;
pub mod persistence;
pub mod seat;
mod stats;
mod types;
pub mod verify;

pub use config::Config;
pub use database::Database;
pub use engine::{CancelOutcome, DeleteReport, MutationEngine};
pub use entity::{
    date_time_column, Aircraft, AircraftId, Booking, BookingId, Flight, FlightId, NewAircraft,
    NewBooking, NewEntry, NewFlight, NewPassenger, Passenger, PassengerId, Record, RecordHandle,
    RecordKey, RecordStore, Stored, Table,
};
pub use error::{CoreError, CoreResult, ErrorCategory};
pub use index::{IndexManager, Indexed};
pub use outcome::Outcome;
pub use persistence::{Gateway, TableGateway, Tables};
pub use seat::{
    seat_label_to_number, seat_number_to_label, SeatInventory, SeatMap, SeatState,
    MAX_SEATS_PER_ROW,
};
pub use stats::DatabaseStats;
pub use types::{BookingStatus, EntityKind, FlightStatus};
pub use verify::{Issue, VerifyReport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
