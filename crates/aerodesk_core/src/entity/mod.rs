//! Entity types and the record store.

mod id;
mod record;
mod store;

pub use id::{AircraftId, BookingId, FlightId, PassengerId, RecordKey};
pub use record::{
    date_time_column, Aircraft, Booking, Flight, NewAircraft, NewBooking, NewEntry, NewFlight,
    NewPassenger, Passenger, Record,
};
pub use store::{RecordHandle, RecordStore, Stored, Table};
