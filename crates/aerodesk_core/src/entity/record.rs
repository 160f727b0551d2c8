//! Entity records and the inputs used to create them.
//!
//! Field names on disk follow the table column names (`FlightID`,
//! `DepartureCity`, ...), so the flat files stay readable alongside the
//! spreadsheets they were originally exported from.

use crate::entity::id::{AircraftId, BookingId, FlightId, PassengerId, RecordKey};
use crate::index::IndexKey;
use crate::types::{BookingStatus, EntityKind, FlightStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A row type held by the record store.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Primary key type.
    type Key: IndexKey;

    /// Collection this record lives in.
    const KIND: EntityKind;

    /// Returns the primary key.
    fn key(&self) -> Self::Key;

    /// Returns the primary key tagged with its collection.
    fn record_key(&self) -> RecordKey {
        self.key().into()
    }
}

/// A scheduled (or cancelled) flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Primary key.
    #[serde(rename = "FlightID")]
    pub id: FlightId,
    /// City of departure.
    #[serde(rename = "DepartureCity")]
    pub departure_city: String,
    /// City of arrival.
    #[serde(rename = "ArrivalCity")]
    pub arrival_city: String,
    /// Local departure date and time.
    #[serde(rename = "DateTime", with = "date_time_column")]
    pub date_time: NaiveDateTime,
    /// Seat count, derived from the aircraft when the flight is added.
    #[serde(rename = "FlightCapacity")]
    pub capacity: u32,
    /// Price of one seat.
    #[serde(rename = "CostPerSeat")]
    pub cost_per_seat: f64,
    /// Aircraft operating the flight.
    #[serde(rename = "AeroplaneNumber")]
    pub aircraft_id: AircraftId,
    /// Lifecycle state.
    #[serde(rename = "Status")]
    pub status: FlightStatus,
}

impl Flight {
    /// Returns the departure date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date_time.date()
    }

    /// Returns true if the flight has not been cancelled.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.status == FlightStatus::Scheduled
    }
}

impl Record for Flight {
    type Key = FlightId;
    const KIND: EntityKind = EntityKind::Flight;

    fn key(&self) -> FlightId {
        self.id
    }
}

/// A registered passenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Primary key.
    #[serde(rename = "PassengerID")]
    pub id: PassengerId,
    /// Given name.
    #[serde(rename = "FirstName")]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "Surname")]
    pub surname: String,
    /// Date of birth.
    #[serde(rename = "DOB")]
    pub date_of_birth: NaiveDate,
    /// Contact email.
    #[serde(rename = "Email")]
    pub email: String,
    /// Contact phone number.
    #[serde(rename = "PhoneNumber")]
    pub phone: String,
    /// Postal address.
    #[serde(rename = "Address")]
    pub address: String,
}

impl Passenger {
    /// Returns "first-name surname".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

impl Record for Passenger {
    type Key = PassengerId;
    const KIND: EntityKind = EntityKind::Passenger;

    fn key(&self) -> PassengerId {
        self.id
    }
}

/// A seat booking of one passenger on one flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Primary key.
    #[serde(rename = "BookingID")]
    pub id: BookingId,
    /// Booked flight.
    #[serde(rename = "FlightID")]
    pub flight_id: FlightId,
    /// Travelling passenger.
    #[serde(rename = "PassengerID")]
    pub passenger_id: PassengerId,
    /// 1-based seat number within the aircraft.
    #[serde(rename = "SeatNumber")]
    pub seat_number: u32,
    /// Lifecycle state.
    #[serde(rename = "Status")]
    pub status: BookingStatus,
}

impl Booking {
    /// Returns true if the booking holds its seat.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl Record for Booking {
    type Key = BookingId;
    const KIND: EntityKind = EntityKind::Booking;

    fn key(&self) -> BookingId {
        self.id
    }
}

/// Seat geometry of one aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Primary key, chosen by the caller.
    #[serde(rename = "AircraftID")]
    pub id: AircraftId,
    /// Number of seat rows.
    #[serde(rename = "Rows")]
    pub rows: u32,
    /// Seats in each row.
    #[serde(rename = "SeatsInARow")]
    pub seats_per_row: u32,
}

impl Aircraft {
    /// Returns `rows × seats_per_row`.
    #[must_use]
    pub fn total_seats(&self) -> u32 {
        self.rows.saturating_mul(self.seats_per_row)
    }
}

impl Record for Aircraft {
    type Key = AircraftId;
    const KIND: EntityKind = EntityKind::Aircraft;

    fn key(&self) -> AircraftId {
        self.id.clone()
    }
}

/// Fields for a new flight. Capacity and status are filled in by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFlight {
    /// Aircraft operating the flight; must exist.
    pub aircraft_id: AircraftId,
    /// City of departure.
    pub departure_city: String,
    /// City of arrival.
    pub arrival_city: String,
    /// Local departure date and time.
    pub date_time: NaiveDateTime,
    /// Price of one seat.
    pub cost_per_seat: f64,
}

/// Fields for a new passenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassenger {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub surname: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

/// Fields for a new booking addressed by seat number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBooking {
    /// Flight to book; must exist and be scheduled.
    pub flight_id: FlightId,
    /// Passenger to book; must exist.
    pub passenger_id: PassengerId,
    /// Requested seat number; must be free.
    pub seat_number: u32,
}

/// Fields for a new aircraft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAircraft {
    /// Caller-chosen identifier; must be unused.
    pub id: AircraftId,
    /// Number of seat rows.
    pub rows: u32,
    /// Seats in each row.
    pub seats_per_row: u32,
}

/// The input of an add operation, one variant per collection.
#[derive(Debug, Clone, PartialEq)]
pub enum NewEntry {
    /// Add a flight.
    Flight(NewFlight),
    /// Add a passenger.
    Passenger(NewPassenger),
    /// Add a booking.
    Booking(NewBooking),
    /// Add an aircraft.
    Aircraft(NewAircraft),
}

impl NewEntry {
    /// Returns the collection the entry is added to.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Flight(_) => EntityKind::Flight,
            Self::Passenger(_) => EntityKind::Passenger,
            Self::Booking(_) => EntityKind::Booking,
            Self::Aircraft(_) => EntityKind::Aircraft,
        }
    }
}

macro_rules! new_entry_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for NewEntry {
                fn from(new: $ty) -> Self {
                    Self::$variant(new)
                }
            }
        )*
    };
}

new_entry_from! {
    Flight => NewFlight,
    Passenger => NewPassenger,
    Booking => NewBooking,
    Aircraft => NewAircraft,
}

/// `DateTime` column format: `YYYY-MM-DD HH:MM:SS`.
///
/// ISO 8601 with a `T` separator is accepted on read.
pub mod date_time_column {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Column format string.
    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Parses a `DateTime` column value.
    pub fn parse(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        let text = text.trim();
        NaiveDateTime::parse_from_str(text, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
    }

    /// Serializes a date-time in column format.
    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    /// Deserializes a date-time from column format.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }
}
