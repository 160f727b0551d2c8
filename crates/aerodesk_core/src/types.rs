//! Core type definitions for aerodesk.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four entity collections held by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Scheduled flights.
    Flight,
    /// Registered passengers.
    Passenger,
    /// Seat bookings.
    Booking,
    /// Aircraft seat geometries.
    Aircraft,
}

impl EntityKind {
    /// All kinds, in load/save order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Aircraft,
        EntityKind::Flight,
        EntityKind::Passenger,
        EntityKind::Booking,
    ];

    /// Returns the lowercase singular name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flight => "flight",
            Self::Passenger => "passenger",
            Self::Booking => "booking",
            Self::Aircraft => "aircraft",
        }
    }

    /// Returns the primary key column name used in table files.
    #[must_use]
    pub const fn key_column(self) -> &'static str {
        match self {
            Self::Flight => "FlightID",
            Self::Passenger => "PassengerID",
            Self::Booking => "BookingID",
            Self::Aircraft => "AircraftID",
        }
    }

    /// Returns the table file name inside a data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Flight => "flights.jsonl",
            Self::Passenger => "passengers.jsonl",
            Self::Booking => "bookings.jsonl",
            Self::Aircraft => "aircraft.jsonl",
        }
    }

    /// Returns true if records of this kind support a soft cancel.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Flight | Self::Booking)
    }

    /// Returns true if the primary key is allocated by the store.
    #[must_use]
    pub const fn has_numeric_key(self) -> bool {
        !matches!(self, Self::Aircraft)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flight" | "flights" => Ok(Self::Flight),
            "passenger" | "passengers" => Ok(Self::Passenger),
            "booking" | "bookings" => Ok(Self::Booking),
            "aircraft" | "aircrafts" => Ok(Self::Aircraft),
            other => Err(CoreError::validation(format!("Invalid category: {other}"))),
        }
    }
}

/// Lifecycle state of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    /// The flight is open for booking.
    Scheduled,
    /// The flight was cancelled; it is kept for history.
    Cancelled,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => f.write_str("Scheduled"),
            Self::Cancelled => f.write_str("Cancelled"),
        }
    }
}

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// The booking holds its seat.
    Booked,
    /// The booking was cancelled and no longer holds its seat.
    Cancelled,
}

impl BookingStatus {
    /// Returns true if a booking in this state occupies its seat.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Booked)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked => f.write_str("Booked"),
            Self::Cancelled => f.write_str("Cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_accepts_plural_and_case() {
        assert_eq!("Flights".parse::<EntityKind>().unwrap(), EntityKind::Flight);
        assert_eq!(" booking ".parse::<EntityKind>().unwrap(), EntityKind::Booking);
        assert_eq!("AIRCRAFT".parse::<EntityKind>().unwrap(), EntityKind::Aircraft);
        assert!("crew".parse::<EntityKind>().is_err());
    }

    #[test]
    fn only_flights_and_bookings_cancel() {
        assert!(EntityKind::Flight.is_cancellable());
        assert!(EntityKind::Booking.is_cancellable());
        assert!(!EntityKind::Passenger.is_cancellable());
        assert!(!EntityKind::Aircraft.is_cancellable());
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", EntityKind::Passenger), "passenger");
        assert_eq!(EntityKind::Booking.key_column(), "BookingID");
    }

    #[test]
    fn status_serializes_as_column_value() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Cancelled).unwrap(),
            "\"Cancelled\""
        );
        assert_eq!(
            serde_json::from_str::<FlightStatus>("\"Scheduled\"").unwrap(),
            FlightStatus::Scheduled
        );
    }
}
