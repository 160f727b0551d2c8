//! Primary key types.

use crate::error::{CoreError, CoreResult};
use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Creates an identifier from its raw value.
            #[inline]
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw value.
            #[inline]
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id! {
    /// Store-allocated flight identifier (`FlightID`).
    FlightId
}

numeric_id! {
    /// Store-allocated passenger identifier (`PassengerID`).
    PassengerId
}

numeric_id! {
    /// Store-allocated booking identifier (`BookingID`).
    BookingId
}

/// Caller-supplied aircraft identifier (`AircraftID`), e.g. `"A320"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AircraftId(String);

impl AircraftId {
    /// Creates an aircraft identifier.
    ///
    /// Surrounding whitespace is trimmed; an empty identifier is rejected.
    pub fn new(id: impl AsRef<str>) -> CoreResult<Self> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("AircraftID must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AircraftId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AircraftId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AircraftId> for String {
    fn from(id: AircraftId) -> Self {
        id.0
    }
}

impl fmt::Display for AircraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A primary key together with the collection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum RecordKey {
    /// A flight key.
    Flight(FlightId),
    /// A passenger key.
    Passenger(PassengerId),
    /// A booking key.
    Booking(BookingId),
    /// An aircraft key.
    Aircraft(AircraftId),
}

impl RecordKey {
    /// Parses a textual id for the given collection.
    ///
    /// Numeric collections require a plain unsigned integer.
    pub fn parse(kind: EntityKind, text: &str) -> CoreResult<Self> {
        Ok(match kind {
            EntityKind::Flight => Self::Flight(FlightId(parse_numeric(text)?)),
            EntityKind::Passenger => Self::Passenger(PassengerId(parse_numeric(text)?)),
            EntityKind::Booking => Self::Booking(BookingId(parse_numeric(text)?)),
            EntityKind::Aircraft => Self::Aircraft(AircraftId::new(text)?),
        })
    }

    /// Returns the collection this key belongs to.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Flight(_) => EntityKind::Flight,
            Self::Passenger(_) => EntityKind::Passenger,
            Self::Booking(_) => EntityKind::Booking,
            Self::Aircraft(_) => EntityKind::Aircraft,
        }
    }

    /// Returns the numeric id, or None for an aircraft key.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Flight(id) => Some(id.0),
            Self::Passenger(id) => Some(id.0),
            Self::Booking(id) => Some(id.0),
            Self::Aircraft(_) => None,
        }
    }
}

fn parse_numeric(text: &str) -> CoreResult<u64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::validation("Invalid ID. Must be a number."));
    }
    trimmed
        .parse()
        .map_err(|_| CoreError::validation("Invalid ID. Must be a number."))
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flight(id) => write!(f, "{id}"),
            Self::Passenger(id) => write!(f, "{id}"),
            Self::Booking(id) => write!(f, "{id}"),
            Self::Aircraft(id) => write!(f, "{id}"),
        }
    }
}

impl From<FlightId> for RecordKey {
    fn from(id: FlightId) -> Self {
        Self::Flight(id)
    }
}

impl From<PassengerId> for RecordKey {
    fn from(id: PassengerId) -> Self {
        Self::Passenger(id)
    }
}

impl From<BookingId> for RecordKey {
    fn from(id: BookingId) -> Self {
        Self::Booking(id)
    }
}

impl From<AircraftId> for RecordKey {
    fn from(id: AircraftId) -> Self {
        Self::Aircraft(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ordering() {
        assert!(FlightId::new(1) < FlightId::new(2));
        assert_eq!(BookingId::from(7).as_u64(), 7);
    }

    #[test]
    fn aircraft_id_is_trimmed() {
        let id = AircraftId::new("  A320 ").unwrap();
        assert_eq!(id.as_str(), "A320");
        assert!(AircraftId::new("   ").is_err());
    }

    #[test]
    fn parse_numeric_key() {
        let key = RecordKey::parse(EntityKind::Booking, " 10 ").unwrap();
        assert_eq!(key, RecordKey::Booking(BookingId(10)));
        assert_eq!(key.kind(), EntityKind::Booking);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = RecordKey::parse(EntityKind::Flight, "F12").unwrap_err();
        assert_eq!(err.to_string(), "Invalid ID. Must be a number.");
        assert!(RecordKey::parse(EntityKind::Passenger, "-1").is_err());
        assert!(RecordKey::parse(EntityKind::Passenger, "").is_err());
    }

    #[test]
    fn parse_aircraft_key_keeps_text() {
        let key = RecordKey::parse(EntityKind::Aircraft, "B737").unwrap();
        assert_eq!(key.to_string(), "B737");
        assert_eq!(key.kind(), EntityKind::Aircraft);
        assert_eq!(key.as_u64(), None);
        assert_eq!(RecordKey::from(FlightId(4)).as_u64(), Some(4));
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&PassengerId(3)).unwrap(), "3");
        let id: AircraftId = serde_json::from_str("\"A320\"").unwrap();
        assert_eq!(id.as_str(), "A320");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"A320\"");
    }

    #[test]
    fn aircraft_id_deserializes_like_new() {
        let id: AircraftId = serde_json::from_str("\" A320 \"").unwrap();
        assert_eq!(id.as_str(), "A320");

        for text in ["\"\"", "\"   \""] {
            let err = serde_json::from_str::<AircraftId>(text).unwrap_err();
            assert!(err.to_string().contains("must not be empty"), "{text}: {err}");
        }
    }
}
