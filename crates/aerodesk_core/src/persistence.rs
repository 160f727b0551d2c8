//! Persistence gateway: loading and saving the four tables.
//!
//! Each table is stored as JSON Lines in its own [`StorageBackend`]: one
//! object per line, keyed by column name. Blank lines are ignored on read.

use crate::dir::DataDir;
use crate::entity::{Aircraft, Booking, Flight, Passenger, Record};
use crate::error::{CoreError, CoreResult};
use crate::types::EntityKind;
use aerodesk_storage::{FileBackend, InMemoryBackend, StorageBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The plain contents of all four tables, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    /// Flight rows.
    pub flights: Vec<Flight>,
    /// Passenger rows.
    pub passengers: Vec<Passenger>,
    /// Booking rows.
    pub bookings: Vec<Booking>,
    /// Aircraft rows.
    pub aircraft: Vec<Aircraft>,
}

impl Tables {
    /// Returns the total number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len() + self.passengers.len() + self.bookings.len() + self.aircraft.len()
    }

    /// Returns true if every table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads the tables at session start and writes them back on request.
pub trait Gateway: Send {
    /// Reads every table.
    ///
    /// # Errors
    ///
    /// Fails if a backend cannot be read or a row cannot be decoded.
    fn load(&self) -> CoreResult<Tables>;

    /// Replaces every table with `tables`.
    fn save(&mut self, tables: &Tables) -> CoreResult<()>;
}

/// A [`Gateway`] keeping one JSON Lines table per storage backend.
pub struct TableGateway {
    flights: Box<dyn StorageBackend>,
    passengers: Box<dyn StorageBackend>,
    bookings: Box<dyn StorageBackend>,
    aircraft: Box<dyn StorageBackend>,
}

impl TableGateway {
    /// Creates a gateway over four backends.
    pub fn from_backends(
        flights: Box<dyn StorageBackend>,
        passengers: Box<dyn StorageBackend>,
        bookings: Box<dyn StorageBackend>,
        aircraft: Box<dyn StorageBackend>,
    ) -> Self {
        Self {
            flights,
            passengers,
            bookings,
            aircraft,
        }
    }

    /// Creates a gateway whose tables live only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backends(
            Box::new(InMemoryBackend::new()),
            Box::new(InMemoryBackend::new()),
            Box::new(InMemoryBackend::new()),
            Box::new(InMemoryBackend::new()),
        )
    }

    /// Creates a gateway over the table files of a data directory.
    pub fn open_dir(dir: &DataDir) -> CoreResult<Self> {
        let open = |kind: EntityKind| -> CoreResult<Box<dyn StorageBackend>> {
            Ok(Box::new(FileBackend::open(&dir.table_path(kind))?))
        };
        Ok(Self::from_backends(
            open(EntityKind::Flight)?,
            open(EntityKind::Passenger)?,
            open(EntityKind::Booking)?,
            open(EntityKind::Aircraft)?,
        ))
    }

    fn read<T: Record>(&self) -> CoreResult<Vec<T>> {
        let bytes = self.backend(T::KIND).read_all()?;
        let rows = decode_rows(T::KIND, &bytes)?;
        tracing::debug!(table = %T::KIND, rows = rows.len(), "loaded table");
        Ok(rows)
    }

    fn write<T: Record>(&mut self, rows: &[T]) -> CoreResult<()> {
        let bytes = encode_rows(T::KIND, rows)?;
        let backend = self.backend_mut(T::KIND);
        backend.replace(&bytes)?;
        backend.sync()?;
        tracing::debug!(table = %T::KIND, rows = rows.len(), bytes = bytes.len(), "saved table");
        Ok(())
    }

    fn backend(&self, kind: EntityKind) -> &dyn StorageBackend {
        match kind {
            EntityKind::Flight => self.flights.as_ref(),
            EntityKind::Passenger => self.passengers.as_ref(),
            EntityKind::Booking => self.bookings.as_ref(),
            EntityKind::Aircraft => self.aircraft.as_ref(),
        }
    }

    fn backend_mut(&mut self, kind: EntityKind) -> &mut dyn StorageBackend {
        match kind {
            EntityKind::Flight => self.flights.as_mut(),
            EntityKind::Passenger => self.passengers.as_mut(),
            EntityKind::Booking => self.bookings.as_mut(),
            EntityKind::Aircraft => self.aircraft.as_mut(),
        }
    }
}

impl Gateway for TableGateway {
    fn load(&self) -> CoreResult<Tables> {
        Ok(Tables {
            aircraft: self.read()?,
            flights: self.read()?,
            passengers: self.read()?,
            bookings: self.read()?,
        })
    }

    fn save(&mut self, tables: &Tables) -> CoreResult<()> {
        self.write(&tables.aircraft)?;
        self.write(&tables.flights)?;
        self.write(&tables.passengers)?;
        self.write(&tables.bookings)?;
        Ok(())
    }
}

/// Encodes rows as JSON Lines.
pub fn encode_rows<T: Serialize>(table: EntityKind, rows: &[T]) -> CoreResult<Vec<u8>> {
    let mut out = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        serde_json::to_writer(&mut out, row).map_err(|err| CoreError::Codec {
            table,
            line: index + 1,
            message: err.to_string(),
        })?;
        out.push(b'\n');
    }
    Ok(out)
}

/// Decodes JSON Lines into rows, skipping blank lines.
///
/// # Errors
///
/// Returns `Codec` with the 1-based line number of the first bad row.
pub fn decode_rows<T: DeserializeOwned>(table: EntityKind, bytes: &[u8]) -> CoreResult<Vec<T>> {
    let mut rows = Vec::new();
    for (index, line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let row = serde_json::from_slice(line).map_err(|err| CoreError::Codec {
            table,
            line: index + 1,
            message: err.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AircraftId, BookingId, FlightId, PassengerId};
    use crate::types::BookingStatus;
    use tempfile::tempdir;

    fn aircraft(id: &str) -> Aircraft {
        Aircraft {
            id: AircraftId::new(id).unwrap(),
            rows: 2,
            seats_per_row: 3,
        }
    }

    fn booking(id: u64) -> Booking {
        Booking {
            id: BookingId(id),
            flight_id: FlightId(1),
            passenger_id: PassengerId(1),
            seat_number: 2,
            status: BookingStatus::Booked,
        }
    }

    #[test]
    fn empty_backends_load_empty_tables() {
        let gateway = TableGateway::in_memory();
        let tables = gateway.load().unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn save_then_load() {
        let mut gateway = TableGateway::in_memory();
        let tables = Tables {
            aircraft: vec![aircraft("A320"), aircraft("B737")],
            bookings: vec![booking(1), booking(2)],
            ..Tables::default()
        };

        gateway.save(&tables).unwrap();
        assert_eq!(gateway.load().unwrap(), tables);
    }

    #[test]
    fn encode_one_row_per_line() {
        let bytes = encode_rows(EntityKind::Aircraft, &[aircraft("A320")]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\"AircraftID\":\"A320\",\"Rows\":2,\"SeatsInARow\":3}\n"
        );
    }

    #[test]
    fn decode_skips_blank_lines() {
        let text = "\n{\"AircraftID\":\"A320\",\"Rows\":2,\"SeatsInARow\":3}\r\n\n";
        let rows: Vec<Aircraft> = decode_rows(EntityKind::Aircraft, text.as_bytes()).unwrap();
        assert_eq!(rows, vec![aircraft("A320")]);
    }

    #[test]
    fn decode_reports_line_of_bad_row() {
        let text = "{\"AircraftID\":\"A320\",\"Rows\":2,\"SeatsInARow\":3}\n{\"AircraftID\":\"B737\"}\n";
        let err = decode_rows::<Aircraft>(EntityKind::Aircraft, text.as_bytes()).unwrap_err();
        match err {
            CoreError::Codec { table, line, message } => {
                assert_eq!(table, EntityKind::Aircraft);
                assert_eq!(line, 2);
                assert!(message.contains("Rows"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_gateway_survives_reopen() {
        let temp = tempdir().unwrap();
        let tables = Tables {
            aircraft: vec![aircraft("A320")],
            ..Tables::default()
        };

        {
            let dir = DataDir::open(temp.path(), true).unwrap();
            let mut gateway = TableGateway::open_dir(&dir).unwrap();
            gateway.save(&tables).unwrap();
        }

        let dir = DataDir::open(temp.path(), true).unwrap();
        let gateway = TableGateway::open_dir(&dir).unwrap();
        assert_eq!(gateway.load().unwrap(), tables);
        assert!(temp.path().join("aircraft.jsonl").exists());
    }
}
