//! Database facade: one session over a data directory.

use crate::config::Config;
use crate::dir::DataDir;
use crate::engine::{CancelOutcome, DeleteReport, MutationEngine};
use crate::entity::{
    Aircraft, AircraftId, Booking, BookingId, Flight, FlightId, NewEntry, Passenger, PassengerId,
    RecordKey,
};
use crate::error::{CoreError, CoreResult};
use crate::outcome::Outcome;
use crate::persistence::{Gateway, TableGateway, Tables};
use crate::seat::SeatMap;
use crate::stats::DatabaseStats;
use crate::types::EntityKind;
use crate::verify::{verify, VerifyReport};
use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use tracing::{info, warn};

/// The main database handle.
///
/// `Database` is the entry point for working with the airline tables.
/// It owns:
/// - The data directory lock (none for in-memory sessions)
/// - The persistence gateway used for load and save
/// - The mutation engine, holding the record store and its indexes
///
/// Tables are read once when the session opens and written back only on
/// [`Database::save`], or on [`Database::close`] when
/// [`Config::save_on_close`] is set.
///
/// # Example
///
/// ```rust,ignore
/// use aerodesk_core::Database;
/// use std::path::Path;
///
/// let db = Database::open(Path::new("airline"))?;
/// let booking = db.book_seat(FlightId(1), PassengerId(4), "2B")?;
/// db.save()?;
/// db.close()?;
/// ```
pub struct Database {
    /// Configuration.
    config: Config,
    /// Data directory (holds the lock). None for in-memory sessions.
    dir: Option<DataDir>,
    /// Table loader and writer.
    gateway: Mutex<Box<dyn Gateway>>,
    /// Record store and indexes.
    engine: RwLock<MutationEngine>,
    /// Whether the session is open.
    is_open: RwLock<bool>,
}

impl Database {
    /// Opens a data directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Another session holds the directory (`DatabaseLocked`)
    /// - A table row cannot be decoded (`Codec`)
    /// - A table repeats a primary key (`InvalidFormat`)
    /// - I/O errors occur
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a data directory with custom configuration.
    ///
    /// ```rust,ignore
    /// let config = Config::default().strict_load(true).save_on_close(true);
    /// let db = Database::open_with_config(Path::new("airline"), config)?;
    /// ```
    pub fn open_with_config(path: &Path, config: Config) -> CoreResult<Self> {
        let dir = DataDir::open(path, config.create_if_missing)?;

        if config.error_if_exists && !dir.is_new() {
            return Err(CoreError::invalid_format(
                "data directory already exists and error_if_exists is true",
            ));
        }

        let gateway = TableGateway::open_dir(&dir)?;
        Self::assemble(config, Some(dir), Box::new(gateway))
    }

    /// Opens a session over any gateway.
    ///
    /// This is a lower-level constructor; prefer [`Database::open`].
    pub fn open_with_gateway(config: Config, gateway: Box<dyn Gateway>) -> CoreResult<Self> {
        Self::assemble(config, None, gateway)
    }

    /// Opens an empty in-memory session for testing.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open_with_gateway(Config::default(), Box::new(TableGateway::in_memory()))
    }

    fn assemble(config: Config, dir: Option<DataDir>, gateway: Box<dyn Gateway>) -> CoreResult<Self> {
        let tables = gateway.load()?;
        let engine = MutationEngine::from_tables(tables)?;
        Self::check_loaded(&engine, &config)?;

        let stats = DatabaseStats::collect(engine.store());
        info!(
            path = ?dir.as_ref().map(DataDir::path),
            aircraft = stats.aircraft,
            flights = stats.flights,
            passengers = stats.passengers,
            bookings = stats.bookings,
            "opened database"
        );

        Ok(Self {
            config,
            dir,
            gateway: Mutex::new(gateway),
            engine: RwLock::new(engine),
            is_open: RwLock::new(true),
        })
    }

    /// Applies the load policy to a freshly loaded dataset.
    fn check_loaded(engine: &MutationEngine, config: &Config) -> CoreResult<()> {
        let report = verify(engine.store(), engine.indexes());
        for issue in &report.issues {
            if !issue.is_data_issue() || config.strict_load {
                return Err(CoreError::invalid_format(issue.to_string()));
            }
            warn!(%issue, "loaded tables are inconsistent");
        }
        Ok(())
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Writes every table back through the gateway.
    pub fn save(&self) -> CoreResult<()> {
        self.ensure_open()?;
        self.save_tables()
    }

    fn save_tables(&self) -> CoreResult<()> {
        let tables = self.engine.read().snapshot();
        self.gateway.lock().save(&tables)?;
        info!(rows = tables.len(), "saved database");
        Ok(())
    }

    /// Closes the session.
    ///
    /// Later calls fail with `DatabaseClosed`. Closing twice is a no-op.
    pub fn close(&self) -> CoreResult<()> {
        let mut is_open = self.is_open.write();
        if !*is_open {
            return Ok(());
        }

        if self.config.save_on_close {
            self.save_tables()?;
        }

        *is_open = false;
        info!("closed database");
        Ok(())
    }

    /// Checks if the session is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.is_open.read()
    }

    /// Ensures the session is open.
    fn ensure_open(&self) -> CoreResult<()> {
        if *self.is_open.read() {
            Ok(())
        } else {
            Err(CoreError::DatabaseClosed)
        }
    }

    /// Returns session configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the data directory, if the session has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(DataDir::path)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Adds a record and returns its key.
    pub fn add(&self, entry: NewEntry) -> CoreResult<RecordKey> {
        self.ensure_open()?;
        self.engine.write().add(entry)
    }

    /// Cancels a flight or booking.
    pub fn cancel(&self, key: &RecordKey) -> CoreResult<CancelOutcome> {
        self.ensure_open()?;
        self.engine.write().cancel(key)
    }

    /// Deletes a record and the bookings that depend on it.
    pub fn delete(&self, key: &RecordKey) -> CoreResult<DeleteReport> {
        self.ensure_open()?;
        self.engine.write().delete(key)
    }

    /// Books the seat with the given label, e.g. `"12F"`.
    pub fn book_seat(
        &self,
        flight_id: FlightId,
        passenger_id: PassengerId,
        seat_label: &str,
    ) -> CoreResult<Booking> {
        self.ensure_open()?;
        self.engine
            .write()
            .book_seat(flight_id, passenger_id, seat_label)
    }

    // ========================================================================
    // Boundary operations
    // ========================================================================

    /// Adds a record, reporting the assigned key.
    pub fn add_entry(&self, entry: NewEntry) -> Outcome {
        let kind = entry.kind();
        Outcome::from_result(self.add(entry).map(|key| {
            format!(
                "Added new {kind} with {} = {key}",
                kind.key_column()
            )
        }))
    }

    /// Cancels the record with textual id `id`.
    ///
    /// Passengers and aircraft are rejected before the id is looked at.
    pub fn cancel_entry(&self, kind: EntityKind, id: &str) -> Outcome {
        Outcome::from_result(self.cancel_text(kind, id))
    }

    fn cancel_text(&self, kind: EntityKind, id: &str) -> CoreResult<String> {
        if !kind.is_cancellable() {
            return Err(CoreError::validation(format!(
                "{} cannot be cancelled. Use delete instead.",
                plural_title(kind)
            )));
        }
        let key = RecordKey::parse(kind, id)?;
        Ok(match self.cancel(&key)? {
            CancelOutcome::Cancelled => format!("{} {key} has been cancelled.", title(kind)),
            CancelOutcome::AlreadyCancelled => {
                format!("{} {key} was already cancelled.", title(kind))
            }
        })
    }

    /// Deletes the record with textual id `id`.
    pub fn delete_entry(&self, kind: EntityKind, id: &str) -> Outcome {
        Outcome::from_result(RecordKey::parse(kind, id).and_then(|key| {
            let report = self.delete(&key)?;
            let mut message = format!("Deleted {kind} {key} successfully.");
            if !report.cascaded_bookings.is_empty() {
                message.push_str(&format!(
                    " {} booking(s) removed.",
                    report.cascaded_bookings.len()
                ));
            }
            Ok(message)
        }))
    }

    /// Books a seat, reporting the booking details.
    pub fn book_seat_entry(
        &self,
        flight_id: FlightId,
        passenger_id: PassengerId,
        seat_label: &str,
    ) -> Outcome {
        Outcome::from_result(self.book_seat_text(flight_id, passenger_id, seat_label))
    }

    /// Everything the message needs is read before the booking is stored,
    /// so a stored booking always reports success.
    fn book_seat_text(
        &self,
        flight_id: FlightId,
        passenger_id: PassengerId,
        seat_label: &str,
    ) -> CoreResult<String> {
        self.ensure_open()?;
        let mut engine = self.engine.write();

        let flight: &Flight = engine.get(&flight_id)?;
        let route = format!("{} to {}", flight.departure_city, flight.arrival_city);
        let date_time = flight
            .date_time
            .format(crate::entity::date_time_column::FORMAT)
            .to_string();
        let passenger = engine
            .get::<Passenger>(&passenger_id)
            .map(Passenger::full_name)
            .unwrap_or_default();

        let booking = engine.book_seat(flight_id, passenger_id, seat_label)?;
        let label = seat_label.trim().to_ascii_uppercase();

        Ok(format!(
            "Booking successful!\n\
             Booking ID: {}\n\
             Passenger: {passenger}\n\
             Flight: {route}\n\
             Date/Time: {date_time}\n\
             Seat: {label} (Seat Number: {})\n\
             Status: {}",
            booking.id, booking.seat_number, booking.status,
        ))
    }

    // ========================================================================
    // Reads
    // ========================================================================

    fn read<R>(&self, f: impl FnOnce(&MutationEngine) -> R) -> CoreResult<R> {
        self.ensure_open()?;
        Ok(f(&*self.engine.read()))
    }

    /// Returns the flight with `id`.
    pub fn flight(&self, id: FlightId) -> CoreResult<Flight> {
        self.read(|engine| engine.get::<Flight>(&id).cloned())?
    }

    /// Returns the passenger with `id`.
    pub fn passenger(&self, id: PassengerId) -> CoreResult<Passenger> {
        self.read(|engine| engine.get::<Passenger>(&id).cloned())?
    }

    /// Returns the booking with `id`.
    pub fn booking(&self, id: BookingId) -> CoreResult<Booking> {
        self.read(|engine| engine.get::<Booking>(&id).cloned())?
    }

    /// Returns the aircraft with `id`.
    pub fn aircraft(&self, id: &AircraftId) -> CoreResult<Aircraft> {
        self.read(|engine| engine.get::<Aircraft>(id).cloned())?
    }

    /// Returns every flight in table order.
    pub fn flights(&self) -> CoreResult<Vec<Flight>> {
        self.read(|engine| engine.store().flights().rows().to_vec())
    }

    /// Returns every passenger in table order.
    pub fn passengers(&self) -> CoreResult<Vec<Passenger>> {
        self.read(|engine| engine.store().passengers().rows().to_vec())
    }

    /// Returns every booking in table order.
    pub fn bookings(&self) -> CoreResult<Vec<Booking>> {
        self.read(|engine| engine.store().bookings().rows().to_vec())
    }

    /// Returns every aircraft in table order.
    pub fn all_aircraft(&self) -> CoreResult<Vec<Aircraft>> {
        self.read(|engine| engine.store().aircraft().rows().to_vec())
    }

    /// Returns every booking on a flight, cancelled ones included.
    pub fn bookings_for_flight(&self, flight_id: FlightId) -> CoreResult<Vec<Booking>> {
        self.read(|engine| {
            engine
                .bookings_for_flight(flight_id)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Finds scheduled flights between two cities on a date.
    pub fn search(
        &self,
        departure_city: &str,
        arrival_city: &str,
        date: NaiveDate,
    ) -> CoreResult<Vec<Flight>> {
        self.read(|engine| {
            engine
                .search(departure_city, arrival_city, date)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Returns the free seats of a flight in ascending order.
    ///
    /// Fails with `Conflict` when the flight is fully booked.
    pub fn available_seats(&self, flight_id: FlightId) -> CoreResult<Vec<u32>> {
        self.read(|engine| engine.seats().available_seats(flight_id))?
    }

    /// Returns the seat map of a flight.
    pub fn seat_map(&self, flight_id: FlightId) -> CoreResult<SeatMap> {
        self.read(|engine| engine.seats().seat_map(flight_id))?
    }

    /// Returns flights by cost per seat, most expensive first.
    pub fn flights_by_price(&self) -> CoreResult<Vec<Flight>> {
        self.read(|engine| engine.flights_by_price().into_iter().cloned().collect())
    }

    /// Returns bookings by ascending id.
    pub fn bookings_by_id(&self) -> CoreResult<Vec<Booking>> {
        self.read(|engine| engine.bookings_by_id().into_iter().cloned().collect())
    }

    /// Returns a copy of every table.
    pub fn tables(&self) -> CoreResult<Tables> {
        self.read(MutationEngine::snapshot)
    }

    /// Checks the store and its indexes for consistency.
    pub fn verify(&self) -> CoreResult<VerifyReport> {
        self.read(|engine| verify(engine.store(), engine.indexes()))
    }

    /// Returns record counts.
    pub fn stats(&self) -> CoreResult<DatabaseStats> {
        self.read(|engine| DatabaseStats::collect(engine.store()))
    }
}

fn title(kind: EntityKind) -> String {
    let name = kind.name();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn plural_title(kind: EntityKind) -> String {
    match kind {
        EntityKind::Aircraft => title(kind),
        _ => title(kind) + "s",
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path())
            .field("engine", &*self.engine.read())
            .field("is_open", &self.is_open())
            .finish_non_exhaustive()
    }
}
