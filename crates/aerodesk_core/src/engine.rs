//! Mutation engine: add, cancel and delete with referential integrity.
//!
//! The engine exclusively owns the record store and the index manager.
//! Every operation validates everything it needs before the first write,
//! so a failed call leaves both untouched.

use crate::entity::{
    Aircraft, AircraftId, Booking, BookingId, Flight, FlightId, NewAircraft, NewBooking, NewEntry,
    NewFlight, NewPassenger, Passenger, PassengerId, Record, RecordHandle, RecordKey, RecordStore,
};
use crate::error::{CoreError, CoreResult};
use crate::index::{Indexed, IndexManager};
use crate::persistence::Tables;
use crate::seat::{seat_label_to_number, validate_geometry, SeatInventory};
use crate::types::{BookingStatus, EntityKind, FlightStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// What a delete removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// The record named by the caller.
    pub removed: RecordKey,
    /// Bookings removed along with it, in table order.
    pub cascaded_bookings: Vec<BookingId>,
}

/// Result of a cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The record moved to `Cancelled`.
    Cancelled,
    /// The record was already cancelled; nothing changed.
    AlreadyCancelled,
}

/// Next numeric key: `max(existing) + 1`, or 1 for an empty table.
fn next_key(current_max: Option<u64>) -> u64 {
    current_max.map_or(1, |max| max + 1)
}

/// Owns the record store and its indexes and applies every mutation.
#[derive(Debug)]
pub struct MutationEngine {
    store: RecordStore,
    indexes: IndexManager,
}

impl MutationEngine {
    /// Creates an engine over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RecordStore::new(),
            indexes: IndexManager::new(),
        }
    }

    /// Creates an engine over loaded tables.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if a table repeats a primary key.
    pub fn from_tables(tables: Tables) -> CoreResult<Self> {
        let store = RecordStore::from_tables(tables);
        let indexes = IndexManager::build(&store)?;
        Ok(Self { store, indexes })
    }

    /// Returns the record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Returns the index manager.
    #[must_use]
    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    /// Returns seat queries over the current state.
    #[must_use]
    pub fn seats(&self) -> SeatInventory<'_> {
        SeatInventory::new(&self.store, &self.indexes)
    }

    /// Looks up a record by primary key.
    pub fn get<T: Indexed>(&self, key: &T::Key) -> CoreResult<&T> {
        self.indexes.get(&self.store, key)
    }

    /// Returns every booking on a flight, cancelled ones included.
    #[must_use]
    pub fn bookings_for_flight(&self, flight_id: FlightId) -> Vec<&Booking> {
        self.indexes.bookings_for_flight(&self.store, flight_id)
    }

    /// Adds a record and returns its key.
    pub fn add(&mut self, entry: NewEntry) -> CoreResult<RecordKey> {
        Ok(match entry {
            NewEntry::Flight(new) => self.add_flight(new)?.into(),
            NewEntry::Passenger(new) => self.add_passenger(new)?.into(),
            NewEntry::Booking(new) => self.add_booking(new)?.into(),
            NewEntry::Aircraft(new) => self.add_aircraft(new)?.into(),
        })
    }

    /// Adds a flight operated by an existing aircraft.
    ///
    /// Capacity is taken from the aircraft geometry; status starts
    /// `Scheduled`.
    pub fn add_flight(&mut self, new: NewFlight) -> CoreResult<FlightId> {
        let aircraft: &Aircraft = self.get(&new.aircraft_id)?;
        let capacity = aircraft.total_seats();
        if !new.cost_per_seat.is_finite() || new.cost_per_seat <= 0.0 {
            return Err(CoreError::validation("Cost must be greater than 0"));
        }

        let id = FlightId(next_key(self.store.flights().max_key().map(FlightId::as_u64)));
        self.append(Flight {
            id,
            departure_city: new.departure_city,
            arrival_city: new.arrival_city,
            date_time: new.date_time,
            capacity,
            cost_per_seat: new.cost_per_seat,
            aircraft_id: new.aircraft_id,
            status: FlightStatus::Scheduled,
        })?;
        debug!(flight = %id, capacity, "added flight");
        Ok(id)
    }

    /// Adds a passenger.
    pub fn add_passenger(&mut self, new: NewPassenger) -> CoreResult<PassengerId> {
        let id = PassengerId(next_key(
            self.store.passengers().max_key().map(PassengerId::as_u64),
        ));
        self.append(Passenger {
            id,
            first_name: new.first_name,
            surname: new.surname,
            date_of_birth: new.date_of_birth,
            email: new.email,
            phone: new.phone,
            address: new.address,
        })?;
        debug!(passenger = %id, "added passenger");
        Ok(id)
    }

    /// Adds a booking for a numbered seat.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown flight, passenger or aircraft
    /// - `Conflict` if the flight is cancelled or full, or the seat is held
    /// - `Validation` if the seat number is outside the aircraft
    pub fn add_booking(&mut self, new: NewBooking) -> CoreResult<BookingId> {
        self.check_booking(&new)?;

        let id = BookingId(next_key(self.store.bookings().max_key().map(BookingId::as_u64)));
        self.append(Booking {
            id,
            flight_id: new.flight_id,
            passenger_id: new.passenger_id,
            seat_number: new.seat_number,
            status: BookingStatus::Booked,
        })?;
        debug!(booking = %id, flight = %new.flight_id, seat = new.seat_number, "added booking");
        Ok(id)
    }

    fn check_booking(&self, new: &NewBooking) -> CoreResult<()> {
        let seats = self.seats();
        let (flight, aircraft) = seats.resolve(new.flight_id)?;
        if !flight.is_scheduled() {
            return Err(CoreError::conflict(format!(
                "Flight {} has been cancelled.",
                flight.id
            )));
        }
        self.get::<Passenger>(&new.passenger_id)?;

        let total = aircraft.total_seats();
        if new.seat_number == 0 || new.seat_number > total {
            return Err(CoreError::validation(format!(
                "Seat number {} is out of range for flight {} (1-{total}).",
                new.seat_number, flight.id
            )));
        }

        let available = seats.available_seats(new.flight_id)?;
        if available.binary_search(&new.seat_number).is_err() {
            return Err(CoreError::conflict(format!(
                "Seat {} on flight {} is already booked.",
                new.seat_number, flight.id
            )));
        }
        Ok(())
    }

    /// Books a seat given by label, e.g. `"2B"`.
    ///
    /// Returns the stored booking.
    pub fn book_seat(
        &mut self,
        flight_id: FlightId,
        passenger_id: PassengerId,
        seat_label: &str,
    ) -> CoreResult<Booking> {
        let (_, aircraft) = self.seats().resolve(flight_id)?;
        let seat_number = seat_label_to_number(seat_label, aircraft.seats_per_row)?;

        let id = self.add_booking(NewBooking {
            flight_id,
            passenger_id,
            seat_number,
        })?;
        Ok(Booking {
            id,
            flight_id,
            passenger_id,
            seat_number,
            status: BookingStatus::Booked,
        })
    }

    /// Adds an aircraft under its caller-chosen id.
    pub fn add_aircraft(&mut self, new: NewAircraft) -> CoreResult<AircraftId> {
        validate_geometry(new.rows, new.seats_per_row)?;
        if self.indexes.contains::<Aircraft>(&new.id) {
            return Err(CoreError::conflict(format!(
                "Aircraft {} already exists.",
                new.id
            )));
        }

        let id = new.id.clone();
        self.append(Aircraft {
            id: new.id,
            rows: new.rows,
            seats_per_row: new.seats_per_row,
        })?;
        debug!(aircraft = %id, "added aircraft");
        Ok(id)
    }

    fn append<T: Indexed>(&mut self, record: T) -> CoreResult<RecordHandle> {
        let key = record.key();
        if self.indexes.contains::<T>(&key) {
            return Err(CoreError::conflict(format!(
                "{} {key} already exists.",
                T::KIND.key_column()
            )));
        }
        let handle = self.store.append(record);
        self.indexes.record_appended::<T>(&self.store, handle)?;
        Ok(handle)
    }

    /// Moves a flight or booking to `Cancelled`.
    ///
    /// Cancelling an already cancelled record succeeds without change.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for passengers and aircraft, which have no
    /// cancelled state, and `NotFound` for an unknown key.
    pub fn cancel(&mut self, key: &RecordKey) -> CoreResult<CancelOutcome> {
        let outcome = match key {
            RecordKey::Flight(id) => {
                let handle = self.require::<Flight>(id)?;
                self.store
                    .update::<Flight, _, _>(handle, |flight| {
                        if flight.is_scheduled() {
                            flight.status = FlightStatus::Cancelled;
                            CancelOutcome::Cancelled
                        } else {
                            CancelOutcome::AlreadyCancelled
                        }
                    })
                    .ok_or_else(|| CoreError::not_found(EntityKind::Flight, id))?
            }
            RecordKey::Booking(id) => {
                let handle = self.require::<Booking>(id)?;
                self.store
                    .update::<Booking, _, _>(handle, |booking| {
                        if booking.is_active() {
                            booking.status = BookingStatus::Cancelled;
                            CancelOutcome::Cancelled
                        } else {
                            CancelOutcome::AlreadyCancelled
                        }
                    })
                    .ok_or_else(|| CoreError::not_found(EntityKind::Booking, id))?
            }
            RecordKey::Passenger(_) => {
                return Err(CoreError::validation(
                    "Passengers cannot be cancelled. Use delete instead.",
                ))
            }
            RecordKey::Aircraft(_) => {
                return Err(CoreError::validation(
                    "Aircraft cannot be cancelled. Use delete instead.",
                ))
            }
        };
        debug!(kind = %key.kind(), key = %key, ?outcome, "cancelled");
        Ok(outcome)
    }

    fn require<T: Indexed>(&self, key: &T::Key) -> CoreResult<RecordHandle> {
        self.indexes
            .handle::<T>(key)
            .ok_or_else(|| CoreError::not_found(T::KIND, key))
    }

    /// Removes a record, cascading to the bookings that reference it.
    ///
    /// Every index is rebuilt afterwards.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown key and `Conflict` for an aircraft
    /// still operating a flight.
    pub fn delete(&mut self, key: &RecordKey) -> CoreResult<DeleteReport> {
        let cascaded = match key {
            RecordKey::Flight(id) => {
                self.require::<Flight>(id)?;
                let cascaded = self.remove_bookings(|booking| booking.flight_id == *id);
                self.store.remove_where::<Flight, _>(|flight| flight.id == *id);
                cascaded
            }
            RecordKey::Passenger(id) => {
                self.require::<Passenger>(id)?;
                let cascaded = self.remove_bookings(|booking| booking.passenger_id == *id);
                self.store
                    .remove_where::<Passenger, _>(|passenger| passenger.id == *id);
                cascaded
            }
            RecordKey::Booking(id) => {
                self.require::<Booking>(id)?;
                self.store.remove_where::<Booking, _>(|booking| booking.id == *id);
                Vec::new()
            }
            RecordKey::Aircraft(id) => {
                self.require::<Aircraft>(id)?;
                let users = self
                    .store
                    .flights()
                    .iter()
                    .filter(|flight| flight.aircraft_id == *id)
                    .count();
                if users > 0 {
                    return Err(CoreError::conflict(format!(
                        "Cannot delete aircraft {id}. It is used in {users} flight(s)."
                    )));
                }
                self.store.remove_where::<Aircraft, _>(|aircraft| aircraft.id == *id);
                Vec::new()
            }
        };

        self.indexes.rebuild(&self.store);
        debug!(
            kind = %key.kind(),
            key = %key,
            cascaded = cascaded.len(),
            "deleted"
        );
        Ok(DeleteReport {
            removed: key.clone(),
            cascaded_bookings: cascaded,
        })
    }

    fn remove_bookings<P>(&mut self, predicate: P) -> Vec<BookingId>
    where
        P: FnMut(&Booking) -> bool,
    {
        self.store
            .remove_where::<Booking, _>(predicate)
            .into_iter()
            .map(|booking| booking.id)
            .collect()
    }

    /// Finds scheduled flights between two cities on a date.
    ///
    /// City names match case-insensitively, ignoring surrounding spaces.
    #[must_use]
    pub fn search(&self, departure_city: &str, arrival_city: &str, date: NaiveDate) -> Vec<&Flight> {
        let from = departure_city.trim();
        let to = arrival_city.trim();
        self.store
            .flights()
            .iter()
            .filter(|flight| {
                flight.is_scheduled()
                    && flight.date() == date
                    && flight.departure_city.trim().eq_ignore_ascii_case(from)
                    && flight.arrival_city.trim().eq_ignore_ascii_case(to)
            })
            .collect()
    }

    /// Returns flights by cost per seat, most expensive first.
    ///
    /// Flights with equal cost keep table order.
    #[must_use]
    pub fn flights_by_price(&self) -> Vec<&Flight> {
        let mut flights: Vec<&Flight> = self.store.flights().iter().collect();
        flights.sort_by(|a, b| {
            b.cost_per_seat
                .partial_cmp(&a.cost_per_seat)
                .unwrap_or(Ordering::Equal)
        });
        flights
    }

    /// Returns bookings by ascending BookingID.
    #[must_use]
    pub fn bookings_by_id(&self) -> Vec<&Booking> {
        let mut bookings: Vec<&Booking> = self.store.bookings().iter().collect();
        bookings.sort_by_key(|booking| booking.id);
        bookings
    }

    /// Returns a copy of every table.
    #[must_use]
    pub fn snapshot(&self) -> Tables {
        self.store.snapshot()
    }
}

impl Default for MutationEngine {
    fn default() -> Self {
        Self::new()
    }
}
