//! Index manager: primary-key and flight→bookings access paths.

use crate::entity::{
    Aircraft, AircraftId, Booking, BookingId, Flight, FlightId, Passenger, PassengerId, Record,
    RecordHandle, RecordStore, Stored,
};
use crate::error::{CoreError, CoreResult};
use crate::index::hash::HashIndex;
use crate::index::traits::{Index, IndexSpec};
use crate::types::EntityKind;

/// Maps a record type to its primary index.
pub trait Indexed: Stored {
    /// Returns the primary index for this record type.
    fn primary(indexes: &IndexManager) -> &HashIndex<Self::Key>;

    /// Returns the primary index for this record type, mutably.
    fn primary_mut(indexes: &mut IndexManager) -> &mut HashIndex<Self::Key>;

    /// Registers one freshly appended record with every index covering it.
    fn on_append(indexes: &mut IndexManager, handle: RecordHandle, record: &Self) -> CoreResult<()> {
        Self::primary_mut(indexes).insert(record.key(), handle)
    }
}

impl Indexed for Flight {
    fn primary(indexes: &IndexManager) -> &HashIndex<FlightId> {
        &indexes.flights
    }

    fn primary_mut(indexes: &mut IndexManager) -> &mut HashIndex<FlightId> {
        &mut indexes.flights
    }
}

impl Indexed for Passenger {
    fn primary(indexes: &IndexManager) -> &HashIndex<PassengerId> {
        &indexes.passengers
    }

    fn primary_mut(indexes: &mut IndexManager) -> &mut HashIndex<PassengerId> {
        &mut indexes.passengers
    }
}

impl Indexed for Aircraft {
    fn primary(indexes: &IndexManager) -> &HashIndex<AircraftId> {
        &indexes.aircraft
    }

    fn primary_mut(indexes: &mut IndexManager) -> &mut HashIndex<AircraftId> {
        &mut indexes.aircraft
    }
}

impl Indexed for Booking {
    fn primary(indexes: &IndexManager) -> &HashIndex<BookingId> {
        &indexes.bookings
    }

    fn primary_mut(indexes: &mut IndexManager) -> &mut HashIndex<BookingId> {
        &mut indexes.bookings
    }

    fn on_append(indexes: &mut IndexManager, handle: RecordHandle, record: &Self) -> CoreResult<()> {
        indexes.bookings.insert(record.id, handle)?;
        indexes.flight_bookings.insert(record.flight_id, handle)
    }
}

/// Access paths over a [`RecordStore`].
///
/// The manager only stores record handles. Reads always resolve through
/// the store, so a status edit made in place is visible through every
/// index without touching it.
pub struct IndexManager {
    flights: HashIndex<FlightId>,
    passengers: HashIndex<PassengerId>,
    bookings: HashIndex<BookingId>,
    aircraft: HashIndex<AircraftId>,
    /// FlightID → bookings on that flight, in table order.
    flight_bookings: HashIndex<FlightId>,
}

impl IndexManager {
    /// Creates empty indexes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flights: HashIndex::new(IndexSpec::new(EntityKind::Flight, "flights_pk").unique()),
            passengers: HashIndex::new(
                IndexSpec::new(EntityKind::Passenger, "passengers_pk").unique(),
            ),
            bookings: HashIndex::new(IndexSpec::new(EntityKind::Booking, "bookings_pk").unique()),
            aircraft: HashIndex::new(IndexSpec::new(EntityKind::Aircraft, "aircraft_pk").unique()),
            flight_bookings: HashIndex::new(IndexSpec::new(
                EntityKind::Booking,
                "bookings_by_flight",
            )),
        }
    }

    /// Builds every index with one scan per table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if a table holds the same primary key twice.
    pub fn build(store: &RecordStore) -> CoreResult<Self> {
        let mut indexes = Self::new();
        indexes.load_table::<Aircraft>(store)?;
        indexes.load_table::<Flight>(store)?;
        indexes.load_table::<Passenger>(store)?;
        indexes.load_table::<Booking>(store)?;
        Ok(indexes)
    }

    fn load_table<T: Indexed>(&mut self, store: &RecordStore) -> CoreResult<()> {
        for (handle, record) in store.table::<T>().entries() {
            T::on_append(self, handle, record).map_err(|err| match err {
                CoreError::Conflict { message } => CoreError::invalid_format(message),
                other => other,
            })?;
        }
        Ok(())
    }

    /// Discards every index and rebuilds it from the store.
    ///
    /// Duplicate keys cannot reach the store through the mutation engine,
    /// so a rebuild keeps the first occurrence and never fails.
    pub fn rebuild(&mut self, store: &RecordStore) {
        self.flights.rebuild(store.flights().entries().map(|(h, r)| (r.id, h)));
        self.passengers
            .rebuild(store.passengers().entries().map(|(h, r)| (r.id, h)));
        self.bookings.rebuild(store.bookings().entries().map(|(h, r)| (r.id, h)));
        self.aircraft
            .rebuild(store.aircraft().entries().map(|(h, r)| (r.id.clone(), h)));
        self.flight_bookings
            .rebuild(store.bookings().entries().map(|(h, r)| (r.flight_id, h)));
    }

    /// Registers the record just appended at `handle`.
    ///
    /// Appends never move existing rows, so only the new key is inserted.
    pub(crate) fn record_appended<T: Indexed>(
        &mut self,
        store: &RecordStore,
        handle: RecordHandle,
    ) -> CoreResult<()> {
        let record = store
            .table::<T>()
            .get(handle)
            .ok_or_else(|| CoreError::invalid_format(format!("stale {} handle", T::KIND)))?;
        T::on_append(self, handle, record)
    }

    /// Looks up a record by primary key.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record carries `key`.
    pub fn get<'s, T: Indexed>(&self, store: &'s RecordStore, key: &T::Key) -> CoreResult<&'s T> {
        self.handle::<T>(key)
            .and_then(|handle| store.table::<T>().get(handle))
            .ok_or_else(|| CoreError::not_found(T::KIND, key))
    }

    /// Returns the handle of the record carrying `key`.
    #[must_use]
    pub fn handle<T: Indexed>(&self, key: &T::Key) -> Option<RecordHandle> {
        T::primary(self).get(key)
    }

    /// Returns true if a record of type `T` carries `key`.
    #[must_use]
    pub fn contains<T: Indexed>(&self, key: &T::Key) -> bool {
        T::primary(self).contains(key)
    }

    /// Returns the primary index of record type `T`.
    #[must_use]
    pub fn primary<T: Indexed>(&self) -> &HashIndex<T::Key> {
        T::primary(self)
    }

    /// Returns the FlightID → bookings index.
    #[must_use]
    pub fn flight_bookings(&self) -> &HashIndex<FlightId> {
        &self.flight_bookings
    }

    /// Returns every booking on `flight_id`, cancelled ones included.
    ///
    /// An unknown flight yields an empty list.
    #[must_use]
    pub fn bookings_for_flight<'s>(
        &self,
        store: &'s RecordStore,
        flight_id: FlightId,
    ) -> Vec<&'s Booking> {
        self.flight_bookings
            .lookup(&flight_id)
            .iter()
            .filter_map(|handle| store.bookings().get(*handle))
            .collect()
    }
}

impl Default for IndexManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager")
            .field("flights", &self.flights.len())
            .field("passengers", &self.passengers.len())
            .field("bookings", &self.bookings.len())
            .field("aircraft", &self.aircraft.len())
            .field("flight_bookings", &self.flight_bookings.len())
            .finish()
    }
}
