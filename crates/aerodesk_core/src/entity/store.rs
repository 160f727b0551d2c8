//! Record store: the four ordered entity tables.

use crate::entity::record::{Aircraft, Booking, Flight, Passenger, Record};
use crate::persistence::Tables;
use std::fmt;

/// Position of a record inside its table.
///
/// Handles stay valid until the next structural removal from the same
/// table; the index manager is rebuilt after every removal, so handles it
/// hands out always point at the record they were built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordHandle(usize);

impl RecordHandle {
    /// Returns the zero-based row position.
    #[inline]
    #[must_use]
    pub const fn position(self) -> usize {
        self.0
    }
}

/// An ordered collection of records of one kind.
///
/// Insertion order is preserved so iteration is deterministic.
#[derive(Debug, Clone)]
pub struct Table<T: Record> {
    rows: Vec<T>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Record> Table<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding `rows` in the given order.
    #[must_use]
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self { rows }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the record at `handle`.
    #[must_use]
    pub fn get(&self, handle: RecordHandle) -> Option<&T> {
        self.rows.get(handle.0)
    }

    /// Returns all records in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Iterates over records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// Iterates over `(handle, record)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (RecordHandle, &T)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(pos, row)| (RecordHandle(pos), row))
    }

    /// Returns the largest primary key in the table.
    #[must_use]
    pub fn max_key(&self) -> Option<T::Key> {
        self.rows.iter().map(|row| row.key()).max()
    }

    /// Appends a record and returns its handle.
    pub(crate) fn append(&mut self, row: T) -> RecordHandle {
        self.rows.push(row);
        RecordHandle(self.rows.len() - 1)
    }

    /// Removes every record matching `predicate`, keeping the order of the rest.
    ///
    /// Returns the removed records in their former order.
    pub(crate) fn remove_where<P>(&mut self, mut predicate: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.rows.len());
        for row in self.rows.drain(..) {
            if predicate(&row) {
                removed.push(row);
            } else {
                kept.push(row);
            }
        }
        self.rows = kept;
        removed
    }

    /// Edits the record at `handle` in place.
    ///
    /// The closure must not change the primary key.
    pub(crate) fn update<F, R>(&mut self, handle: RecordHandle, edit: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.rows.get_mut(handle.0).map(edit)
    }

    pub(crate) fn into_rows(self) -> Vec<T> {
        self.rows
    }
}

impl<'a, T: Record> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Typed access from a record type to its table in the store.
pub trait Stored: Record {
    /// Returns the table holding this record type.
    fn table(store: &RecordStore) -> &Table<Self>;

    /// Returns the table holding this record type, mutably.
    fn table_mut(store: &mut RecordStore) -> &mut Table<Self>;
}

macro_rules! impl_stored {
    ($record:ty, $field:ident) => {
        impl Stored for $record {
            fn table(store: &RecordStore) -> &Table<Self> {
                &store.$field
            }

            fn table_mut(store: &mut RecordStore) -> &mut Table<Self> {
                &mut store.$field
            }
        }
    };
}

/// Holds the four entity tables.
///
/// The store knows nothing about keys beyond what each record reports;
/// uniqueness and referential rules are enforced by the mutation engine.
#[derive(Clone, Default)]
pub struct RecordStore {
    flights: Table<Flight>,
    passengers: Table<Passenger>,
    bookings: Table<Booking>,
    aircraft: Table<Aircraft>,
}

impl_stored!(Flight, flights);
impl_stored!(Passenger, passengers);
impl_stored!(Booking, bookings);
impl_stored!(Aircraft, aircraft);

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from loaded tables, keeping row order.
    #[must_use]
    pub fn from_tables(tables: Tables) -> Self {
        Self {
            flights: Table::from_rows(tables.flights),
            passengers: Table::from_rows(tables.passengers),
            bookings: Table::from_rows(tables.bookings),
            aircraft: Table::from_rows(tables.aircraft),
        }
    }

    /// Returns a copy of every table, ready to hand to a gateway.
    #[must_use]
    pub fn snapshot(&self) -> Tables {
        self.clone().into_tables()
    }

    /// Consumes the store and returns its tables.
    #[must_use]
    pub fn into_tables(self) -> Tables {
        Tables {
            flights: self.flights.into_rows(),
            passengers: self.passengers.into_rows(),
            bookings: self.bookings.into_rows(),
            aircraft: self.aircraft.into_rows(),
        }
    }

    /// Returns the table for record type `T`.
    #[must_use]
    pub fn table<T: Stored>(&self) -> &Table<T> {
        T::table(self)
    }

    pub(crate) fn table_mut<T: Stored>(&mut self) -> &mut Table<T> {
        T::table_mut(self)
    }

    /// Returns the flights table.
    #[must_use]
    pub fn flights(&self) -> &Table<Flight> {
        &self.flights
    }

    /// Returns the passengers table.
    #[must_use]
    pub fn passengers(&self) -> &Table<Passenger> {
        &self.passengers
    }

    /// Returns the bookings table.
    #[must_use]
    pub fn bookings(&self) -> &Table<Booking> {
        &self.bookings
    }

    /// Returns the aircraft table.
    #[must_use]
    pub fn aircraft(&self) -> &Table<Aircraft> {
        &self.aircraft
    }

    /// Appends a record to its table.
    pub(crate) fn append<T: Stored>(&mut self, record: T) -> RecordHandle {
        self.table_mut::<T>().append(record)
    }

    /// Removes every record of type `T` matching `predicate`.
    pub(crate) fn remove_where<T, P>(&mut self, predicate: P) -> Vec<T>
    where
        T: Stored,
        P: FnMut(&T) -> bool,
    {
        self.table_mut::<T>().remove_where(predicate)
    }

    /// Edits one record of type `T` in place.
    pub(crate) fn update<T, F, R>(&mut self, handle: RecordHandle, edit: F) -> Option<R>
    where
        T: Stored,
        F: FnOnce(&mut T) -> R,
    {
        self.table_mut::<T>().update(handle, edit)
    }

    /// Returns the total number of records across all tables.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.flights.len() + self.passengers.len() + self.bookings.len() + self.aircraft.len()
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("flights", &self.flights.len())
            .field("passengers", &self.passengers.len())
            .field("bookings", &self.bookings.len())
            .field("aircraft", &self.aircraft.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BookingId, FlightId, PassengerId};
    use crate::types::BookingStatus;

    fn booking(id: u64, flight: u64, seat: u32) -> Booking {
        Booking {
            id: BookingId(id),
            flight_id: FlightId(flight),
            passenger_id: PassengerId(1),
            seat_number: seat,
            status: BookingStatus::Booked,
        }
    }

    #[test]
    fn append_returns_position() {
        let mut store = RecordStore::new();
        let first = store.append(booking(1, 1, 1));
        let second = store.append(booking(2, 1, 2));

        assert_eq!(first.position(), 0);
        assert_eq!(second.position(), 1);
        assert_eq!(store.bookings().get(second).unwrap().id, BookingId(2));
    }

    #[test]
    fn remove_where_keeps_order() {
        let mut store = RecordStore::new();
        for (id, flight) in [(1, 1), (2, 2), (3, 1), (4, 2)] {
            store.append(booking(id, flight, id as u32));
        }

        let removed = store.remove_where::<Booking, _>(|b| b.flight_id == FlightId(1));

        let removed_ids: Vec<_> = removed.iter().map(|b| b.id.0).collect();
        let kept_ids: Vec<_> = store.bookings().iter().map(|b| b.id.0).collect();
        assert_eq!(removed_ids, vec![1, 3]);
        assert_eq!(kept_ids, vec![2, 4]);
    }

    #[test]
    fn remove_where_nothing_matches() {
        let mut store = RecordStore::new();
        store.append(booking(1, 1, 1));
        let removed = store.remove_where::<Booking, _>(|_| false);
        assert!(removed.is_empty());
        assert_eq!(store.bookings().len(), 1);
    }

    #[test]
    fn update_in_place() {
        let mut store = RecordStore::new();
        let handle = store.append(booking(1, 1, 1));

        store.update::<Booking, _, _>(handle, |b| b.status = BookingStatus::Cancelled);

        assert_eq!(
            store.bookings().get(handle).unwrap().status,
            BookingStatus::Cancelled
        );
        assert!(store
            .update::<Booking, _, _>(RecordHandle(9), |_| ())
            .is_none());
    }

    #[test]
    fn max_key_and_snapshot() {
        let mut store = RecordStore::new();
        assert_eq!(store.bookings().max_key(), None);

        store.append(booking(4, 1, 1));
        store.append(booking(2, 1, 2));
        assert_eq!(store.bookings().max_key(), Some(BookingId(4)));

        let tables = store.snapshot();
        assert_eq!(tables.bookings.len(), 2);
        assert_eq!(store.total_count(), 2);
    }
}
