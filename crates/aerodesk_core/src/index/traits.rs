//! Index traits and key types.

use crate::entity::{AircraftId, BookingId, FlightId, PassengerId, RecordHandle, RecordKey};
use crate::error::CoreResult;
use crate::types::EntityKind;
use std::fmt;
use std::hash::Hash;

/// A key that can be indexed.
///
/// Index keys must be:
/// - Hashable (for [`super::HashIndex`])
/// - Orderable (for key allocation and deterministic reports)
/// - Convertible to a [`RecordKey`] for error messages and reports
pub trait IndexKey:
    Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display + Into<RecordKey> + Send + Sync + 'static
{
}

impl IndexKey for FlightId {}
impl IndexKey for PassengerId {}
impl IndexKey for BookingId {}
impl IndexKey for AircraftId {}

/// Specification for an index over one table.
#[derive(Debug, Clone)]
pub struct IndexSpec<K: IndexKey> {
    /// Table this index is built from.
    pub kind: EntityKind,
    /// Name of the index (diagnostics only).
    pub name: String,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
    /// Key marker.
    _marker: std::marker::PhantomData<K>,
}

impl<K: IndexKey> IndexSpec<K> {
    /// Creates a new index specification.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            unique: false,
            _marker: std::marker::PhantomData,
        }
    }

    /// Makes this a unique index.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Core index trait.
///
/// Indexes map keys to record handles only; record data is always read
/// back through the record store.
pub trait Index<K: IndexKey>: Send + Sync {
    /// Returns the index specification.
    fn spec(&self) -> &IndexSpec<K>;

    /// Inserts a key-handle mapping.
    fn insert(&mut self, key: K, handle: RecordHandle) -> CoreResult<()>;

    /// Removes a key-handle mapping.
    fn remove(&mut self, key: &K, handle: RecordHandle) -> bool;

    /// Looks up handles by exact key, in insertion order.
    fn lookup(&self, key: &K) -> &[RecordHandle];

    /// Checks if the index contains a key.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of key-handle mappings in the index.
    fn len(&self) -> usize;

    /// Returns true if the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the index.
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_spec_builder() {
        let spec: IndexSpec<FlightId> = IndexSpec::new(EntityKind::Flight, "flights_pk").unique();

        assert_eq!(spec.kind, EntityKind::Flight);
        assert_eq!(spec.name, "flights_pk");
        assert!(spec.unique);
    }

    #[test]
    fn keys_convert_to_record_keys() {
        let key: RecordKey = BookingId(3).into();
        assert_eq!(key.kind(), EntityKind::Booking);
    }
}
