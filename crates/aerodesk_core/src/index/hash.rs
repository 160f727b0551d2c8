//! Hash index implementation.

use crate::entity::RecordHandle;
use crate::error::{CoreError, CoreResult};
use crate::index::traits::{Index, IndexKey, IndexSpec};
use std::collections::HashMap;

/// Hash-based index for O(1) equality lookups.
///
/// `HashIndex` maps a key to the handles of the records carrying it.
/// A unique index holds at most one handle per key (primary keys); a
/// non-unique index keeps handles in insertion order (foreign keys).
///
/// # Example
///
/// ```rust,ignore
/// let mut index: HashIndex<FlightId> = HashIndex::new(spec);
///
/// index.insert(FlightId(7), handle)?;
/// let handles = index.lookup(&FlightId(7));
/// ```
pub struct HashIndex<K: IndexKey> {
    /// Index specification.
    spec: IndexSpec<K>,
    /// Key to handles mapping.
    entries: HashMap<K, Vec<RecordHandle>>,
    /// Total mapping count.
    count: usize,
}

impl<K: IndexKey> HashIndex<K> {
    /// Creates a new hash index.
    pub fn new(spec: IndexSpec<K>) -> Self {
        Self {
            spec,
            entries: HashMap::new(),
            count: 0,
        }
    }

    /// Rebuilds the index from a set of key-handle pairs.
    ///
    /// Duplicate keys in a unique index keep the first handle.
    pub fn rebuild<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, RecordHandle)>,
    {
        self.clear();
        for (key, handle) in entries {
            let _ = self.insert(key, handle);
        }
    }

    /// Returns the single handle for `key` in a unique index.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<RecordHandle> {
        self.entries.get(key).and_then(|handles| handles.first().copied())
    }

    /// Iterates over every key-handle mapping in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, RecordHandle)> + '_ {
        self.entries
            .iter()
            .flat_map(|(key, handles)| handles.iter().map(move |h| (key, *h)))
    }
}

impl<K: IndexKey> Index<K> for HashIndex<K> {
    fn spec(&self) -> &IndexSpec<K> {
        &self.spec
    }

    fn insert(&mut self, key: K, handle: RecordHandle) -> CoreResult<()> {
        // A unique index only accepts the same handle again for an existing key
        if self.spec.unique {
            if let Some(existing) = self.entries.get(&key) {
                if !existing.is_empty() && !existing.contains(&handle) {
                    return Err(CoreError::conflict(format!(
                        "duplicate {} {} in {}",
                        self.spec.kind.key_column(),
                        key,
                        self.spec.name
                    )));
                }
            }
        }

        let handles = self.entries.entry(key).or_default();
        if !handles.contains(&handle) {
            handles.push(handle);
            self.count += 1;
        }
        Ok(())
    }

    fn remove(&mut self, key: &K, handle: RecordHandle) -> bool {
        if let Some(handles) = self.entries.get_mut(key) {
            if let Some(pos) = handles.iter().position(|h| *h == handle) {
                handles.remove(pos);
                self.count -= 1;
                if handles.is_empty() {
                    self.entries.remove(key);
                }
                return true;
            }
        }
        false
    }

    fn lookup(&self, key: &K) -> &[RecordHandle] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.count
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AircraftId, FlightId, RecordStore};
    use crate::types::EntityKind;

    fn handles(n: usize) -> Vec<RecordHandle> {
        // Handles are only minted by the store.
        let mut store = RecordStore::new();
        (0..n)
            .map(|i| {
                store.append(crate::entity::Aircraft {
                    id: AircraftId::new(format!("AC{i}")).unwrap(),
                    rows: 1,
                    seats_per_row: 1,
                })
            })
            .collect()
    }

    fn test_spec() -> IndexSpec<FlightId> {
        IndexSpec::new(EntityKind::Booking, "bookings_by_flight")
    }

    fn unique_spec() -> IndexSpec<FlightId> {
        IndexSpec::new(EntityKind::Flight, "flights_pk").unique()
    }

    #[test]
    fn insert_and_lookup() {
        let h = handles(1);
        let mut index = HashIndex::new(test_spec());

        index.insert(FlightId(1), h[0]).unwrap();

        assert_eq!(index.lookup(&FlightId(1)), &[h[0]]);
        assert_eq!(index.get(&FlightId(1)), Some(h[0]));
    }

    #[test]
    fn lookup_missing() {
        let index: HashIndex<FlightId> = HashIndex::new(test_spec());
        assert!(index.lookup(&FlightId(9)).is_empty());
        assert_eq!(index.get(&FlightId(9)), None);
    }

    #[test]
    fn multiple_handles_keep_insertion_order() {
        let h = handles(3);
        let mut index = HashIndex::new(test_spec());

        index.insert(FlightId(1), h[2]).unwrap();
        index.insert(FlightId(1), h[0]).unwrap();
        index.insert(FlightId(1), h[1]).unwrap();

        assert_eq!(index.lookup(&FlightId(1)), &[h[2], h[0], h[1]]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn remove_one_of_many() {
        let h = handles(2);
        let mut index = HashIndex::new(test_spec());

        index.insert(FlightId(1), h[0]).unwrap();
        index.insert(FlightId(1), h[1]).unwrap();

        assert!(index.remove(&FlightId(1), h[0]));
        assert_eq!(index.lookup(&FlightId(1)), &[h[1]]);

        assert!(index.remove(&FlightId(1), h[1]));
        assert!(!index.contains(&FlightId(1)));
        assert!(!index.remove(&FlightId(1), h[1]));
    }

    #[test]
    fn unique_index_prevents_duplicates() {
        let h = handles(2);
        let mut index = HashIndex::new(unique_spec());

        index.insert(FlightId(1), h[0]).unwrap();

        let err = index.insert(FlightId(1), h[1]).unwrap_err();
        assert!(err.to_string().contains("FlightID 1"));
    }

    #[test]
    fn unique_index_allows_same_handle() {
        let h = handles(1);
        let mut index = HashIndex::new(unique_spec());

        index.insert(FlightId(1), h[0]).unwrap();
        index.insert(FlightId(1), h[0]).unwrap();

        assert_eq!(index.len(), 1);
    }

    #[test]
    fn rebuild_index() {
        let h = handles(3);
        let mut index = HashIndex::new(unique_spec());
        index.insert(FlightId(99), h[0]).unwrap();

        index.rebuild(vec![
            (FlightId(1), h[0]),
            (FlightId(2), h[1]),
            (FlightId(3), h[2]),
        ]);

        assert_eq!(index.len(), 3);
        assert!(!index.contains(&FlightId(99)));
        assert_eq!(index.get(&FlightId(2)), Some(h[1]));
    }

    #[test]
    fn len_and_clear() {
        let h = handles(4);
        let mut index = HashIndex::new(test_spec());
        for (i, handle) in h.iter().enumerate() {
            index.insert(FlightId(i as u64), *handle).unwrap();
        }

        assert_eq!(index.len(), 4);
        assert_eq!(index.iter().count(), 4);

        index.clear();
        assert!(index.is_empty());
    }
}
