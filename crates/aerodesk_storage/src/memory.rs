//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// This backend stores the table content in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral sessions that never touch disk
///
/// # Example
///
/// ```rust
/// use aerodesk_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// backend.replace(b"test data").unwrap();
/// assert_eq!(backend.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Vec<u8>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing content.
    ///
    /// Useful for testing load paths.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Returns a copy of the current content.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        Ok(self.data.read().clone())
    }

    fn replace(&mut self, new_data: &[u8]) -> StorageResult<()> {
        let mut data = self.data.write();
        data.clear();
        data.extend_from_slice(new_data);
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().len() as u64)
    }

    fn sync(&mut self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.is_empty().unwrap());
        assert!(backend.read_all().unwrap().is_empty());
    }

    #[test]
    fn memory_replace_overwrites() {
        let mut backend = InMemoryBackend::new();
        backend.replace(b"first line\nsecond line\n").unwrap();
        backend.replace(b"short").unwrap();

        assert_eq!(backend.read_all().unwrap(), b"short");
        assert_eq!(backend.size().unwrap(), 5);
    }

    #[test]
    fn memory_with_data() {
        let backend = InMemoryBackend::with_data(b"preloaded".to_vec());
        assert_eq!(backend.size().unwrap(), 9);
        assert_eq!(backend.read_all().unwrap(), b"preloaded");
    }

    #[test]
    fn memory_replace_with_empty() {
        let mut backend = InMemoryBackend::with_data(b"rows".to_vec());
        backend.replace(b"").unwrap();
        assert!(backend.is_empty().unwrap());
        assert!(backend.data().is_empty());
    }

    #[test]
    fn memory_sync_succeeds() {
        let mut backend = InMemoryBackend::new();
        backend.replace(b"data").unwrap();
        assert!(backend.sync().is_ok());
    }
}
