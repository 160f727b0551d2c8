//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-content storage backend for one table.
///
/// Backends are **opaque byte stores**. aerodesk owns the row format;
/// backends only know how to hand back the current content and how to
/// replace it.
///
/// # Invariants
///
/// - `read_all` returns exactly the bytes of the last successful `replace`
///   (or the pre-existing content if there was none)
/// - `replace` is atomic: on error the previous content is still readable
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For flat files
pub trait StorageBackend: Send + Sync {
    /// Reads the full content of the store.
    ///
    /// A store that has never been written returns an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read_all(&self) -> StorageResult<Vec<u8>>;

    /// Replaces the full content of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the new content could not be written. The old
    /// content is left in place in that case.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns the current size of the content in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Syncs data and metadata to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Returns true if the store holds no content.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.size()? == 0)
    }
}
