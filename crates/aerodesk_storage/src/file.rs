//! File-based storage backend for flat table files.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// Holds the content of one table file. The file is read in full and
/// rewritten in full; there is no in-place editing.
///
/// # Durability
///
/// `replace()` writes a sibling temporary file, syncs it, and renames it
/// over the target, so a crash leaves either the old or the new file.
///
/// # Example
///
/// ```no_run
/// use aerodesk_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("flights.jsonl")).unwrap();
/// backend.replace(b"{}\n").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    size: RwLock<u64>,
}

impl FileBackend {
    /// Opens or creates a file backend at the given path.
    ///
    /// A missing file is created empty so the table shows up in the data
    /// directory from the first session on.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created, or if the
    /// path names something other than a regular file.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if path.exists() && !path.is_file() {
            return Err(StorageError::NotAFile(path.to_path_buf()));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let size = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            size: RwLock::new(size),
        })
    }

    /// Opens or creates a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or file cannot be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    #[cfg(unix)]
    fn sync_parent(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                File::open(parent)?.sync_all()?;
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(data) => {
                *self.size.write() = data.len() as u64;
                Ok(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let temp_path = self.temp_path();

        let mut file = File::create(&temp_path)?;
        if let Err(e) = file.write_all(data).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        self.sync_parent()?;

        *self.size.write() = data.len() as u64;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(*self.size.read())
    }

    fn sync(&mut self) -> StorageResult<()> {
        match File::open(&self.path) {
            Ok(file) => file.sync_all()?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_create_new() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.jsonl");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(path.exists());
        assert!(backend.read_all().unwrap().is_empty());
    }

    #[test]
    fn file_replace_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.jsonl");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.replace(b"hello world").unwrap();

        assert_eq!(backend.size().unwrap(), 11);
        assert_eq!(backend.read_all().unwrap(), b"hello world");
    }

    #[test]
    fn file_replace_shrinks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookings.jsonl");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.replace(b"a much longer first version").unwrap();
        backend.replace(b"short").unwrap();

        assert_eq!(backend.read_all().unwrap(), b"short");
        assert_eq!(fs::read(&path).unwrap(), b"short");
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("passengers.jsonl");

        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.replace(b"persistent data").unwrap();
            backend.sync().unwrap();
        }

        {
            let backend = FileBackend::open(&path).unwrap();
            assert_eq!(backend.size().unwrap(), 15);
            assert_eq!(backend.read_all().unwrap(), b"persistent data");
        }
    }

    #[test]
    fn file_replace_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aircraft.jsonl");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.replace(b"row\n").unwrap();

        assert!(!dir.path().join("aircraft.jsonl.tmp").exists());
    }

    #[test]
    fn file_open_directory_fails() {
        let dir = tempdir().unwrap();
        let result = FileBackend::open(dir.path());
        assert!(matches!(result, Err(StorageError::NotAFile(_))));
    }

    #[test]
    fn file_create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("flights.jsonl");

        let backend = FileBackend::open_with_create_dirs(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn file_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.jsonl");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.path(), path);
    }
}
