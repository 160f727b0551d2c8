//! Data directory management.
//!
//! This module handles the file system layout of an aerodesk data directory:
//!
//! ```text
//! <data_dir>/
//! ├─ LOCK              # Advisory lock for the single owning session
//! ├─ aircraft.jsonl    # One JSON object per line, per table
//! ├─ flights.jsonl
//! ├─ passengers.jsonl
//! └─ bookings.jsonl
//! ```
//!
//! The LOCK file ensures only one session owns the record store at a time.

use crate::error::{CoreError, CoreResult};
use crate::types::EntityKind;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "LOCK";

/// Manages the data directory and its exclusive lock.
///
/// # Example
///
/// ```rust,ignore
/// use aerodesk_core::dir::DataDir;
/// use std::path::Path;
///
/// let dir = DataDir::open(Path::new("airline"), true)?;
/// println!("flights table: {:?}", dir.table_path(EntityKind::Flight));
/// ```
#[derive(Debug)]
pub struct DataDir {
    /// Root directory path.
    path: PathBuf,
    /// Lock file handle (held for exclusive access).
    _lock_file: File,
}

impl DataDir {
    /// Opens or creates a data directory and takes its lock.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist and `create_if_missing` is false
    /// - The path exists but is not a directory
    /// - Another session holds the lock (returns `DatabaseLocked`)
    /// - I/O errors occur
    pub fn open(path: &Path, create_if_missing: bool) -> CoreResult<Self> {
        if !path.exists() {
            if create_if_missing {
                fs::create_dir_all(path)?;
            } else {
                return Err(CoreError::invalid_format(format!(
                    "data directory does not exist: {}",
                    path.display()
                )));
            }
        }

        if !path.is_dir() {
            return Err(CoreError::invalid_format(format!(
                "path is not a directory: {}",
                path.display()
            )));
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(LOCK_FILE))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(CoreError::DatabaseLocked);
        }

        Ok(Self {
            path: path.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Returns the path to the data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of the table file for `kind`.
    #[must_use]
    pub fn table_path(&self, kind: EntityKind) -> PathBuf {
        self.path.join(kind.file_name())
    }

    /// Checks if no table file has been written yet.
    #[must_use]
    pub fn is_new(&self) -> bool {
        EntityKind::ALL
            .iter()
            .all(|kind| !self.table_path(*kind).exists())
    }
}
