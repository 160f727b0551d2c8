//! # aerodesk Storage
//!
//! Storage backend trait and implementations for aerodesk.
//!
//! Each entity table lives in its own backend. Backends are **opaque byte
//! stores**: they hold the full content of one table file and do not
//! interpret it.
//!
//! ## Design Principles
//!
//! - Backends are whole-content stores (read everything, replace everything)
//! - A replace is all-or-nothing: readers see either the old or the new content
//! - No knowledge of records, columns or indexes
//! - Must be `Send + Sync` so a session can be moved between threads
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral sessions
//! - [`FileBackend`] - For flat files on disk
//!
//! ## Example
//!
//! ```rust
//! use aerodesk_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.replace(b"hello world").unwrap();
//! assert_eq!(backend.read_all().unwrap(), b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
