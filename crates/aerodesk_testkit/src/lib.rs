//! # aerodesk Testkit
//!
//! Test utilities for aerodesk.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based generators for records and operation sequences
//! - An integration harness that checks consistency after every step
//! - Concurrent booking stress runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aerodesk_testkit::prelude::*;
//!
//! #[test]
//! fn books_a_seat() {
//!     with_temp_db(|db| {
//!         let flight = scenarios::dublin_paris(db);
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
