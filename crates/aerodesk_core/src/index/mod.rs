//! Index implementations for access paths.
//!
//! Indexes are internal access paths over the record store, not a query
//! language. They are:
//! - Keyed by primary key or by a foreign key (FlightID on bookings)
//! - Valued by record handles, never by copies of record data
//! - Fully derivable from the record store at any time
//!
//! # Maintenance
//!
//! - Add appends one row, so the new key is inserted incrementally.
//! - Cancel edits a status field in place and leaves indexes alone.
//! - Delete may cascade, so every index is rebuilt afterwards.

mod hash;
mod manager;
mod traits;

pub use hash::HashIndex;
pub use manager::{IndexManager, Indexed};
pub use traits::{Index, IndexKey, IndexSpec};
