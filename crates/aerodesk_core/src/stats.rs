//! Record counts.
//!
//! ```rust,ignore
//! let stats = db.stats()?;
//! println!("active bookings: {}", stats.active_bookings);
//! ```

use crate::entity::RecordStore;
use serde::Serialize;

/// Counts per table and per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    /// Aircraft rows.
    pub aircraft: usize,
    /// Flight rows.
    pub flights: usize,
    /// Flights still scheduled.
    pub scheduled_flights: usize,
    /// Cancelled flights.
    pub cancelled_flights: usize,
    /// Passenger rows.
    pub passengers: usize,
    /// Booking rows.
    pub bookings: usize,
    /// Bookings holding a seat.
    pub active_bookings: usize,
    /// Cancelled bookings.
    pub cancelled_bookings: usize,
}

impl DatabaseStats {
    /// Counts the records in `store`.
    #[must_use]
    pub fn collect(store: &RecordStore) -> Self {
        let scheduled_flights = store.flights().iter().filter(|f| f.is_scheduled()).count();
        let active_bookings = store.bookings().iter().filter(|b| b.is_active()).count();
        Self {
            aircraft: store.aircraft().len(),
            flights: store.flights().len(),
            scheduled_flights,
            cancelled_flights: store.flights().len() - scheduled_flights,
            passengers: store.passengers().len(),
            bookings: store.bookings().len(),
            active_bookings,
            cancelled_bookings: store.bookings().len() - active_bookings,
        }
    }

    /// Returns the number of records across all tables.
    #[must_use]
    pub fn total(&self) -> usize {
        self.aircraft + self.flights + self.passengers + self.bookings
    }
}
