//! Stress tests for aerodesk.
//!
//! These runs drive one database from several threads and check that
//! every seat ends up with at most one active booking.

use crate::fixtures::scenarios;
use aerodesk_core::{Database, FlightId, PassengerId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Rejected operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Rejected: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Booking attempts per thread.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Seat rows on the stressed aircraft.
    pub rows: u32,
    /// Seats in each row.
    pub seats_per_row: u32,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 500,
            threads: 4,
            rows: 30,
            seats_per_row: 6,
        }
    }
}

impl StressConfig {
    /// Seats on the stressed aircraft.
    pub fn total_seats(&self) -> u32 {
        self.rows * self.seats_per_row
    }
}

/// Adds the aircraft, flight and one passenger per thread for a run.
pub fn prepare_flight(db: &Database, config: &StressConfig) -> (FlightId, Vec<PassengerId>) {
    let aircraft = scenarios::aircraft(db, "STRESS", config.rows, config.seats_per_row);
    let flight = scenarios::flight(
        db,
        &aircraft,
        "Dublin",
        "Paris",
        scenarios::christmas(),
        99.0,
    );
    let passengers = (0..config.threads)
        .map(|i| scenarios::passenger(db, &format!("Thread{i}"), "Stress"))
        .collect();
    (flight, passengers)
}

/// Run concurrent bookings of overlapping seats on one flight.
///
/// Every thread walks the seat range from a different offset, so most
/// seats are contested.
pub fn stress_concurrent_bookings(db: Arc<Database>, config: &StressConfig) -> StressTestResult {
    let (flight, passengers) = prepare_flight(&db, config);
    let total_seats = config.total_seats();
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    let handles: Vec<_> = passengers
        .into_iter()
        .enumerate()
        .map(|(thread_index, passenger)| {
            let db = Arc::clone(&db);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let operations = config.operations;
            let offset = thread_index as u32 * 7;

            thread::spawn(move || {
                for i in 0..operations {
                    let seat = (offset + i as u32) % total_seats + 1;
                    let booking = aerodesk_core::NewBooking {
                        flight_id: flight,
                        passenger_id: passenger,
                        seat_number: seat,
                    };
                    match db.add(booking.into()) {
                        Ok(_) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run readers against a writer that books and cancels seats.
pub fn stress_concurrent_reads(db: Arc<Database>, config: &StressConfig) -> StressTestResult {
    let (flight, passengers) = prepare_flight(&db, config);
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    let writer = {
        let db = Arc::clone(&db);
        let passenger = passengers[0];
        let operations = config.operations;
        let total_seats = config.total_seats();
        thread::spawn(move || {
            for i in 0..operations {
                let seat = i as u32 % total_seats + 1;
                let booking = aerodesk_core::NewBooking {
                    flight_id: flight,
                    passenger_id: passenger,
                    seat_number: seat,
                };
                if let Ok(key) = db.add(booking.into()) {
                    let _ = db.cancel(&key);
                }
            }
        })
    };

    let readers: Vec<_> = (1..config.threads.max(2))
        .map(|_| {
            let db = Arc::clone(&db);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let operations = config.operations;
            thread::spawn(move || {
                for _ in 0..operations {
                    let consistent = db
                        .seat_map(flight)
                        .map(|map| map.available_count() + 1 >= map.total())
                        .unwrap_or(false);
                    if consistent {
                        successful.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    writer.join().expect("Writer panicked");
    for reader in readers {
        reader.join().expect("Reader panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}
