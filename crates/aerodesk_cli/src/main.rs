//! aerodesk CLI
//!
//! Command-line tools over an aerodesk data directory.
//!
//! # Commands
//!
//! - `init` - Create an empty data directory
//! - `inspect` - Display record counts
//! - `verify` - Check tables and indexes for consistency
//! - `list` - Print one table
//! - `search` - Find scheduled flights by route and date
//! - `seats` - Show free seats or the seat map of a flight
//! - `book` - Book a seat by label
//! - `add` / `cancel` / `delete` - Change records

mod commands;

use aerodesk_core::{date_time_column, AircraftId, EntityKind, FlightId, PassengerId};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// aerodesk flight, passenger and booking tools.
#[derive(Parser)]
#[command(name = "aerodesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty data directory
    Init,

    /// Display record counts
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check tables and indexes for consistency
    Verify {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print one table
    List {
        /// Table to print (flights, passengers, bookings, aircraft)
        entity: EntityKind,

        /// Order flights by price or bookings by id
        #[arg(short, long)]
        sorted: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Find scheduled flights by route and date
    Search {
        /// Departure city
        #[arg(long)]
        from: String,

        /// Arrival city
        #[arg(long)]
        to: String,

        /// Departure date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the free seats of a flight
    Seats {
        /// Flight id
        flight: u64,

        /// Draw the seat map instead of listing free seats
        #[arg(short, long)]
        map: bool,
    },

    /// Book a seat by label, e.g. 12F
    Book {
        /// Flight id
        flight: u64,

        /// Passenger id
        passenger: u64,

        /// Seat label
        seat: String,
    },

    /// Add a record
    #[command(subcommand)]
    Add(AddCommand),

    /// Cancel a flight or booking
    Cancel {
        /// Entity kind (flight, booking)
        entity: EntityKind,

        /// Record id
        id: String,
    },

    /// Delete a record and the bookings depending on it
    Delete {
        /// Entity kind (flight, passenger, booking, aircraft)
        entity: EntityKind,

        /// Record id
        id: String,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum AddCommand {
    /// Add a flight; capacity comes from the aircraft
    Flight {
        /// Aircraft operating the flight
        #[arg(long)]
        aircraft: AircraftId,

        /// Departure city
        #[arg(long)]
        from: String,

        /// Arrival city
        #[arg(long)]
        to: String,

        /// Departure time (YYYY-MM-DD HH:MM:SS)
        #[arg(long, value_parser = parse_date_time)]
        at: NaiveDateTime,

        /// Cost per seat
        #[arg(long)]
        cost: f64,
    },

    /// Add a passenger
    Passenger {
        /// First name
        #[arg(long)]
        first_name: String,

        /// Surname
        #[arg(long)]
        surname: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: NaiveDate,

        /// Email address
        #[arg(long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Postal address
        #[arg(long)]
        address: String,
    },

    /// Add a booking by seat number
    Booking {
        /// Flight id
        flight: u64,

        /// Passenger id
        passenger: u64,

        /// Seat number
        seat_number: u32,
    },

    /// Add an aircraft
    Aircraft {
        /// Aircraft id, e.g. A320
        id: AircraftId,

        /// Number of rows
        rows: u32,

        /// Seats in each row (1-26)
        seats_per_row: u32,
    },
}

fn parse_date_time(text: &str) -> Result<NaiveDateTime, String> {
    date_time_column::parse(text)
        .map_err(|_| "Invalid date/time format. Use YYYY-MM-DD HH:MM:SS".to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Commands::Version = cli.command {
        println!("aerodesk CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("aerodesk Core v{}", aerodesk_core::VERSION);
        return Ok(());
    }

    let path = cli.path.ok_or("Data directory path required (--path)")?;

    match cli.command {
        Commands::Init => commands::init::run(&path)?,
        Commands::Inspect { format } => commands::inspect::run(&path, &format)?,
        Commands::Verify { format } => commands::verify::run(&path, &format)?,
        Commands::List {
            entity,
            sorted,
            format,
        } => commands::list::run(&path, entity, sorted, &format)?,
        Commands::Search {
            from,
            to,
            date,
            format,
        } => commands::search::run(&path, &from, &to, date, &format)?,
        Commands::Seats { flight, map } => commands::seats::run(&path, FlightId(flight), map)?,
        Commands::Book {
            flight,
            passenger,
            seat,
        } => commands::book::run(&path, FlightId(flight), PassengerId(passenger), &seat)?,
        Commands::Add(add) => commands::add::run(&path, add.into_entry())?,
        Commands::Cancel { entity, id } => commands::cancel::run(&path, entity, &id)?,
        Commands::Delete { entity, id } => commands::delete::run(&path, entity, &id)?,
        Commands::Version => {}
    }

    Ok(())
}

impl AddCommand {
    fn into_entry(self) -> aerodesk_core::NewEntry {
        use aerodesk_core::{NewAircraft, NewBooking, NewEntry, NewFlight, NewPassenger};

        match self {
            Self::Flight {
                aircraft,
                from,
                to,
                at,
                cost,
            } => NewEntry::Flight(NewFlight {
                aircraft_id: aircraft,
                departure_city: from,
                arrival_city: to,
                date_time: at,
                cost_per_seat: cost,
            }),
            Self::Passenger {
                first_name,
                surname,
                dob,
                email,
                phone,
                address,
            } => NewEntry::Passenger(NewPassenger {
                first_name,
                surname,
                date_of_birth: dob,
                email,
                phone,
                address,
            }),
            Self::Booking {
                flight,
                passenger,
                seat_number,
            } => NewEntry::Booking(NewBooking {
                flight_id: FlightId(flight),
                passenger_id: PassengerId(passenger),
                seat_number,
            }),
            Self::Aircraft {
                id,
                rows,
                seats_per_row,
            } => NewEntry::Aircraft(NewAircraft {
                id,
                rows,
                seats_per_row,
            }),
        }
    }
}
