use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::datetime;

use monthbook::{
    MonthKey, NewEntry, append_entry, get_or_create_partition, initialize_db,
    set_partition_budget,
};

/// A utility for creating a test database for the REST API server of monthbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Adding sample months...");

    let march = get_or_create_partition(&MonthKey::new(2024, 3)?, &connection)?;
    append_entry(
        &march,
        NewEntry {
            timestamp: datetime!(2024-03-01 09:10:00),
            vnd: 0.0,
            eur: 42.5,
            usd: 0.0,
            category: "Groceries".to_owned(),
            note: "weekly shop".to_owned(),
        },
        &connection,
    )?;
    append_entry(
        &march,
        NewEntry {
            timestamp: datetime!(2024-03-08 18:45:00),
            vnd: 350_000.0,
            eur: 0.0,
            usd: 0.0,
            category: "Fun".to_owned(),
            note: "cinema".to_owned(),
        },
        &connection,
    )?;
    append_entry(
        &march,
        NewEntry {
            timestamp: datetime!(2024-03-21 07:30:00),
            vnd: 0.0,
            eur: 0.0,
            usd: 15.0,
            category: "Travel".to_owned(),
            note: "airport bus".to_owned(),
        },
        &connection,
    )?;

    let april = get_or_create_partition(&MonthKey::new(2024, 4)?, &connection)?;
    append_entry(
        &april,
        NewEntry {
            timestamp: datetime!(2024-04-02 12:00:00),
            vnd: 0.0,
            eur: 18.0,
            usd: 0.0,
            category: "Bills".to_owned(),
            note: "phone top-up".to_owned(),
        },
        &connection,
    )?;

    set_partition_budget(&MonthKey::new(2024, 4)?, 1800.0, &connection)?;

    println!("Success!");

    Ok(())
}
