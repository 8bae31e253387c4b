//! Defines the monthly partitions that group ledger entries, and their
//! database queries.

use rusqlite::{Connection, Row};
use time::Month;

use crate::{Error, database_id::PartitionId, timestamp::MonthKey};

// ============================================================================
// MODELS
// ============================================================================

/// The budget a partition starts with, in euros.
pub const DEFAULT_BUDGET: f64 = 1600.0;

/// A calendar month's worth of ledger entries.
///
/// Partitions are created on demand the first time an entry lands in a month
/// or a budget is set for it, never ahead of time.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// The ID of the partition.
    pub id: PartitionId,
    /// The display name of the partition, e.g. "March 2024".
    pub name: String,
    /// The calendar year the partition covers.
    pub year: i32,
    /// The month of `year` the partition covers.
    pub month: Month,
    /// The spending budget for the month, in euros.
    pub budget: f64,
}

impl Partition {
    /// The month the partition covers.
    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the partition table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_partition_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS partition (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            budget REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_partition_name ON partition(name);",
    )?;

    Ok(())
}

/// Map a database row to a Partition.
pub fn map_partition_row(row: &Row) -> Result<Partition, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let year = row.get(2)?;
    let raw_month: u8 = row.get(3)?;
    let month = Month::try_from(raw_month).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Integer,
            Box::new(error),
        )
    })?;
    let budget = row.get(4)?;

    Ok(Partition {
        id,
        name,
        year,
        month,
        budget,
    })
}

/// Retrieve the partition covering `key`, creating it with [DEFAULT_BUDGET]
/// if it does not exist yet.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn get_or_create_partition(
    key: &MonthKey,
    connection: &Connection,
) -> Result<Partition, Error> {
    if let Some(partition) = find_partition_by_name(&key.label(), connection)? {
        return Ok(partition);
    }

    let partition = connection
        .prepare(
            "INSERT INTO partition (name, year, month, budget)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, year, month, budget",
        )?
        .query_row(
            (key.label(), key.year, u8::from(key.month), DEFAULT_BUDGET),
            map_partition_row,
        )?;

    Ok(partition)
}

/// Retrieve the partition named `name`, or `None` if no entry or budget has
/// ever been recorded for that month.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn find_partition_by_name(
    name: &str,
    connection: &Connection,
) -> Result<Option<Partition>, Error> {
    let result = connection
        .prepare("SELECT id, name, year, month, budget FROM partition WHERE name = :name")?
        .query_row(&[(":name", &name)], map_partition_row);

    match result {
        Ok(partition) => Ok(Some(partition)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Set the budget of the partition covering `key`, creating the partition
/// first if it does not exist yet.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn set_partition_budget(
    key: &MonthKey,
    amount: f64,
    connection: &Connection,
) -> Result<Partition, Error> {
    let partition = get_or_create_partition(key, connection)?;

    let partition = connection
        .prepare(
            "UPDATE partition SET budget = ?1 WHERE id = ?2
             RETURNING id, name, year, month, budget",
        )?
        .query_row((amount, partition.id), map_partition_row)?;

    Ok(partition)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_partition_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_partition_table(&connection));
    }
}
