//! Sets up the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, entry::create_entry_table, partition::create_partition_table};

/// Add the tables the application needs to the database behind `connection`.
///
/// Initialisation is idempotent, tables that already exist are left alone.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_partition_table(&transaction)?;
    create_entry_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
