//! Defines the core data model and database operations for ledger entries.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use time::PrimitiveDateTime;

use crate::{
    Error,
    database_id::{DatabaseId, PartitionId},
    partition::{Partition, get_or_create_partition},
    timestamp::MonthKey,
};

// ============================================================================
// MODELS
// ============================================================================

/// The row index of the first data row in a partition.
///
/// Row indices are 1-based and the first two rows of every partition are
/// reserved for the header and the totals, so entries start at row 3.
pub const DATA_START_ROW: i64 = 3;

/// A single ledger line: one spend or income event in a monthly partition.
///
/// An entry has no identity beyond its position, it is addressed by its
/// partition and row index. Deleting a row shifts every later row in the same
/// partition down by one, so row indices must not be cached across deletions.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The ID of the entry.
    pub id: DatabaseId,
    /// The ID of the partition the entry belongs to.
    pub partition_id: PartitionId,
    /// The row index of the entry within its partition.
    pub row: i64,
    /// When the spend or income happened.
    pub timestamp: PrimitiveDateTime,
    /// The amount in Vietnamese dong.
    pub vnd: f64,
    /// The amount in euros.
    pub eur: f64,
    /// The amount in US dollars.
    pub usd: f64,
    /// The spending category, e.g. "Food".
    ///
    /// Stored as-is, including text outside the fixed category list.
    pub category: String,
    /// A free-text note describing the entry.
    pub note: String,
}

/// The fields of an entry before it has been placed in a partition.
///
/// The partition an entry lands in is always derived from `timestamp`, it
/// cannot be chosen independently.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// When the spend or income happened.
    pub timestamp: PrimitiveDateTime,
    /// The amount in Vietnamese dong.
    pub vnd: f64,
    /// The amount in euros.
    pub eur: f64,
    /// The amount in US dollars.
    pub usd: f64,
    /// The spending category, e.g. "Food".
    pub category: String,
    /// A free-text note describing the entry.
    pub note: String,
}

/// What [update_entry_at] did with the row.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The new timestamp stayed within the partition's month, so the row was
    /// overwritten where it was.
    UpdatedInPlace,
    /// The new timestamp fell in a different month, so the entry now lives at
    /// the end of that month's partition.
    Moved {
        /// The name of the partition the entry moved to.
        to: String,
    },
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the entry table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS entry (
            id INTEGER PRIMARY KEY,
            partition_id INTEGER NOT NULL,
            row_idx INTEGER NOT NULL,
            timestamp TEXT NOT NULL,
            vnd REAL NOT NULL,
            eur REAL NOT NULL,
            usd REAL NOT NULL,
            category TEXT NOT NULL,
            note TEXT NOT NULL,
            FOREIGN KEY(partition_id) REFERENCES partition(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_entry_partition_row ON entry(partition_id, row_idx);",
    )?;

    Ok(())
}

/// Map a database row to an Entry.
pub fn map_entry_row(row: &Row) -> Result<Entry, rusqlite::Error> {
    let id = row.get(0)?;
    let partition_id = row.get(1)?;
    let row_index = row.get(2)?;
    let timestamp = row.get(3)?;
    let vnd = row.get(4)?;
    let eur = row.get(5)?;
    let usd = row.get(6)?;
    let category = row.get(7)?;
    let note = row.get(8)?;

    Ok(Entry {
        id,
        partition_id,
        row: row_index,
        timestamp,
        vnd,
        eur,
        usd,
        category,
        note,
    })
}

/// Add `fields` as a new entry at the end of `partition`'s data rows.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn append_entry(
    partition: &Partition,
    fields: NewEntry,
    connection: &Connection,
) -> Result<Entry, Error> {
    let entry = connection
        .prepare(
            "INSERT INTO entry (partition_id, row_idx, timestamp, vnd, eur, usd, category, note)
             VALUES (
                ?1,
                COALESCE((SELECT MAX(row_idx) + 1 FROM entry WHERE partition_id = ?1), ?2),
                ?3, ?4, ?5, ?6, ?7, ?8
             )
             RETURNING id, partition_id, row_idx, timestamp, vnd, eur, usd, category, note",
        )?
        .query_row(
            (
                partition.id,
                DATA_START_ROW,
                fields.timestamp,
                fields.vnd,
                fields.eur,
                fields.usd,
                fields.category,
                fields.note,
            ),
            map_entry_row,
        )?;

    Ok(entry)
}

/// Remove the entry at `row` of `partition`. Every later row of the partition
/// shifts down by one index.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidRowIndex] if `row` is below [DATA_START_ROW] or no entry
///   occupies it,
/// - or [Error::Sql] if there is some other SQL error.
pub fn delete_entry_at(
    partition: &Partition,
    row: i64,
    connection: &Connection,
) -> Result<(), Error> {
    if row < DATA_START_ROW {
        return Err(Error::InvalidRowIndex(row));
    }

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    let rows_affected = transaction.execute(
        "DELETE FROM entry WHERE partition_id = ?1 AND row_idx = ?2",
        (partition.id, row),
    )?;

    if rows_affected == 0 {
        return Err(Error::InvalidRowIndex(row));
    }

    transaction.execute(
        "UPDATE entry SET row_idx = row_idx - 1 WHERE partition_id = ?1 AND row_idx > ?2",
        (partition.id, row),
    )?;

    transaction.commit()?;

    Ok(())
}

/// Overwrite the entry at `row` of `partition` with `fields`, or relocate it
/// when the new timestamp falls in a different month.
///
/// A relocation appends `fields` to the target month's partition (created if
/// absent) and then deletes the original row. The two steps are not wrapped
/// in one transaction: if the delete fails the appended copy remains in the
/// target partition.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidRowIndex] if no entry occupies `row`,
/// - or [Error::Sql] if there is some other SQL error.
pub fn update_entry_at(
    partition: &Partition,
    row: i64,
    fields: NewEntry,
    connection: &Connection,
) -> Result<UpdateOutcome, Error> {
    let target_key = MonthKey::from_date_time(fields.timestamp);

    if target_key == partition.month_key() {
        let rows_affected = connection.execute(
            "UPDATE entry SET timestamp = ?1, vnd = ?2, eur = ?3, usd = ?4, category = ?5, note = ?6
             WHERE partition_id = ?7 AND row_idx = ?8",
            (
                fields.timestamp,
                fields.vnd,
                fields.eur,
                fields.usd,
                fields.category,
                fields.note,
                partition.id,
                row,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::InvalidRowIndex(row));
        }

        return Ok(UpdateOutcome::UpdatedInPlace);
    }

    let target = get_or_create_partition(&target_key, connection)?;
    append_entry(&target, fields, connection)?;
    delete_entry_at(partition, row, connection)?;

    Ok(UpdateOutcome::Moved { to: target.name })
}

// ============================================================================
// TESTS
// ============================================================================



#[cfg(test)]
mod delete_entry_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        entry::{RowOrder, entries_in_partition},
        partition::{Partition, get_or_create_partition},
        timestamp::MonthKey,
    };

    use super::{DATA_START_ROW, NewEntry, append_entry, delete_entry_at};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn test_partition(conn: &Connection) -> Partition {
        let key = MonthKey::new(2024, 3).unwrap();
        get_or_create_partition(&key, conn).expect("Could not create partition")
    }

    fn entry_with_note(note: &str) -> NewEntry {
        NewEntry {
            timestamp: datetime!(2024-03-05 12:30:00),
            vnd: 0.0,
            eur: 1.0,
            usd: 0.0,
            category: "Food".to_owned(),
            note: note.to_owned(),
        }
    }

    #[test]
    fn later_rows_shift_down() {
        let conn = get_test_connection();
        let partition = test_partition(&conn);
        for note in ["first", "second", "third"] {
            append_entry(&partition, entry_with_note(note), &conn).unwrap();
        }

        delete_entry_at(&partition, DATA_START_ROW, &conn).expect("Could not delete entry");

        let entries = entries_in_partition(&partition, RowOrder::Ascending, &conn).unwrap();
        let rows_and_notes: Vec<(i64, &str)> = entries
            .iter()
            .map(|entry| (entry.row, entry.note.as_str()))
            .collect();
        assert_eq!(
            rows_and_notes,
            vec![(DATA_START_ROW, "second"), (DATA_START_ROW + 1, "third")]
        );
    }

    #[test]
    fn row_below_the_data_range_is_rejected() {
        let conn = get_test_connection();
        let partition = test_partition(&conn);
        append_entry(&partition, entry_with_note("keep me"), &conn).unwrap();

        let result = delete_entry_at(&partition, DATA_START_ROW - 1, &conn);

        assert_eq!(result, Err(Error::InvalidRowIndex(DATA_START_ROW - 1)));

        let entries = entries_in_partition(&partition, RowOrder::Ascending, &conn).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn unoccupied_row_is_rejected() {
        let conn = get_test_connection();
        let partition = test_partition(&conn);
        append_entry(&partition, entry_with_note("only"), &conn).unwrap();

        let result = delete_entry_at(&partition, DATA_START_ROW + 5, &conn);

        assert_eq!(result, Err(Error::InvalidRowIndex(DATA_START_ROW + 5)));
    }

    #[test]
    fn other_partitions_are_untouched() {
        let conn = get_test_connection();
        let march = test_partition(&conn);
        let april_key = MonthKey::new(2024, 4).unwrap();
        let april = get_or_create_partition(&april_key, &conn).unwrap();
        append_entry(&march, entry_with_note("march"), &conn).unwrap();
        append_entry(&april, entry_with_note("april"), &conn).unwrap();

        delete_entry_at(&march, DATA_START_ROW, &conn).expect("Could not delete entry");

        let remaining = entries_in_partition(&april, RowOrder::Ascending, &conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].note, "april");
    }
}

#[cfg(test)]
mod update_entry_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        entry::{RowOrder, entries_in_partition},
        partition::{Partition, find_partition_by_name, get_or_create_partition},
        timestamp::MonthKey,
    };

    use super::{DATA_START_ROW, NewEntry, UpdateOutcome, append_entry, update_entry_at};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn march_partition(conn: &Connection) -> Partition {
        let key = MonthKey::new(2024, 3).unwrap();
        get_or_create_partition(&key, conn).expect("Could not create partition")
    }

    fn entry_on(timestamp: time::PrimitiveDateTime, note: &str) -> NewEntry {
        NewEntry {
            timestamp,
            vnd: 10_000.0,
            eur: 0.4,
            usd: 0.5,
            category: "Travel".to_owned(),
            note: note.to_owned(),
        }
    }

    #[test]
    fn same_month_overwrites_in_place() {
        let conn = get_test_connection();
        let partition = march_partition(&conn);
        append_entry(
            &partition,
            entry_on(datetime!(2024-03-05 12:30:00), "before"),
            &conn,
        )
        .unwrap();

        let outcome = update_entry_at(
            &partition,
            DATA_START_ROW,
            NewEntry {
                timestamp: datetime!(2024-03-20 08:00:00),
                vnd: 99_000.0,
                eur: 3.6,
                usd: 4.0,
                category: "Bills".to_owned(),
                note: "after".to_owned(),
            },
            &conn,
        )
        .expect("Could not update entry");

        assert_eq!(outcome, UpdateOutcome::UpdatedInPlace);

        let entries = entries_in_partition(&partition, RowOrder::Ascending, &conn).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].row, DATA_START_ROW);
        assert_eq!(entries[0].timestamp, datetime!(2024-03-20 08:00:00));
        assert_eq!(entries[0].vnd, 99_000.0);
        assert_eq!(entries[0].eur, 3.6);
        assert_eq!(entries[0].usd, 4.0);
        assert_eq!(entries[0].category, "Bills");
        assert_eq!(entries[0].note, "after");
    }

    #[test]
    fn same_month_update_of_unoccupied_row_is_rejected() {
        let conn = get_test_connection();
        let partition = march_partition(&conn);

        let result = update_entry_at(
            &partition,
            DATA_START_ROW,
            entry_on(datetime!(2024-03-20 08:00:00), "ghost"),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidRowIndex(DATA_START_ROW)));
    }

    #[test]
    fn different_month_moves_the_entry() {
        let conn = get_test_connection();
        let partition = march_partition(&conn);
        append_entry(
            &partition,
            entry_on(datetime!(2024-03-05 12:30:00), "stays"),
            &conn,
        )
        .unwrap();
        append_entry(
            &partition,
            entry_on(datetime!(2024-03-06 12:30:00), "moves"),
            &conn,
        )
        .unwrap();

        let moved_fields = entry_on(datetime!(2024-04-02 09:00:00), "moves");
        let outcome = update_entry_at(&partition, DATA_START_ROW + 1, moved_fields.clone(), &conn)
            .expect("Could not update entry");

        assert_eq!(
            outcome,
            UpdateOutcome::Moved {
                to: "April 2024".to_owned()
            }
        );

        let source_entries = entries_in_partition(&partition, RowOrder::Ascending, &conn).unwrap();
        assert_eq!(source_entries.len(), 1);
        assert_eq!(source_entries[0].note, "stays");

        let target = find_partition_by_name("April 2024", &conn)
            .unwrap()
            .expect("Target partition should have been created");
        let target_entries = entries_in_partition(&target, RowOrder::Ascending, &conn).unwrap();
        assert_eq!(target_entries.len(), 1);
        assert_eq!(target_entries[0].row, DATA_START_ROW);
        assert_eq!(target_entries[0].timestamp, moved_fields.timestamp);
        assert_eq!(target_entries[0].vnd, moved_fields.vnd);
        assert_eq!(target_entries[0].eur, moved_fields.eur);
        assert_eq!(target_entries[0].usd, moved_fields.usd);
        assert_eq!(target_entries[0].category, moved_fields.category);
        assert_eq!(target_entries[0].note, moved_fields.note);
    }

    #[test]
    fn move_of_unoccupied_row_errors_after_appending_to_the_target() {
        let conn = get_test_connection();
        let partition = march_partition(&conn);

        let result = update_entry_at(
            &partition,
            DATA_START_ROW,
            entry_on(datetime!(2024-04-02 09:00:00), "orphan"),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidRowIndex(DATA_START_ROW)));

        // The append half of the move is not rolled back.
        let target = find_partition_by_name("April 2024", &conn).unwrap().unwrap();
        let target_entries = entries_in_partition(&target, RowOrder::Ascending, &conn).unwrap();
        assert_eq!(target_entries.len(), 1);
    }
}
