//! Database query helpers for listing the entries of a partition.

use rusqlite::Connection;

use crate::{Error, partition::Partition};

use super::core::{Entry, map_entry_row};

/// The order to sort entries in a query.
pub(crate) enum RowOrder {
    /// Sort in order of increasing row index, i.e. oldest entry first.
    #[allow(dead_code)]
    Ascending,
    /// Sort in order of decreasing row index, i.e. newest entry first.
    Descending,
}

/// Get all the entries of `partition` sorted by row index.
///
/// # Errors
/// Returns [Error::Sql] if:
/// - Database connection fails
/// - SQL query preparation or execution fails
/// - Entry row mapping fails
pub(crate) fn entries_in_partition(
    partition: &Partition,
    order: RowOrder,
    connection: &Connection,
) -> Result<Vec<Entry>, Error> {
    let order_clause = match order {
        RowOrder::Ascending => "ORDER BY row_idx ASC",
        RowOrder::Descending => "ORDER BY row_idx DESC",
    };

    let query = format!(
        "SELECT id, partition_id, row_idx, timestamp, vnd, eur, usd, category, note \
        FROM entry WHERE partition_id = ?1 {order_clause}"
    );

    connection
        .prepare(&query)?
        .query_map([partition.id], map_entry_row)?
        .map(|entry_result| entry_result.map_err(Error::Sql))
        .collect()
}
