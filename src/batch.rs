//! Combined read queries over one partition.
//!
//! Readers never create partitions: a month nobody has written to reads back
//! as zero totals, an empty entry list and a zeroed stats block rather than
//! an error.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    aggregation::{
        BudgetSummary, CategoryStat, CurrencyTotals, budget_summary, category_breakdown,
        currency_totals,
    },
    entry::{Entry, RowOrder, entries_in_partition},
    partition::{Partition, find_partition_by_name},
    timestamp::{MonthKey, format_timestamp},
};

/// One entry as it appears in a response list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedEntry {
    /// The row index the entry currently occupies. Deleting an earlier row
    /// shifts it, so clients must not hold on to it across deletions.
    pub row: i64,
    /// The name of the partition the entry lives in, e.g. "March 2024".
    #[serde(rename = "sheetName")]
    pub sheet_name: String,
    /// The timestamp in the canonical `dd/MM/yyyy HH:mm:ss` layout.
    pub timestamp: String,
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

/// Everything a client needs to render one month, fetched in a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct AllData {
    /// The three currency totals.
    pub totals: CurrencyTotals,
    /// All entries of the month, newest row first.
    pub transactions: Vec<ListedEntry>,
    /// The euro amount and share of each fixed category.
    pub stats: BTreeMap<String, CategoryStat>,
    /// The month's budget and its unspent share.
    pub budget: BudgetSummary,
}

/// Get the totals, entry list and stats of the month `key` in one call.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn get_all_data(key: &MonthKey, connection: &Connection) -> Result<AllData, Error> {
    let Some(partition) = find_partition_by_name(&key.label(), connection)? else {
        return Ok(AllData {
            totals: CurrencyTotals::default(),
            transactions: Vec::new(),
            stats: category_breakdown(&[]),
            budget: BudgetSummary::default(),
        });
    };

    let entries = entries_in_partition(&partition, RowOrder::Descending, connection)?;
    let totals = currency_totals(&entries);

    Ok(AllData {
        totals,
        transactions: listed_entries(&entries, &partition),
        stats: category_breakdown(&entries),
        budget: budget_summary(totals.eur, partition.budget),
    })
}

/// Get the entries of the month `key`, newest row first.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn get_transactions(
    key: &MonthKey,
    connection: &Connection,
) -> Result<Vec<ListedEntry>, Error> {
    let Some(partition) = find_partition_by_name(&key.label(), connection)? else {
        return Ok(Vec::new());
    };

    let entries = entries_in_partition(&partition, RowOrder::Descending, connection)?;

    Ok(listed_entries(&entries, &partition))
}

/// Get the category breakdown and budget summary of the month `key`.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn get_stats(
    key: &MonthKey,
    connection: &Connection,
) -> Result<(BTreeMap<String, CategoryStat>, BudgetSummary), Error> {
    let Some(partition) = find_partition_by_name(&key.label(), connection)? else {
        return Ok((category_breakdown(&[]), BudgetSummary::default()));
    };

    let entries = entries_in_partition(&partition, RowOrder::Descending, connection)?;
    let totals = currency_totals(&entries);

    Ok((
        category_breakdown(&entries),
        budget_summary(totals.eur, partition.budget),
    ))
}

/// Get the three currency totals of the month `key`.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn get_totals(key: &MonthKey, connection: &Connection) -> Result<CurrencyTotals, Error> {
    let Some(partition) = find_partition_by_name(&key.label(), connection)? else {
        return Ok(CurrencyTotals::default());
    };

    let entries = entries_in_partition(&partition, RowOrder::Descending, connection)?;

    Ok(currency_totals(&entries))
}

fn listed_entries(entries: &[Entry], partition: &Partition) -> Vec<ListedEntry> {
    entries
        .iter()
        .map(|entry| ListedEntry {
            row: entry.row,
            sheet_name: partition.name.clone(),
            timestamp: format_timestamp(entry.timestamp),
            vnd: entry.vnd,
            eur: entry.eur,
            usd: entry.usd,
            category: entry.category.clone(),
            note: entry.note.clone(),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================



#[cfg(test)]
mod get_stats_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        entry::{NewEntry, append_entry},
        partition::{get_or_create_partition, set_partition_budget},
        timestamp::MonthKey,
    };

    use super::get_stats;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn unknown_month_reads_as_zeroed_stats() {
        let conn = get_test_connection();

        let (stats, budget) = get_stats(&MonthKey::new(2024, 3).unwrap(), &conn).unwrap();

        assert_eq!(stats.len(), 9);
        for stat in stats.values() {
            assert_eq!(stat.amount, 0.0);
            assert_eq!(stat.percent, 0);
        }
        assert_eq!(budget.amount, 0.0);
        assert_eq!(budget.percent, 0);
    }

    #[test]
    fn stats_follow_the_configured_budget() {
        let conn = get_test_connection();
        let key = MonthKey::new(2024, 3).unwrap();
        let partition = set_partition_budget(&key, 1000.0, &conn).unwrap();
        append_entry(
            &partition,
            NewEntry {
                timestamp: datetime!(2024-03-05 12:30:00),
                vnd: 0.0,
                eur: 250.0,
                usd: 0.0,
                category: "Shopping".to_owned(),
                note: String::new(),
            },
            &conn,
        )
        .unwrap();

        let (stats, budget) = get_stats(&key, &conn).unwrap();

        assert_eq!(stats["Shopping"].amount, 250.0);
        assert_eq!(stats["Shopping"].percent, 100);
        assert_eq!(budget.amount, 1000.0);
        assert_eq!(budget.percent, 75);
    }

    #[test]
    fn stats_for_a_month_with_a_budget_but_no_entries() {
        let conn = get_test_connection();
        let key = MonthKey::new(2024, 3).unwrap();
        set_partition_budget(&key, 500.0, &conn).unwrap();

        let (stats, budget) = get_stats(&key, &conn).unwrap();

        for stat in stats.values() {
            assert_eq!(stat.amount, 0.0);
            assert_eq!(stat.percent, 0);
        }
        assert_eq!(budget.amount, 500.0);
        // Nothing spent yet.
        assert_eq!(budget.percent, 100);
    }

    #[test]
    fn reads_do_not_create_the_partition() {
        let conn = get_test_connection();
        let key = MonthKey::new(2024, 3).unwrap();

        get_stats(&key, &conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(id) FROM partition", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn budget_share_goes_negative_when_overspent() {
        let conn = get_test_connection();
        let key = MonthKey::new(2024, 3).unwrap();
        let partition = get_or_create_partition(&key, &conn).unwrap();
        append_entry(
            &partition,
            NewEntry {
                timestamp: datetime!(2024-03-05 12:30:00),
                vnd: 0.0,
                eur: 2000.0,
                usd: 0.0,
                category: "Bills".to_owned(),
                note: String::new(),
            },
            &conn,
        )
        .unwrap();

        let (_stats, budget) = get_stats(&key, &conn).unwrap();

        assert_eq!(budget.amount, 1600.0);
        assert_eq!(budget.percent, -25);
    }
}

#[cfg(test)]
mod get_totals_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        entry::{NewEntry, append_entry},
        partition::get_or_create_partition,
        timestamp::MonthKey,
    };

    use super::get_totals;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn unknown_month_totals_are_zero() {
        let conn = get_test_connection();

        let totals = get_totals(&MonthKey::new(2024, 3).unwrap(), &conn).unwrap();

        assert_eq!(totals.vnd, 0.0);
        assert_eq!(totals.eur, 0.0);
        assert_eq!(totals.usd, 0.0);
    }

    #[test]
    fn totals_sum_the_month() {
        let conn = get_test_connection();
        let key = MonthKey::new(2024, 3).unwrap();
        let partition = get_or_create_partition(&key, &conn).unwrap();
        for eur in [10.0, 20.0] {
            append_entry(
                &partition,
                NewEntry {
                    timestamp: datetime!(2024-03-05 12:30:00),
                    vnd: 1000.0,
                    eur,
                    usd: 0.25,
                    category: String::new(),
                    note: String::new(),
                },
                &conn,
            )
            .unwrap();
        }

        let totals = get_totals(&key, &conn).unwrap();

        assert_eq!(totals.vnd, 2000.0);
        assert_eq!(totals.eur, 30.0);
        assert_eq!(totals.usd, 0.5);
    }
}
