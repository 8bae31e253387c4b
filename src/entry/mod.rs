//! Ledger entry management.
//!
//! This module contains everything related to individual entries:
//! - The `Entry` model and the `NewEntry` field set used for writes
//! - Database functions for appending, listing, updating and deleting the
//!   entries of a monthly partition

mod core;
mod query;

pub use core::{
    DATA_START_ROW, Entry, NewEntry, UpdateOutcome, append_entry, create_entry_table,
    delete_entry_at, update_entry_at,
};
pub(crate) use query::{RowOrder, entries_in_partition};
