//! Defines the endpoint for writing to the ledger.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    command::{LedgerParams, WriteCommand, parse_write_command},
    entry::{UpdateOutcome, append_entry, delete_entry_at, update_entry_at},
    partition::{Partition, find_partition_by_name, get_or_create_partition, set_partition_budget},
    response::MessageResponse,
    timestamp::MonthKey,
};

/// The state needed to write to the ledger.
#[derive(Debug, Clone)]
pub struct LedgerMutationState {
    /// The database connection for writing entries and partitions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LedgerMutationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for writing to the ledger.
///
/// The action field picks the write: addEntry, update, delete or
/// updateBudget. An append lands in the partition its timestamp falls in,
/// creating it if needed, while update and delete address an existing
/// partition by name and fail when it is absent. Every acknowledgement names
/// the row and partition it applies to.
pub async fn mutate_ledger_endpoint(
    State(state): State<LedgerMutationState>,
    Form(params): Form<LedgerParams>,
) -> Result<Response, Error> {
    let command = parse_write_command(&params)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let message = match command {
        WriteCommand::AddEntry(fields) => {
            let key = MonthKey::from_date_time(fields.timestamp);
            let partition = get_or_create_partition(&key, &connection)?;
            let entry = append_entry(&partition, fields, &connection)?;

            format!("Added entry to row {} of {}", entry.row, partition.name)
        }
        WriteCommand::Update {
            sheet_name,
            row,
            fields,
        } => {
            let partition = require_partition(&sheet_name, &connection)?;

            match update_entry_at(&partition, row, fields, &connection)? {
                UpdateOutcome::UpdatedInPlace => format!("Updated row {row} of {sheet_name}"),
                UpdateOutcome::Moved { to } => format!("Moved row {row} of {sheet_name} to {to}"),
            }
        }
        WriteCommand::Delete { sheet_name, row } => {
            let partition = require_partition(&sheet_name, &connection)?;
            delete_entry_at(&partition, row, &connection)?;

            format!("Deleted row {row} of {sheet_name}")
        }
        WriteCommand::SetBudget { key, amount } => {
            let partition = set_partition_budget(&key, amount, &connection)?;

            format!("Set budget of {} to {amount}", partition.name)
        }
    };

    Ok(Json(MessageResponse::success(message)).into_response())
}

fn require_partition(name: &str, connection: &Connection) -> Result<Partition, Error> {
    find_partition_by_name(name, connection)?
        .ok_or_else(|| Error::PartitionNotFound(name.to_owned()))
}
