//! Defines the endpoint for reading the ledger.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    batch::{get_all_data, get_stats, get_totals, get_transactions},
    command::{LedgerParams, ReadCommand, parse_read_command},
    response::{AllDataResponse, StatsResponse, TotalsResponse, TransactionsResponse},
};

/// The state needed to read the ledger.
#[derive(Debug, Clone)]
pub struct LedgerQueryState {
    /// The database connection for reading entries and partitions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to fill in missing month parameters.
    pub local_timezone: String,
}

impl FromRef<AppState> for LedgerQueryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for reading the ledger.
///
/// The action parameter picks the view: getAllData, getTransactions or
/// getStats, with anything else returning the month's currency totals.
/// Months that have no partition yet read as empty, they are never created
/// here.
pub async fn query_ledger_endpoint(
    State(state): State<LedgerQueryState>,
    Query(params): Query<LedgerParams>,
) -> Result<Response, Error> {
    let command = parse_read_command(&params, &state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let response = match command {
        ReadCommand::AllData(key) => {
            Json(AllDataResponse::from(get_all_data(&key, &connection)?)).into_response()
        }
        ReadCommand::Transactions(key) => {
            Json(TransactionsResponse::new(get_transactions(&key, &connection)?)).into_response()
        }
        ReadCommand::Stats(key) => {
            let (stats, budget) = get_stats(&key, &connection)?;

            Json(StatsResponse::new(stats, budget)).into_response()
        }
        ReadCommand::Totals(key) => {
            Json(TotalsResponse::from(get_totals(&key, &connection)?)).into_response()
        }
    };

    Ok(response)
}
