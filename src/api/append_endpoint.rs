//! Defines the endpoint for appending an entry posted as a JSON document.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    entry::{NewEntry, append_entry},
    partition::get_or_create_partition,
    response::MessageResponse,
    timestamp::{MonthKey, parse_timestamp},
};

/// The state needed to append an entry.
#[derive(Debug, Clone)]
pub struct AppendEntryState {
    /// The database connection for writing entries and partitions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AppendEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON document for appending a single entry.
///
/// Every field defaults when absent so that a missing timestamp surfaces as
/// an invalid timestamp rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AppendEntryBody {
    /// When the spend or income happened.
    #[serde(default)]
    pub timestamp: String,
    /// The amount in Vietnamese dong.
    #[serde(default)]
    pub vnd: f64,
    /// The amount in euros.
    #[serde(default)]
    pub eur: f64,
    /// The amount in US dollars.
    #[serde(default)]
    pub usd: f64,
    /// The spending category.
    #[serde(default)]
    pub category: String,
    /// A free-text note.
    #[serde(default)]
    pub note: String,
}

/// A route handler that appends one entry to the partition its timestamp
/// falls in, creating the partition if needed.
pub async fn append_entry_endpoint(
    State(state): State<AppendEntryState>,
    Json(body): Json<AppendEntryBody>,
) -> Result<Response, Error> {
    let fields = NewEntry {
        timestamp: parse_timestamp(&body.timestamp)?,
        vnd: body.vnd,
        eur: body.eur,
        usd: body.usd,
        category: body.category,
        note: body.note,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let key = MonthKey::from_date_time(fields.timestamp);
    let partition = get_or_create_partition(&key, &connection)?;
    let entry = append_entry(&partition, fields, &connection)?;

    Ok(Json(MessageResponse::success(format!(
        "Added entry to row {} of {}",
        entry.row, partition.name
    )))
    .into_response())
}
