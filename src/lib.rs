//! Monthbook is a backend for a personal spending ledger.
//!
//! Entries live in one partition per calendar month and carry amounts in
//! Vietnamese dong, euros and US dollars. This library provides a JSON API
//! for appending, editing and summarising those entries.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod api;
mod app_state;
mod batch;
mod category;
mod command;
mod database_id;
mod db;
mod endpoints;
mod entry;
mod partition;
mod response;
mod routing;
mod timestamp;
mod timezone;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use entry::{NewEntry, append_entry};
pub use partition::{Partition, get_or_create_partition, set_partition_budget};
pub use routing::build_router;
pub use timestamp::MonthKey;

use crate::response::MessageResponse;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request was missing a parameter or carried one that could not be
    /// interpreted.
    ///
    /// The message should name the offending parameter so the client can
    /// correct it.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The row index does not refer to a data row of the partition.
    ///
    /// Row indices count from the first data row (index 3) and shift down
    /// when an earlier row is deleted, so an index that was valid a moment
    /// ago may no longer be.
    #[error("no data row at index {0}")]
    InvalidRowIndex(i64),

    /// The named partition has not been created.
    ///
    /// Partitions come into existence when an entry is appended or a budget
    /// is set, so the client should check the month label for typos.
    #[error("no partition named \"{0}\"")]
    PartitionNotFound(String),

    /// The timestamp string matched none of the accepted formats, or matched
    /// the canonical layout with impossible field values.
    #[error("could not parse timestamp \"{0}\"")]
    InvalidTimestamp(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::Sql(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidParameters(_) | Error::InvalidRowIndex(_) | Error::InvalidTimestamp(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::PartitionNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidTimezone(_) | Error::DatabaseLock | Error::Sql(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(MessageResponse::error(self.to_string()))).into_response()
    }
}
