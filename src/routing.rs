//! Application router configuration.

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState,
    api::{append_entry_endpoint, mutate_ledger_endpoint, query_ledger_endpoint},
    endpoints,
    response::MessageResponse,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::LEDGER,
            get(query_ledger_endpoint).post(mutate_ledger_endpoint),
        )
        .route(endpoints::ENTRIES, post(append_entry_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The fallback for requests that match no route.
async fn get_404_not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::error(format!("no route for {uri}"))),
    )
        .into_response()
}
