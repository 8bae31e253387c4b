//! The API endpoints URIs.

/// The route for reading and writing the ledger, dispatched on the action parameter.
pub const LEDGER: &str = "/api/ledger";
/// The route for appending a single entry posted as a JSON document.
pub const ENTRIES: &str = "/api/entries";
