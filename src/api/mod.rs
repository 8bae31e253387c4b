//! The HTTP endpoints of the ledger API.
//!
//! There are two routes. The ledger route serves reads through its query
//! string and form writes through its body, both dispatched on an action
//! parameter. The entries route appends a single entry posted as JSON.

mod append_endpoint;
mod mutate_endpoint;
mod query_endpoint;

pub use append_endpoint::append_entry_endpoint;
pub use mutate_endpoint::mutate_ledger_endpoint;
pub use query_endpoint::query_ledger_endpoint;
