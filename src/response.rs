//! The JSON response envelopes of the ledger API.
//!
//! Every response carries a `status` field of either "success" or "error" so
//! clients can branch without inspecting HTTP status codes. The remaining
//! fields depend on the action, and the casing of the wire names (totalVND,
//! sheetName) is fixed by the clients that already consume them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    aggregation::{BudgetSummary, CategoryStat, CurrencyTotals},
    batch::{AllData, ListedEntry},
};

/// The status value of every successful response.
pub const STATUS_SUCCESS: &str = "success";

/// The status value of every failed response.
pub const STATUS_ERROR: &str = "error";

/// The envelope of write acknowledgements and of every error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse {
    /// Either "success" or "error".
    pub status: &'static str,
    /// What happened, in one sentence.
    pub message: String,
}

impl MessageResponse {
    /// Create a success acknowledgement carrying `message`.
    pub fn success(message: String) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message,
        }
    }

    /// Create an error response carrying `message`.
    pub fn error(message: String) -> Self {
        Self {
            status: STATUS_ERROR,
            message,
        }
    }
}

/// The combined month view returned by getAllData.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllDataResponse {
    /// Always "success".
    pub status: &'static str,
    /// The month's total in Vietnamese dong.
    #[serde(rename = "totalVND")]
    pub total_vnd: f64,
    /// The month's total in euros.
    #[serde(rename = "totalEUR")]
    pub total_eur: f64,
    /// The month's total in US dollars.
    #[serde(rename = "totalUSD")]
    pub total_usd: f64,
    /// The month's entries, newest first.
    pub transactions: Vec<ListedEntry>,
    /// The euro breakdown by category.
    pub stats: BTreeMap<String, CategoryStat>,
    /// The month's budget and how much of it is left.
    pub budget: BudgetSummary,
}

impl From<AllData> for AllDataResponse {
    fn from(data: AllData) -> Self {
        Self {
            status: STATUS_SUCCESS,
            total_vnd: data.totals.vnd,
            total_eur: data.totals.eur,
            total_usd: data.totals.usd,
            transactions: data.transactions,
            stats: data.stats,
            budget: data.budget,
        }
    }
}

/// The entry list returned by getTransactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionsResponse {
    /// Always "success".
    pub status: &'static str,
    /// The month's entries, newest first.
    pub transactions: Vec<ListedEntry>,
}

impl TransactionsResponse {
    /// Wrap `transactions` in a success envelope.
    pub fn new(transactions: Vec<ListedEntry>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            transactions,
        }
    }
}

/// The category breakdown and budget returned by getStats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    /// Always "success".
    pub status: &'static str,
    /// The euro breakdown by category.
    pub stats: BTreeMap<String, CategoryStat>,
    /// The month's budget and how much of it is left.
    pub budget: BudgetSummary,
}

impl StatsResponse {
    /// Wrap a category breakdown and budget summary in a success envelope.
    pub fn new(stats: BTreeMap<String, CategoryStat>, budget: BudgetSummary) -> Self {
        Self {
            status: STATUS_SUCCESS,
            stats,
            budget,
        }
    }
}

/// The three currency totals returned by the default read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsResponse {
    /// Always "success".
    pub status: &'static str,
    /// The month's total in Vietnamese dong.
    #[serde(rename = "totalVND")]
    pub total_vnd: f64,
    /// The month's total in euros.
    #[serde(rename = "totalEUR")]
    pub total_eur: f64,
    /// The month's total in US dollars.
    #[serde(rename = "totalUSD")]
    pub total_usd: f64,
}

impl From<CurrencyTotals> for TotalsResponse {
    fn from(totals: CurrencyTotals) -> Self {
        Self {
            status: STATUS_SUCCESS,
            total_vnd: totals.vnd,
            total_eur: totals.eur,
            total_usd: totals.usd,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
