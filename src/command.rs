//! The typed command boundary of the ledger API.
//!
//! Requests arrive as loose string parameters. They are checked and converted
//! into closed command types here, at the edge, so the repository and
//! aggregation code below only ever sees well-formed values.

use serde::Deserialize;

use crate::{
    Error,
    entry::NewEntry,
    timestamp::{MonthKey, parse_timestamp},
    timezone::today_in_timezone,
};

/// The raw request parameters of the ledger API, shared by the query string
/// of reads and the form body of writes.
///
/// Every field is optional at this level; which ones are required depends on
/// the action and is checked by [parse_read_command] and
/// [parse_write_command]. Empty strings count as missing, since HTML forms
/// submit untouched fields as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerParams {
    /// The operation to perform, e.g. "getAllData" or "addEntry".
    pub action: Option<String>,
    /// The calendar year of the month being addressed.
    pub year: Option<String>,
    /// The one-based month number of the month being addressed.
    pub month: Option<String>,
    /// When the spend or income happened.
    pub timestamp: Option<String>,
    /// The amount in Vietnamese dong.
    pub vnd: Option<String>,
    /// The amount in euros.
    pub eur: Option<String>,
    /// The amount in US dollars.
    pub usd: Option<String>,
    /// The spending category.
    pub category: Option<String>,
    /// A free-text note.
    pub note: Option<String>,
    /// The row index an update or delete applies to.
    pub row: Option<String>,
    /// The name of the partition an update or delete applies to.
    #[serde(rename = "sheetName")]
    pub sheet_name: Option<String>,
    /// The new budget amount for updateBudget.
    pub budget: Option<String>,
}

/// A validated read request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadCommand {
    /// Totals, entry list and stats of a month in one response.
    AllData(MonthKey),
    /// Just the entry list of a month.
    Transactions(MonthKey),
    /// Just the category breakdown and budget of a month.
    Stats(MonthKey),
    /// Just the three currency totals of a month.
    Totals(MonthKey),
}

/// A validated write request.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteCommand {
    /// Append an entry to the partition its timestamp falls in.
    AddEntry(NewEntry),
    /// Overwrite the entry at a row of a named partition, relocating it when
    /// the new timestamp falls in a different month.
    Update {
        /// The name of the partition the row currently lives in.
        sheet_name: String,
        /// The row index to update.
        row: i64,
        /// The replacement field values.
        fields: NewEntry,
    },
    /// Delete the entry at a row of a named partition.
    Delete {
        /// The name of the partition the row lives in.
        sheet_name: String,
        /// The row index to delete.
        row: i64,
    },
    /// Set the budget of a month, creating its partition if absent.
    SetBudget {
        /// The month to set the budget of.
        key: MonthKey,
        /// The new budget amount in euros.
        amount: f64,
    },
}

/// Check and convert read parameters into a [ReadCommand].
///
/// `getAllData` is the only action that fills in missing year or month
/// fields, using today's date in `local_timezone`. The other reads require
/// both. An unrecognised or missing action reads the currency totals, which
/// keeps old clients that never send an action working.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidParameters] if a required field is missing or malformed,
/// - or [Error::InvalidTimezone] if a default date is needed and
///   `local_timezone` is not a canonical timezone name.
pub fn parse_read_command(
    params: &LedgerParams,
    local_timezone: &str,
) -> Result<ReadCommand, Error> {
    match non_empty(&params.action).unwrap_or_default() {
        "getAllData" => Ok(ReadCommand::AllData(month_key_defaulting_to_today(
            params,
            local_timezone,
        )?)),
        "getTransactions" => Ok(ReadCommand::Transactions(required_month_key(params)?)),
        "getStats" => Ok(ReadCommand::Stats(required_month_key(params)?)),
        _ => Ok(ReadCommand::Totals(required_month_key(params)?)),
    }
}

/// Check and convert write parameters into a [WriteCommand].
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidParameters] if the action is unrecognised or a required
///   field is missing or malformed,
/// - or [Error::InvalidTimestamp] if the timestamp of an addEntry or update
///   cannot be parsed.
pub fn parse_write_command(params: &LedgerParams) -> Result<WriteCommand, Error> {
    match non_empty(&params.action) {
        Some("addEntry") => Ok(WriteCommand::AddEntry(new_entry_from_params(params)?)),
        Some("update") => Ok(WriteCommand::Update {
            sheet_name: required_sheet_name(params)?,
            row: required_row(params)?,
            fields: new_entry_from_params(params)?,
        }),
        Some("delete") => Ok(WriteCommand::Delete {
            sheet_name: required_sheet_name(params)?,
            row: required_row(params)?,
        }),
        Some("updateBudget") => {
            let key = required_month_key(params)?;
            let raw_budget = non_empty(&params.budget)
                .ok_or_else(|| Error::InvalidParameters("budget is required".to_owned()))?;
            let amount: f64 = raw_budget.parse().map_err(|_| {
                Error::InvalidParameters(format!(
                    "could not read \"{raw_budget}\" as a budget amount"
                ))
            })?;

            if amount <= 0.0 {
                return Err(Error::InvalidParameters(
                    "budget must be greater than zero".to_owned(),
                ));
            }

            Ok(WriteCommand::SetBudget { key, amount })
        }
        Some(action) => Err(Error::InvalidParameters(format!(
            "\"{action}\" is not a ledger action"
        ))),
        None => Err(Error::InvalidParameters("action is required".to_owned())),
    }
}

/// Build the entry field set of an addEntry or update from its parameters.
///
/// Missing amounts become zero and missing category and note become empty,
/// matching what an untouched form field means. The category text is stored
/// as sent, it is not checked against the fixed category list.
fn new_entry_from_params(params: &LedgerParams) -> Result<NewEntry, Error> {
    let timestamp = parse_timestamp(non_empty(&params.timestamp).unwrap_or_default())?;

    Ok(NewEntry {
        timestamp,
        vnd: parse_amount("vnd", &params.vnd)?,
        eur: parse_amount("eur", &params.eur)?,
        usd: parse_amount("usd", &params.usd)?,
        category: non_empty(&params.category).unwrap_or_default().to_owned(),
        note: non_empty(&params.note).unwrap_or_default().to_owned(),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

fn parse_amount(name: &str, raw: &Option<String>) -> Result<f64, Error> {
    match non_empty(raw) {
        Some(text) => text.parse().map_err(|_| {
            Error::InvalidParameters(format!("could not read \"{text}\" as the {name} amount"))
        }),
        None => Ok(0.0),
    }
}

fn parse_year(raw: &str) -> Result<i32, Error> {
    raw.parse()
        .map_err(|_| Error::InvalidParameters(format!("could not read \"{raw}\" as a year")))
}

fn parse_month_number(raw: &str) -> Result<u8, Error> {
    raw.parse()
        .map_err(|_| Error::InvalidParameters(format!("could not read \"{raw}\" as a month")))
}

fn required_month_key(params: &LedgerParams) -> Result<MonthKey, Error> {
    let year = non_empty(&params.year)
        .ok_or_else(|| Error::InvalidParameters("year is required".to_owned()))?;
    let month = non_empty(&params.month)
        .ok_or_else(|| Error::InvalidParameters("month is required".to_owned()))?;

    MonthKey::new(parse_year(year)?, parse_month_number(month)?)
}

fn month_key_defaulting_to_today(
    params: &LedgerParams,
    local_timezone: &str,
) -> Result<MonthKey, Error> {
    if let (Some(year), Some(month)) = (non_empty(&params.year), non_empty(&params.month)) {
        return MonthKey::new(parse_year(year)?, parse_month_number(month)?);
    }

    let today = today_in_timezone(local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(local_timezone.to_owned()))?;

    let year = match non_empty(&params.year) {
        Some(raw) => parse_year(raw)?,
        None => today.year(),
    };
    let month_number = match non_empty(&params.month) {
        Some(raw) => parse_month_number(raw)?,
        None => u8::from(today.month()),
    };

    MonthKey::new(year, month_number)
}

fn required_sheet_name(params: &LedgerParams) -> Result<String, Error> {
    non_empty(&params.sheet_name)
        .map(ToOwned::to_owned)
        .ok_or_else(|| Error::InvalidParameters("sheetName is required".to_owned()))
}

fn required_row(params: &LedgerParams) -> Result<i64, Error> {
    let raw = non_empty(&params.row)
        .ok_or_else(|| Error::InvalidParameters("row is required".to_owned()))?;

    raw.parse()
        .map_err(|_| Error::InvalidParameters(format!("could not read \"{raw}\" as a row index")))
}

// ============================================================================
// TESTS
// ============================================================================
