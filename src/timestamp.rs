//! Parsing and rendering of entry timestamps.
//!
//! Timestamps are stored and displayed in the fixed `dd/MM/yyyy HH:mm:ss`
//! layout. Client input is accepted either in exactly that layout or in a few
//! common ISO 8601 shapes which get re-rendered into it.

use time::{
    Date, Month, OffsetDateTime, PrimitiveDateTime, Time,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

/// The layout timestamps are stored and reported in.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day]/[month]/[year] [hour]:[minute]:[second]");

/// Parse a client supplied timestamp.
///
/// Input shaped like the canonical `dd/MM/yyyy HH:mm:ss` layout is parsed
/// strictly: a string with that shape but impossible field values such as
/// `"31/02/2024 00:00:00"` is an error rather than a candidate for the other
/// formats. Anything else is tried as RFC 3339, then `yyyy-MM-ddTHH:mm:ss`,
/// `yyyy-MM-dd HH:mm:ss` and bare `yyyy-MM-dd` (taken as midnight). The UTC
/// offset on RFC 3339 input is dropped and the wall clock time kept as
/// written.
///
/// # Errors
/// Returns [Error::InvalidTimestamp] if `raw` matches none of the accepted
/// formats.
pub fn parse_timestamp(raw: &str) -> Result<PrimitiveDateTime, Error> {
    let trimmed = raw.trim();

    if let Some((day, month, year, hour, minute, second)) = sscanf::sscanf!(
        trimmed,
        "{u8:/[0-9][0-9]/}/{u8:/[0-9][0-9]/}/{i32:/[0-9][0-9][0-9][0-9]/} {u8:/[0-9][0-9]/}:{u8:/[0-9][0-9]/}:{u8:/[0-9][0-9]/}"
    ) {
        let month =
            Month::try_from(month).map_err(|_| Error::InvalidTimestamp(raw.to_owned()))?;
        let date = Date::from_calendar_date(year, month, day)
            .map_err(|_| Error::InvalidTimestamp(raw.to_owned()))?;
        let time = Time::from_hms(hour, minute, second)
            .map_err(|_| Error::InvalidTimestamp(raw.to_owned()))?;

        return Ok(PrimitiveDateTime::new(date, time));
    }

    if let Ok(date_time) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(PrimitiveDateTime::new(date_time.date(), date_time.time()));
    }

    const ISO_DATE_TIME: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    const ISO_DATE_TIME_SPACED: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    const ISO_DATE: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    if let Ok(date_time) = PrimitiveDateTime::parse(trimmed, &ISO_DATE_TIME) {
        return Ok(date_time);
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(trimmed, &ISO_DATE_TIME_SPACED) {
        return Ok(date_time);
    }

    if let Ok(date) = Date::parse(trimmed, &ISO_DATE) {
        return Ok(date.midnight());
    }

    Err(Error::InvalidTimestamp(raw.to_owned()))
}

/// Render a timestamp in the canonical `dd/MM/yyyy HH:mm:ss` layout.
pub fn format_timestamp(date_time: PrimitiveDateTime) -> String {
    date_time
        .format(&TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| date_time.to_string())
}

/// A calendar month, the granularity entries are partitioned at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthKey {
    /// The calendar year.
    pub year: i32,
    /// The month within the year.
    pub month: Month,
}

impl MonthKey {
    /// Create a month key from a year and a one-based month number.
    ///
    /// # Errors
    /// Returns [Error::InvalidParameters] if `month_number` is not in `1..=12`.
    pub fn new(year: i32, month_number: u8) -> Result<Self, Error> {
        let month = Month::try_from(month_number).map_err(|_| {
            Error::InvalidParameters(format!("{month_number} is not a month number"))
        })?;

        Ok(Self { year, month })
    }

    /// The month key of the month `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month key of the month `date_time` falls in.
    pub fn from_date_time(date_time: PrimitiveDateTime) -> Self {
        Self::from_date(date_time.date())
    }

    /// The display label of the month, e.g. `"March 2024"`.
    ///
    /// Partitions are named with this label.
    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}


#[cfg(test)]
mod format_timestamp_tests {
    use time::macros::datetime;

    use super::{format_timestamp, parse_timestamp};

    #[test]
    fn renders_canonical_layout() {
        assert_eq!(
            format_timestamp(datetime!(2024-03-05 14:30:00)),
            "05/03/2024 14:30:00"
        );
    }

    #[test]
    fn rendering_then_parsing_is_lossless() {
        let date_time = datetime!(2021-12-31 23:59:59);

        assert_eq!(parse_timestamp(&format_timestamp(date_time)), Ok(date_time));
    }
}
