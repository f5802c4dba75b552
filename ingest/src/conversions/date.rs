//! Parsing of the date representations used by customer data sources.
//!
//! Staging feeds serialize dates as compact `YYYYMMDD` strings; ISO
//! `YYYY-MM-DD` is accepted as well.

use chrono::NaiveDate;
use thiserror::Error;

use crate::bail;
use crate::error::{ErrorKind, IngestResult};
use crate::types::Cell;

/// The compact date format used by staging feeds.
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// The ISO date format accepted as an alternative.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Error returned when a string cannot be interpreted as a date.
#[derive(Debug, Error)]
pub enum ParseDateError {
    /// The value matched neither the compact nor the ISO date format.
    #[error("invalid date value (expected YYYYMMDD or YYYY-MM-DD): {0}")]
    InvalidFormat(String),
}

/// Parses a date from its compact `YYYYMMDD` or ISO `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseDateError> {
    NaiveDate::parse_from_str(value, COMPACT_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, ISO_DATE_FORMAT))
        .map_err(|_| ParseDateError::InvalidFormat(value.to_string()))
}

/// Interprets a cell as a calendar date.
///
/// [`Cell::Date`] values are returned as-is and [`Cell::String`] values are
/// parsed via [`parse_date`]. Any other cell fails with
/// [`ErrorKind::InvalidData`].
pub fn cell_date(cell: &Cell) -> IngestResult<NaiveDate> {
    match cell {
        Cell::Date(date) => Ok(*date),
        Cell::String(value) => Ok(parse_date(value)?),
        other => bail!(
            ErrorKind::InvalidData,
            "Cell cannot be interpreted as a date",
            format!("expected a date or a date string, got '{other}'")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn parses_compact_dates() {
        assert_eq!(parse_date("20121013").unwrap(), date(2012, 10, 13));
        assert_eq!(parse_date("19870306").unwrap(), date(1987, 3, 6));
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-10-11").unwrap(), date(2024, 10, 11));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date("not-a-date").is_err());
        assert!(parse_date("20121345").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn cell_date_reads_date_and_string_cells() {
        assert_eq!(
            cell_date(&Cell::Date(date(2012, 10, 13))).unwrap(),
            date(2012, 10, 13)
        );
        assert_eq!(cell_date(&Cell::from("20121013")).unwrap(), date(2012, 10, 13));
    }

    #[test]
    fn cell_date_classifies_failures() {
        let invalid_format = cell_date(&Cell::from("garbage")).unwrap_err();
        assert_eq!(invalid_format.kind(), ErrorKind::InvalidDateFormat);

        let invalid_data = cell_date(&Cell::I64(20121013)).unwrap_err();
        assert_eq!(invalid_data.kind(), ErrorKind::InvalidData);
    }
}
