use std::fmt;

use chrono::NaiveDate;

/// A single field value of a [`crate::types::Record`].
///
/// [`Cell`] covers the value shapes produced by the supported data sources:
/// text, integers, booleans, and calendar dates. Dates delivered as compact
/// `YYYYMMDD` strings stay [`Cell::String`] until a consumer parses them via
/// [`crate::conversions::date::cell_date`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// An explicitly absent value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 32-bit signed integer value.
    I32(i32),
    /// A 64-bit signed integer value.
    I64(i64),
    /// A text value.
    String(String),
    /// A calendar date value.
    Date(NaiveDate),
}

impl Cell {
    /// Returns the contained text value, if this cell is a [`Cell::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the contained date value, if this cell is a [`Cell::Date`].
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns whether this cell is [`Cell::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "null"),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::I32(value) => write!(f, "{value}"),
            Cell::I64(value) => write!(f, "{value}"),
            Cell::String(value) => write!(f, "{value}"),
            Cell::Date(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::I32(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::I64(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::String(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::String(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_only_their_variant() {
        let date = NaiveDate::from_ymd_opt(2012, 10, 13).unwrap();

        assert_eq!(Cell::from(date).as_date(), Some(date));
        assert_eq!(Cell::from("20121013").as_date(), None);

        assert_eq!(Cell::from("USA").as_str(), Some("USA"));
        assert_eq!(Cell::I64(1256).as_str(), None);

        assert!(Cell::Null.is_null());
        assert!(!Cell::Bool(false).is_null());
    }
}
