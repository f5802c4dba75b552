//! Conversions between source value representations and crate types.

pub mod date;
pub mod json;
