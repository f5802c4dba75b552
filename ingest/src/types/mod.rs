//! Common types used throughout the ingestion pipeline.
//!
//! Re-exports the cell and record types that every other module operates on.

mod cell;
mod record;

pub use cell::*;
pub use record::*;
