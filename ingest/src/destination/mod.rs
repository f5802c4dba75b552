//! Destinations that receive the per-country tables produced by a batch.

mod base;
pub mod memory;

pub use base::*;
