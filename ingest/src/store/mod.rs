//! The authoritative in-memory store of surviving records per country.

mod key;
mod partition;

pub use key::*;
pub use partition::*;
