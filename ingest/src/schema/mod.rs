//! Schema indirection between logical roles and physical field names.

mod mapping;

pub use mapping::*;
