//! Sources that produce the raw record batches the pipeline consumes.

mod base;
pub mod memory;

pub use base::*;
