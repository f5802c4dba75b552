//! Country-partitioned ingestion of customer records.
//!
//! The crate consumes an in-memory batch of raw records, groups them into
//! per-country partitions, deduplicates them by customer identifier keeping
//! only the most recently consulted record, and augments the surviving
//! records with configurable derived columns such as age and days since last
//! consultation.
//!
//! Field access is indirect: callers configure a [`schema::FieldMapping`]
//! from logical roles (customer id, country, consultation date) to the
//! physical field names of their data source, so the same pipeline works
//! against differently named schemas. The batch entry point is
//! [`pipeline::IngestPipeline`].

pub mod conversions;
pub mod derived;
pub mod destination;
pub mod error;
mod macros;
pub mod pipeline;
pub mod schema;
pub mod source;
pub mod store;
pub mod types;
