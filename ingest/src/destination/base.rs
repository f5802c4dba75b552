use crate::error::IngestResult;
use crate::types::Record;

/// Trait for systems that persist the per-country tables produced by a batch.
///
/// [`PartitionDestination`] implementations define how surviving, augmented
/// records are written to target systems (for example, one persisted table
/// per country). The pipeline hands over a full snapshot of a partition after
/// the batch completed, so implementations should replace the partition's
/// previous contents rather than append to them; repeated delivery of the
/// same snapshot must stay idempotent.
///
/// The core never performs I/O itself; all persistence concerns live behind
/// this trait.
pub trait PartitionDestination {
    /// Returns the name of the destination.
    fn name() -> &'static str
    where
        Self: Sized;

    /// Writes the current records of one country partition.
    ///
    /// Records arrive in per-partition insertion order with derived columns
    /// applied.
    fn write_partition(&self, country: &str, records: &[Record]) -> IngestResult<()>;
}
