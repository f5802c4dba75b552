use crate::error::IngestResult;
use crate::types::Record;

/// Trait for collaborators that supply raw record batches.
///
/// A [`RecordSource`] owns all staging and loading concerns; the pipeline
/// consumes plain in-memory records and never touches a connection or file
/// itself. The order of records within a batch is meaningful: it breaks ties
/// between records with equal consultation dates.
pub trait RecordSource {
    /// Returns the name of the source.
    fn name() -> &'static str
    where
        Self: Sized;

    /// Produces the next batch of raw records.
    ///
    /// An empty batch means the source is exhausted.
    fn fetch(&mut self) -> IngestResult<Vec<Record>>;
}
