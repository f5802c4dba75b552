use std::collections::VecDeque;

use crate::error::IngestResult;
use crate::source::RecordSource;
use crate::types::Record;

/// In-memory source for testing and development purposes.
///
/// [`MemorySource`] serves pre-staged batches in order and returns empty
/// batches once exhausted.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    batches: VecDeque<Vec<Record>>,
}

impl MemorySource {
    /// Creates a source serving a single batch.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            batches: VecDeque::from([records]),
        }
    }

    /// Creates a source with no staged batches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stages an additional batch behind the already staged ones.
    pub fn push_batch(&mut self, records: Vec<Record>) {
        self.batches.push_back(records);
    }
}

impl RecordSource for MemorySource {
    fn name() -> &'static str {
        "memory"
    }

    fn fetch(&mut self) -> IngestResult<Vec<Record>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
