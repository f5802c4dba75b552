use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::destination::PartitionDestination;
use crate::error::IngestResult;
use crate::types::Record;

#[derive(Debug, Default)]
struct Inner {
    tables: BTreeMap<String, Vec<Record>>,
}

/// In-memory destination for testing and development purposes.
///
/// [`MemoryDestination`] stores every written partition in memory, making it
/// ideal for verifying pipeline behavior in tests. All data is held in memory
/// and lost when the process terminates.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDestination {
    /// Creates a new empty memory destination.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Returns a copy of all per-country tables written to this destination.
    pub fn tables(&self) -> BTreeMap<String, Vec<Record>> {
        self.lock().tables.clone()
    }

    /// Returns a copy of the table written for one country, if any.
    pub fn table(&self, country: &str) -> Option<Vec<Record>> {
        self.lock().tables.get(country).cloned()
    }

    /// Clears all stored tables, for resetting state between tests.
    pub fn clear(&self) {
        self.lock().tables.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Recover the data on poisoning, a panicked writer cannot leave a
        // partially written table behind since inserts are single statements.
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl PartitionDestination for MemoryDestination {
    fn name() -> &'static str {
        "memory"
    }

    fn write_partition(&self, country: &str, records: &[Record]) -> IngestResult<()> {
        let mut inner = self.lock();
        info!(country, records = records.len(), "writing partition");
        inner.tables.insert(country.to_string(), records.to_vec());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn write_partition_replaces_previous_snapshot() {
        let destination = MemoryDestination::new();
        let first = vec![Record::from_fields([("Customer_Id", Cell::from("1"))])];
        let second = vec![
            Record::from_fields([("Customer_Id", Cell::from("1"))]),
            Record::from_fields([("Customer_Id", Cell::from("2"))]),
        ];

        destination.write_partition("USA", &first).unwrap();
        destination.write_partition("USA", &second).unwrap();

        assert_eq!(destination.table("USA").unwrap().len(), 2);
        assert_eq!(destination.tables().len(), 1);
    }

    #[test]
    fn clear_resets_state() {
        let destination = MemoryDestination::new();
        destination
            .write_partition("AU", &[Record::new()])
            .unwrap();

        destination.clear();

        assert!(destination.tables().is_empty());
    }
}
