//! Country partitions and the latest-wins merge.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::bail;
use crate::conversions::date::cell_date;
use crate::error::{ErrorKind, IngestResult};
use crate::schema::{FieldMapping, Role};
use crate::store::CustomerKey;
use crate::types::Record;

/// The effect a single [`PartitionStore::ingest`] call had on the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The customer was not yet present; the record was inserted.
    Inserted,
    /// A more recently consulted record replaced the existing one.
    Replaced,
    /// The incoming record was older than or as old as the existing one and
    /// was discarded.
    Discarded,
}

/// The surviving records of one country.
///
/// Customer identifiers are unique within a partition: the merge keeps a
/// key → row-slot index next to the rows so lookups stay O(1) and a
/// replacement lands in the slot of the record it replaced, preserving
/// insertion order.
#[derive(Debug, Default)]
pub struct Partition {
    rows: Vec<Record>,
    index: HashMap<CustomerKey, usize>,
}

impl Partition {
    /// Returns the surviving records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.rows
    }

    /// Returns the surviving record for a customer key, if any.
    pub fn get(&self, key: &CustomerKey) -> Option<&Record> {
        self.index.get(key).map(|slot| &self.rows[*slot])
    }

    /// Returns the number of surviving records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the partition holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The authoritative set of current records, grouped by country.
///
/// [`PartitionStore`] owns the latest-wins merge: for every
/// `(country, customer_id)` pair at most one record survives, and it is the
/// one with the greatest `last_consulted_date` seen so far. Ties favor the
/// already-stored record, so duplicate or out-of-order redelivery never
/// replaces anything.
#[derive(Debug)]
pub struct PartitionStore {
    mapping: FieldMapping,
    // BTreeMap keeps partition iteration in stable country order.
    partitions: BTreeMap<String, Partition>,
}

impl PartitionStore {
    /// Creates a new empty store resolving fields through the given mapping.
    pub fn new(mapping: FieldMapping) -> Self {
        Self {
            mapping,
            partitions: BTreeMap::new(),
        }
    }

    /// Returns the field mapping the store resolves roles through.
    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Merges one record into its country partition.
    ///
    /// The country, customer identifier, and consultation date are resolved
    /// and parsed before the store is touched, so a rejected record leaves
    /// prior state fully intact. Failure modes are
    /// [`ErrorKind::MissingField`] for an absent mapped field,
    /// [`ErrorKind::InvalidDateFormat`] for an unparseable consultation date,
    /// and [`ErrorKind::InvalidData`] for a null country or identifier.
    pub fn ingest(&mut self, record: Record) -> IngestResult<IngestOutcome> {
        let (country, key, consulted) = self.resolve(&record)?;

        let partition = self.partitions.entry(country).or_default();
        let outcome = match partition.index.get(&key).copied() {
            None => {
                partition.index.insert(key, partition.rows.len());
                partition.rows.push(record);

                IngestOutcome::Inserted
            }
            Some(slot) => {
                let existing = &partition.rows[slot];
                let existing_consulted =
                    cell_date(self.mapping.cell_for(existing, Role::LastConsultedDate)?)?;

                if consulted > existing_consulted {
                    partition.rows[slot] = record;

                    IngestOutcome::Replaced
                } else {
                    // Older or equal consultation date, the stored record stands.
                    IngestOutcome::Discarded
                }
            }
        };

        // One surviving record per customer key is the store's core invariant;
        // divergence here is a programming fault, not a data error.
        debug_assert_eq!(
            partition.rows.len(),
            partition.index.len(),
            "partition row and index counts diverged"
        );

        debug!(?outcome, "record merged into partition");

        Ok(outcome)
    }

    /// Resolves the partition key, customer key, and consultation date of a
    /// record without mutating the store.
    fn resolve(&self, record: &Record) -> IngestResult<(String, CustomerKey, NaiveDate)> {
        let country_cell = self.mapping.cell_for(record, Role::Country)?;
        if country_cell.is_null() {
            bail!(
                ErrorKind::InvalidData,
                "Country cell is null",
                "a record cannot be partitioned under a null country"
            );
        }
        let country = country_cell.to_string();

        let id_cell = self.mapping.cell_for(record, Role::CustomerId)?;
        if id_cell.is_null() {
            bail!(
                ErrorKind::InvalidData,
                "Customer identifier cell is null",
                format!("record for country '{country}' has a null customer identifier")
            );
        }
        let key = CustomerKey::new(id_cell.clone());

        let consulted = cell_date(self.mapping.cell_for(record, Role::LastConsultedDate)?)?;

        Ok((country, key, consulted))
    }

    /// Returns a read-only snapshot of `(country, records)` pairs in stable
    /// country order.
    ///
    /// The iterator is finite and restartable; re-iterating yields the same
    /// snapshot of the current state.
    pub fn partitions(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.partitions
            .iter()
            .map(|(country, partition)| (country.as_str(), partition.records()))
    }

    /// Returns mutable access to every partition's records, in stable country
    /// order, for in-place derived-field application.
    pub fn partitions_mut(&mut self) -> impl Iterator<Item = (&str, &mut [Record])> {
        self.partitions
            .iter_mut()
            .map(|(country, partition)| (country.as_str(), partition.rows.as_mut_slice()))
    }

    /// Returns the partition of a country, if any record survived for it.
    pub fn partition(&self, country: &str) -> Option<&Partition> {
        self.partitions.get(country)
    }

    /// Returns the number of partitions.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Returns the total number of surviving records across all partitions.
    pub fn len(&self) -> usize {
        self.partitions.values().map(Partition::len).sum()
    }

    /// Returns whether no record survived so far.
    pub fn is_empty(&self) -> bool {
        self.partitions.values().all(Partition::is_empty)
    }

    /// Consumes the store and returns the surviving records per country.
    pub fn into_partitions(self) -> BTreeMap<String, Vec<Record>> {
        self.partitions
            .into_iter()
            .map(|(country, partition)| (country, partition.rows))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn mapping() -> FieldMapping {
        FieldMapping::new()
            .with_field(Role::CustomerId, "Customer_Id")
            .with_field(Role::Country, "Country")
            .with_field(Role::LastConsultedDate, "Last_Consulted_Date")
    }

    fn record(id: &str, country: &str, consulted: &str) -> Record {
        Record::from_fields([
            ("Customer_Id", Cell::from(id)),
            ("Country", Cell::from(country)),
            ("Last_Consulted_Date", Cell::from(consulted)),
        ])
    }

    fn consulted_of(store: &PartitionStore, country: &str, id: &str) -> Cell {
        store
            .partition(country)
            .unwrap()
            .get(&CustomerKey::new(Cell::from(id)))
            .unwrap()
            .get("Last_Consulted_Date")
            .unwrap()
            .clone()
    }

    #[test]
    fn first_record_for_customer_is_inserted() {
        let mut store = PartitionStore::new(mapping());

        let outcome = store.ingest(record("123457", "USA", "20121013")).unwrap();

        assert_eq!(outcome, IngestOutcome::Inserted);
        assert_eq!(store.partition_count(), 1);
        assert_eq!(store.partition("USA").unwrap().len(), 1);
    }

    #[test]
    fn newer_consultation_replaces_existing_record() {
        let mut store = PartitionStore::new(mapping());
        store.ingest(record("123457", "USA", "20121013")).unwrap();

        let outcome = store.ingest(record("123457", "USA", "20131013")).unwrap();

        assert_eq!(outcome, IngestOutcome::Replaced);
        assert_eq!(store.partition("USA").unwrap().len(), 1);
        assert_eq!(
            consulted_of(&store, "USA", "123457"),
            Cell::from("20131013")
        );
    }

    #[test]
    fn older_consultation_is_discarded() {
        let mut store = PartitionStore::new(mapping());
        store.ingest(record("123457", "USA", "20121013")).unwrap();

        let outcome = store.ingest(record("123457", "USA", "20111012")).unwrap();

        assert_eq!(outcome, IngestOutcome::Discarded);
        assert_eq!(
            consulted_of(&store, "USA", "123457"),
            Cell::from("20121013")
        );
    }

    #[test]
    fn equal_consultation_date_keeps_existing_record() {
        let mut store = PartitionStore::new(mapping());
        let mut first = record("123457", "USA", "20121013");
        first.set("Marker", Cell::from("original"));
        store.ingest(first).unwrap();

        let outcome = store.ingest(record("123457", "USA", "20121013")).unwrap();

        assert_eq!(outcome, IngestOutcome::Discarded);
        let key = CustomerKey::new(Cell::from("123457"));
        let survivor = store.partition("USA").unwrap().get(&key).unwrap();
        assert_eq!(survivor.get("Marker"), Some(&Cell::from("original")));
    }

    #[test]
    fn same_customer_id_in_different_countries_does_not_collide() {
        let mut store = PartitionStore::new(mapping());
        store.ingest(record("123457", "USA", "20121013")).unwrap();
        store.ingest(record("123457", "IND", "20111012")).unwrap();

        assert_eq!(store.partition_count(), 2);
        assert_eq!(store.partition("USA").unwrap().len(), 1);
        assert_eq!(store.partition("IND").unwrap().len(), 1);
    }

    #[test]
    fn replacement_preserves_insertion_order() {
        let mut store = PartitionStore::new(mapping());
        store.ingest(record("1", "USA", "20121013")).unwrap();
        store.ingest(record("2", "USA", "20121013")).unwrap();
        store.ingest(record("1", "USA", "20131013")).unwrap();

        let records = store.partition("USA").unwrap().records();
        assert_eq!(records[0].get("Customer_Id"), Some(&Cell::from("1")));
        assert_eq!(records[1].get("Customer_Id"), Some(&Cell::from("2")));
    }

    #[test]
    fn no_partition_holds_duplicate_customer_ids() {
        let mut store = PartitionStore::new(mapping());
        for consulted in ["20121013", "20131013", "20111012", "20131013"] {
            store.ingest(record("123457", "USA", consulted)).unwrap();
        }

        let partition = store.partition("USA").unwrap();
        assert_eq!(partition.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_field_rejection_leaves_state_untouched() {
        let mut store = PartitionStore::new(mapping());
        store.ingest(record("123457", "USA", "20121013")).unwrap();

        let incomplete = Record::from_fields([
            ("Customer_Id", Cell::from("123458")),
            ("Last_Consulted_Date", Cell::from("20121013")),
        ]);
        let err = store.ingest(incomplete).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(store.len(), 1);
        assert_eq!(store.partition_count(), 1);
    }

    #[test]
    fn malformed_consultation_date_rejects_record() {
        let mut store = PartitionStore::new(mapping());

        let err = store
            .ingest(record("123457", "USA", "13-10-2012"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidDateFormat);
        assert!(store.is_empty());
    }

    #[test]
    fn null_country_is_rejected() {
        let mut store = PartitionStore::new(mapping());
        let mut record = record("123457", "USA", "20121013");
        record.set("Country", Cell::Null);

        let err = store.ingest(record).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(store.is_empty());
    }

    #[test]
    fn into_partitions_hands_over_surviving_records_per_country() {
        let mut store = PartitionStore::new(mapping());
        store.ingest(record("123457", "USA", "20121013")).unwrap();
        store.ingest(record("123457", "USA", "20131013")).unwrap();
        store.ingest(record("1256", "AU", "20121013")).unwrap();

        let partitions = store.into_partitions();

        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions["AU"].len(), 1);
        assert_eq!(partitions["USA"].len(), 1);
        assert_eq!(
            partitions["USA"][0].get("Last_Consulted_Date"),
            Some(&Cell::from("20131013"))
        );
    }

    #[test]
    fn partitions_iterates_in_country_order_and_restarts() {
        let mut store = PartitionStore::new(mapping());
        store.ingest(record("1", "USA", "20121013")).unwrap();
        store.ingest(record("2", "AU", "20121013")).unwrap();
        store.ingest(record("3", "IND", "20121013")).unwrap();

        let countries: Vec<&str> = store.partitions().map(|(country, _)| country).collect();
        assert_eq!(countries, ["AU", "IND", "USA"]);

        // Re-iterating yields the same snapshot.
        let again: Vec<&str> = store.partitions().map(|(country, _)| country).collect();
        assert_eq!(countries, again);
    }
}
