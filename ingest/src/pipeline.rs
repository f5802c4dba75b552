//! Batch orchestration: ingest, derive, and hand off to collaborators.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::conversions::date::cell_date;
use crate::derived::{
    AGE_COLUMN, DAYS_SINCE_LAST_CONSULTED_COLUMN, DerivedColumns, age_column, days_since,
    days_since_last_consulted_column,
};
use crate::destination::PartitionDestination;
use crate::error::{IngestError, IngestResult};
use crate::schema::{FieldMapping, Role};
use crate::source::RecordSource;
use crate::store::{IngestOutcome, PartitionStore};
use crate::types::Record;

/// A record that was skipped while loading a batch, with the reason.
///
/// Record-level failures never abort a batch; they are collected here so the
/// caller can report or reprocess them.
#[derive(Debug)]
pub enum SkippedRecord {
    /// The record was rejected during ingestion and never entered a partition.
    Ingest {
        /// Zero-based position of the record in the input batch.
        index: usize,
        /// Why the record was rejected.
        reason: IngestError,
    },
    /// Derived-field application failed for a surviving record, which keeps
    /// its source fields and any derived columns written before the failure.
    Derive {
        /// Country partition of the affected record.
        country: String,
        /// Zero-based position of the record within its partition.
        position: usize,
        /// Why derivation was aborted for the record.
        reason: IngestError,
    },
}

impl SkippedRecord {
    /// Returns the error that caused the record to be skipped.
    pub fn reason(&self) -> &IngestError {
        match self {
            SkippedRecord::Ingest { reason, .. } => reason,
            SkippedRecord::Derive { reason, .. } => reason,
        }
    }
}

/// Accounting for one [`IngestPipeline::load`] call.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Records inserted as the first occurrence of their customer.
    pub inserted: usize,
    /// Records that replaced an older record of the same customer.
    pub replaced: usize,
    /// Records discarded in favor of a record with a newer or equal
    /// consultation date.
    pub discarded: usize,
    /// Records skipped due to record-level errors, with reasons.
    pub skipped: Vec<SkippedRecord>,
}

impl BatchReport {
    /// Returns whether every record of the batch was processed without errors.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Returns the number of records that passed ingestion.
    pub fn merged(&self) -> usize {
        self.inserted + self.replaced + self.discarded
    }

    /// Folds all skip reasons into a single aggregated error.
    ///
    /// Returns [`None`] for a clean batch; a batch with exactly one skipped
    /// record yields that record's error directly. Useful for callers that
    /// treat any record-level failure as a batch failure.
    pub fn into_error(self) -> Option<IngestError> {
        if self.skipped.is_empty() {
            return None;
        }

        let reasons: Vec<IngestError> = self
            .skipped
            .into_iter()
            .map(|skipped| match skipped {
                SkippedRecord::Ingest { reason, .. } => reason,
                SkippedRecord::Derive { reason, .. } => reason,
            })
            .collect();

        Some(IngestError::from(reasons))
    }
}

/// Coordinates a batch pass: merge every record into the partition store,
/// then apply the derived columns to every survivor.
///
/// The pipeline is configured once with field mapping, derived columns, and
/// the reference date, then validated eagerly, so configuration errors
/// surface before the first record is touched. Repeated
/// [`IngestPipeline::load`] calls accumulate into the same store.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ingest::pipeline::IngestPipeline;
/// use ingest::schema::{FieldMapping, Role};
/// use ingest::types::{Cell, Record};
///
/// let mapping = FieldMapping::new()
///     .with_field(Role::CustomerId, "Customer_Id")
///     .with_field(Role::Country, "Country")
///     .with_field(Role::LastConsultedDate, "Last_Consulted_Date")
///     .with_field(Role::DateOfBirth, "DOB");
/// let reference = NaiveDate::from_ymd_opt(2024, 10, 11).unwrap();
///
/// let mut pipeline = IngestPipeline::with_standard_columns(mapping, reference).unwrap();
/// let report = pipeline.load([Record::from_fields([
///     ("Customer_Id", Cell::from("123457")),
///     ("Country", Cell::from("USA")),
///     ("Last_Consulted_Date", Cell::from("20121013")),
///     ("DOB", Cell::from("19870306")),
/// ])]);
///
/// assert_eq!(report.inserted, 1);
/// let (country, records) = pipeline.partitions().next().unwrap();
/// assert_eq!(country, "USA");
/// assert_eq!(records[0].get("Age"), Some(&Cell::I32(37)));
/// ```
#[derive(Debug)]
pub struct IngestPipeline {
    store: PartitionStore,
    derived: DerivedColumns,
    reference_date: NaiveDate,
}

impl IngestPipeline {
    /// Creates a pipeline from a field mapping, a derived-column registry, and
    /// the reference date used by date arithmetic.
    ///
    /// The mapping is validated eagerly; an unmapped required role fails here,
    /// before any ingestion can run.
    pub fn new(
        mapping: FieldMapping,
        derived: DerivedColumns,
        reference_date: NaiveDate,
    ) -> IngestResult<Self> {
        mapping.validate()?;

        info!(
            reference_date = %reference_date,
            derived_columns = derived.len(),
            "initializing ingest pipeline"
        );

        Ok(Self {
            store: PartitionStore::new(mapping),
            derived,
            reference_date,
        })
    }

    /// Creates a pipeline with the standard `Age` and
    /// `Days_Since_Last_Consulted` derived columns.
    ///
    /// Requires [`Role::DateOfBirth`] to be mapped in addition to the always
    /// required roles, since the age column reads it.
    pub fn with_standard_columns(
        mapping: FieldMapping,
        reference_date: NaiveDate,
    ) -> IngestResult<Self> {
        mapping.resolve(Role::DateOfBirth)?;

        let derived = DerivedColumns::new()
            .with_column(age_column(AGE_COLUMN, &mapping, reference_date))
            .with_column(days_since_last_consulted_column(
                DAYS_SINCE_LAST_CONSULTED_COLUMN,
                &mapping,
                reference_date,
            ));

        Self::new(mapping, derived, reference_date)
    }

    /// Returns the reference date used by date arithmetic.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Returns the underlying partition store.
    pub fn store(&self) -> &PartitionStore {
        &self.store
    }

    /// Loads one batch: merge every record in input order, then apply the
    /// derived columns to every surviving record.
    ///
    /// Record-level errors are isolated: a rejected record is collected in
    /// the report and the rest of the batch continues. Input order matters
    /// only for tie-breaking on equal consultation dates.
    pub fn load<I>(&mut self, records: I) -> BatchReport
    where
        I: IntoIterator<Item = Record>,
    {
        let mut report = BatchReport::default();

        for (index, record) in records.into_iter().enumerate() {
            match self.store.ingest(record) {
                Ok(IngestOutcome::Inserted) => report.inserted += 1,
                Ok(IngestOutcome::Replaced) => report.replaced += 1,
                Ok(IngestOutcome::Discarded) => report.discarded += 1,
                Err(reason) => {
                    warn!(index, error = %reason, "record rejected during ingestion");
                    report.skipped.push(SkippedRecord::Ingest { index, reason });
                }
            }
        }

        // Derivation runs after the whole batch merged, partition order then
        // per-partition insertion order.
        for (country, records) in self.store.partitions_mut() {
            for (position, record) in records.iter_mut().enumerate() {
                if let Err(reason) = self.derived.apply_all(record) {
                    warn!(
                        country,
                        position,
                        error = %reason,
                        "derived-field application skipped for record"
                    );
                    report.skipped.push(SkippedRecord::Derive {
                        country: country.to_string(),
                        position,
                        reason,
                    });
                }
            }
        }

        info!(
            inserted = report.inserted,
            replaced = report.replaced,
            discarded = report.discarded,
            skipped = report.skipped.len(),
            "batch loaded"
        );

        report
    }

    /// Fetches one batch from a source, loads it, and writes every resulting
    /// partition to a destination.
    pub fn run<S, D>(&mut self, source: &mut S, destination: &D) -> IngestResult<BatchReport>
    where
        S: RecordSource,
        D: PartitionDestination,
    {
        let batch = source.fetch()?;
        let report = self.load(batch);

        for (country, records) in self.store.partitions() {
            destination.write_partition(country, records)?;
        }

        Ok(report)
    }

    /// Returns a read-only snapshot of `(country, records)` pairs in stable
    /// country order.
    pub fn partitions(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.store.partitions()
    }

    /// Returns the surviving records whose last consultation is more than
    /// `threshold_days` days before the reference date.
    ///
    /// Pure read-only query over the final state; the store is not mutated.
    pub fn consulted_before(&self, threshold_days: i64) -> IngestResult<Vec<(&str, &Record)>> {
        let mut stale = Vec::new();

        for (country, records) in self.store.partitions() {
            for record in records {
                let consulted =
                    cell_date(self.store.mapping().cell_for(record, Role::LastConsultedDate)?)?;

                if days_since(self.reference_date, consulted) > threshold_days {
                    stale.push((country, record));
                }
            }
        }

        Ok(stale)
    }
}
