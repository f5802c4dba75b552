//! Derived columns computed from existing record fields.
//!
//! A [`DerivedColumns`] registry holds an ordered list of named computations
//! that are applied to every record surviving the merge. Computations run in
//! declaration order, so a later column may read the output of an earlier
//! one, never the other way around. All built-in computations take an
//! injectable reference date instead of reading the wall clock, which keeps
//! results deterministic.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::conversions::date::cell_date;
use crate::error::IngestResult;
use crate::schema::{FieldMapping, Role};
use crate::types::{Cell, Record};

/// Default output field name of the age column.
pub const AGE_COLUMN: &str = "Age";

/// Default output field name of the consultation-recency column.
pub const DAYS_SINCE_LAST_CONSULTED_COLUMN: &str = "Days_Since_Last_Consulted";

/// A computation producing a derived cell from a read-only view of a record.
pub type ComputeFn = Arc<dyn Fn(&Record) -> IngestResult<Cell> + Send + Sync>;

/// A named derived column: an output field name paired with a pure computation.
#[derive(Clone)]
pub struct DerivedColumn {
    name: String,
    compute: ComputeFn,
}

impl DerivedColumn {
    /// Creates a new derived column from an output name and a computation.
    pub fn new<F>(name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&Record) -> IngestResult<Cell> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            compute: Arc::new(compute),
        }
    }

    /// Returns the output field name of this column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the computation against a record.
    pub fn compute(&self, record: &Record) -> IngestResult<Cell> {
        (self.compute)(record)
    }
}

impl fmt::Debug for DerivedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedColumn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered registry of [`DerivedColumn`]s.
#[derive(Debug, Clone, Default)]
pub struct DerivedColumns {
    columns: Vec<DerivedColumn>,
}

impl DerivedColumns {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Appends a column to the registry, returning the modified registry.
    pub fn with_column(mut self, column: DerivedColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a column to the registry.
    pub fn push(&mut self, column: DerivedColumn) {
        self.columns.push(column);
    }

    /// Returns the output field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(DerivedColumn::name)
    }

    /// Returns the number of registered columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns whether the registry has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Applies every registered column to a record, in declaration order.
    ///
    /// The first failing computation aborts derived-field application for this
    /// record and leaves later columns unwritten; earlier outputs stay on the
    /// record. Callers isolate such failures at record granularity.
    pub fn apply_all(&self, record: &mut Record) -> IngestResult<()> {
        for column in &self.columns {
            let value = column.compute(record)?;
            record.set(column.name.clone(), value);
        }

        Ok(())
    }
}

/// Whole calendar years between a reference date and a date of birth.
///
/// Calendar-aware: the result is decremented by one when the birthday has not
/// yet occurred in the reference year. Negative when the date of birth lies
/// after the reference date.
pub fn calculate_age(reference: NaiveDate, date_of_birth: NaiveDate) -> i32 {
    let mut age = reference.year() - date_of_birth.year();
    if (reference.month(), reference.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }

    age
}

/// Whole days of `reference - date`, negative for dates in the future.
pub fn days_since(reference: NaiveDate, date: NaiveDate) -> i64 {
    (reference - date).num_days()
}

/// Builds the standard age column reading [`Role::DateOfBirth`].
pub fn age_column(
    name: impl Into<String>,
    mapping: &FieldMapping,
    reference: NaiveDate,
) -> DerivedColumn {
    let mapping = mapping.clone();

    DerivedColumn::new(name, move |record| {
        let date_of_birth = cell_date(mapping.cell_for(record, Role::DateOfBirth)?)?;

        Ok(Cell::I32(calculate_age(reference, date_of_birth)))
    })
}

/// Builds the standard consultation-recency column reading [`Role::LastConsultedDate`].
pub fn days_since_last_consulted_column(
    name: impl Into<String>,
    mapping: &FieldMapping,
    reference: NaiveDate,
) -> DerivedColumn {
    let mapping = mapping.clone();

    DerivedColumn::new(name, move |record| {
        let consulted = cell_date(mapping.cell_for(record, Role::LastConsultedDate)?)?;

        Ok(Cell::I64(days_since(reference, consulted)))
    })
}
