use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, IngestResult};
use crate::ingest_error;
use crate::types::{Cell, Record};

/// Logical roles a field can play during ingestion, independent of the
/// physical field name used by a given data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The customer identifier, unique within a country partition.
    CustomerId,
    /// The country key records are partitioned by.
    Country,
    /// The consultation date the latest-wins merge compares.
    LastConsultedDate,
    /// The customer's date of birth, read by the age derived column.
    DateOfBirth,
}

impl Role {
    /// Roles that must be mapped before any ingestion can run.
    ///
    /// [`Role::DateOfBirth`] is optional; it only has to be mapped when a
    /// derived column reads it.
    pub const REQUIRED: [Role; 3] = [Role::CustomerId, Role::Country, Role::LastConsultedDate];

    /// Returns the snake_case name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CustomerId => "customer_id",
            Role::Country => "country",
            Role::LastConsultedDate => "last_consulted_date",
            Role::DateOfBirth => "date_of_birth",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from logical [`Role`]s to the physical field names of a data source.
///
/// The mapping is built once at configuration time, validated eagerly via
/// [`FieldMapping::validate`], and held immutably by the pipeline afterwards,
/// so it can be shared freely during processing.
///
/// # Examples
///
/// ```
/// use ingest::schema::{FieldMapping, Role};
///
/// let mapping = FieldMapping::new()
///     .with_field(Role::CustomerId, "Customer_Id")
///     .with_field(Role::Country, "Country")
///     .with_field(Role::LastConsultedDate, "Last_Consulted_Date")
///     .with_field(Role::DateOfBirth, "DOB");
///
/// assert!(mapping.validate().is_ok());
/// assert_eq!(mapping.resolve(Role::Country).unwrap(), "Country");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    fields: HashMap<Role, String>,
}

impl FieldMapping {
    /// Creates a new empty mapping.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Adds or overrides the physical field name for a role, returning the
    /// modified mapping.
    pub fn with_field(mut self, role: Role, field: impl Into<String>) -> Self {
        self.fields.insert(role, field.into());
        self
    }

    /// Returns the physical field name for a role, if one is configured.
    pub fn field(&self, role: Role) -> Option<&str> {
        self.fields.get(&role).map(String::as_str)
    }

    /// Resolves the physical field name for a role.
    ///
    /// Fails with [`ErrorKind::UnmappedRole`] when the role has no configured
    /// physical field name.
    pub fn resolve(&self, role: Role) -> IngestResult<&str> {
        self.field(role).ok_or_else(|| {
            ingest_error!(
                ErrorKind::UnmappedRole,
                "No physical field mapped for role",
                format!("role '{role}' has no configured physical field name")
            )
        })
    }

    /// Validates that every required role has a physical field name.
    ///
    /// Configuration errors surface here, before any record is processed.
    pub fn validate(&self) -> IngestResult<()> {
        for role in Role::REQUIRED {
            self.resolve(role)?;
        }

        Ok(())
    }

    /// Resolves a role and returns the corresponding cell of a record.
    ///
    /// Fails with [`ErrorKind::UnmappedRole`] when the role is not mapped and
    /// with [`ErrorKind::MissingField`] when the record lacks the mapped field.
    pub fn cell_for<'a>(&self, record: &'a Record, role: Role) -> IngestResult<&'a Cell> {
        let field = self.resolve(role)?;

        record.get(field).ok_or_else(|| {
            ingest_error!(
                ErrorKind::MissingField,
                "Record is missing a mapped field",
                format!("field '{field}' (role '{role}') is absent from the record")
            )
        })
    }
}
