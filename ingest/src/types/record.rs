use std::collections::HashMap;

use crate::types::Cell;

/// A single customer record, mapping physical field names to [`Cell`] values.
///
/// [`Record`] is schemaless: the set of fields is whatever the data source
/// supplied, and field access during processing goes through the role
/// indirection of [`crate::schema::FieldMapping`] rather than hardcoded
/// names. Derived columns are written back onto the record through
/// [`Record::set`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: HashMap<String, Cell>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Creates a record from an iterator of field name and value pairs.
    pub fn from_fields<I, N>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Cell)>,
        N: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, cell)| (name.into(), cell))
                .collect(),
        }
    }

    /// Returns the value of the given field, if present.
    pub fn get(&self, field: &str) -> Option<&Cell> {
        self.fields.get(field)
    }

    /// Sets the value of the given field, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Cell) {
        self.fields.insert(field.into(), value);
    }

    /// Removes the given field from the record, returning its previous value.
    pub fn remove(&mut self, field: &str) -> Option<Cell> {
        self.fields.remove(field)
    }

    /// Returns whether the record carries the given field.
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the number of fields on the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns an iterator over the record's fields in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.fields.iter().map(|(name, cell)| (name.as_str(), cell))
    }
}

impl<N> FromIterator<(N, Cell)> for Record
where
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, Cell)>>(iter: I) -> Self {
        Self::from_fields(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_existing_value() {
        let mut record = Record::from_fields([("Country", Cell::from("USA"))]);
        record.set("Country", Cell::from("IND"));

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("Country"), Some(&Cell::from("IND")));
    }

    #[test]
    fn get_distinguishes_absent_from_null() {
        let record = Record::from_fields([("Is_Active", Cell::Null)]);

        assert_eq!(record.get("Is_Active"), Some(&Cell::Null));
        assert_eq!(record.get("Country"), None);
    }
}
