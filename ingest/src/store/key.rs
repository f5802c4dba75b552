//! Customer key used for merge lookups inside a partition.

use std::hash::{Hash, Hasher};

use crate::types::Cell;

/// The customer identifier cell of a record, usable as a map key.
///
/// Two records represent the same customer iff their keys are equal, scoped
/// within one country partition.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerKey {
    value: Cell,
}

// Manual Eq implementation since Cell does not derive Eq.
// Safe because the key never holds float cells.
impl Eq for CustomerKey {}

impl CustomerKey {
    /// Creates a new key from an identifier cell.
    pub fn new(value: Cell) -> Self {
        Self { value }
    }

    /// Returns the identifier cell of the key.
    pub fn value(&self) -> &Cell {
        &self.value
    }
}

impl Hash for CustomerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        cell_hash(&self.value, state);
    }
}

/// Hashes a [`Cell`] value in a deterministic way.
fn cell_hash<H: Hasher>(cell: &Cell, state: &mut H) {
    // Hash discriminant for type safety
    std::mem::discriminant(cell).hash(state);

    match cell {
        Cell::Null => {}
        Cell::Bool(v) => v.hash(state),
        Cell::I32(v) => v.hash(state),
        Cell::I64(v) => v.hash(state),
        Cell::String(v) => v.hash(state),
        Cell::Date(v) => v.hash(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_key(key: &CustomerKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equal_keys_hash_identically() {
        let a = CustomerKey::new(Cell::from("123457"));
        let b = CustomerKey::new(Cell::from("123457"));

        assert_eq!(a, b);
        assert_eq!(hash_key(&a), hash_key(&b));
    }

    #[test]
    fn different_values_produce_different_keys() {
        let a = CustomerKey::new(Cell::from("123457"));
        let b = CustomerKey::new(Cell::from("123458"));

        assert_ne!(a, b);
        assert_ne!(hash_key(&a), hash_key(&b));
    }

    #[test]
    fn discriminant_separates_cell_variants() {
        let text = CustomerKey::new(Cell::from("1256"));
        let number = CustomerKey::new(Cell::I64(1256));

        assert_ne!(text, number);
        assert_eq!(text.value(), &Cell::from("1256"));
        assert_eq!(number.value(), &Cell::I64(1256));
    }
}
