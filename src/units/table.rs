use std::cell::RefCell;

use tracing::{debug, warn};

use crate::error::{CostError, Result};
use crate::models::UnitConversion;

/// Ordered set of unit conversions with lookups in either direction.
///
/// At most one entry exists per ordered `(from_unit, to_unit)` pair, every factor is
/// positive and finite, and no entry maps a unit to itself.
#[derive(Debug, Clone, Default)]
pub struct ConversionTable {
    entries: Vec<UnitConversion>,
    /// Pairs that `convert` could not resolve, in first-seen order.
    unresolved: RefCell<Vec<(String, String)>>,
}

impl ConversionTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table containing only the given seed entries.
    pub fn seeded(seed: &[UnitConversion]) -> Self {
        Self::from_entries(seed, &[])
    }

    /// Seed entries merged with user entries.
    ///
    /// Invalid or duplicate entries are skipped with a warning; the first entry for a
    /// pair wins, so seed entries are never overridden by accident.
    pub fn from_entries(seed: &[UnitConversion], entries: &[UnitConversion]) -> Self {
        let mut table = Self::new();
        for entry in seed.iter().chain(entries) {
            if let Err(e) = table.add_conversion(entry.clone()) {
                warn!(conversion = %entry, error = %e, "skipping conversion entry");
            }
        }
        table
    }

    /// Convert `quantity` from one unit to another.
    ///
    /// Unknown pairs pass the quantity through unchanged. The pair is recorded in
    /// [`ConversionTable::unresolved`] and logged the first time it is seen.
    pub fn convert(&self, quantity: f64, from_unit: &str, to_unit: &str) -> f64 {
        match self.resolve(from_unit, to_unit) {
            Some(multiplier) => quantity * multiplier,
            None => {
                self.pass_through(from_unit, to_unit);
                quantity
            }
        }
    }

    /// Record an unknown pair as costed without conversion.
    pub(crate) fn pass_through(&self, from_unit: &str, to_unit: &str) {
        if self.record_unresolved(from_unit, to_unit) {
            warn!(
                from = from_unit,
                to = to_unit,
                "no conversion registered, using quantity unchanged"
            );
        }
    }

    /// Convert `quantity`, failing when the pair is unknown.
    pub fn convert_strict(&self, quantity: f64, from_unit: &str, to_unit: &str) -> Result<f64> {
        self.resolve(from_unit, to_unit)
            .map(|multiplier| quantity * multiplier)
            .ok_or_else(|| CostError::UnresolvedConversion {
                from: from_unit.to_string(),
                to: to_unit.to_string(),
            })
    }

    /// Effective multiplier from `from_unit` to `to_unit`, if known.
    ///
    /// A direct entry wins over an inverse one.
    pub fn resolve(&self, from_unit: &str, to_unit: &str) -> Option<f64> {
        if from_unit == to_unit {
            return Some(1.0);
        }
        if let Some(direct) = self.find(from_unit, to_unit) {
            return Some(direct.factor);
        }
        self.find(to_unit, from_unit).map(|inverse| 1.0 / inverse.factor)
    }

    /// Register a new conversion.
    ///
    /// Rejects identical units, non-positive factors, and pairs that already exist.
    /// The table is left unchanged on error.
    pub fn add_conversion(&mut self, entry: UnitConversion) -> Result<()> {
        if let Some(reason) = entry.validation_error() {
            return Err(CostError::Validation(reason));
        }
        if self.find(&entry.from_unit, &entry.to_unit).is_some() {
            return Err(CostError::Validation(format!(
                "Conversion from {} to {} already exists",
                entry.from_unit, entry.to_unit
            )));
        }

        debug!(conversion = %entry, "conversion added");
        self.entries.push(entry);
        Ok(())
    }

    /// Remove the conversion at `index`.
    pub fn remove_conversion(&mut self, index: usize) -> Result<UnitConversion> {
        if index >= self.entries.len() {
            return Err(CostError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        debug!(conversion = %removed, "conversion removed");
        Ok(removed)
    }

    /// Registered entries in insertion order.
    pub fn entries(&self) -> &[UnitConversion] {
        &self.entries
    }

    /// Pairs that `convert` passed through unchanged since the last clear.
    pub fn unresolved(&self) -> Vec<(String, String)> {
        self.unresolved.borrow().clone()
    }

    /// Forget previously recorded unresolved pairs.
    pub fn clear_unresolved(&self) {
        self.unresolved.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, from_unit: &str, to_unit: &str) -> Option<&UnitConversion> {
        self.entries.iter().find(|c| c.matches(from_unit, to_unit))
    }

    /// Returns true if the pair was not recorded before.
    fn record_unresolved(&self, from_unit: &str, to_unit: &str) -> bool {
        let mut unresolved = self.unresolved.borrow_mut();
        if unresolved
            .iter()
            .any(|(f, t)| f == from_unit && t == to_unit)
        {
            return false;
        }
        unresolved.push((from_unit.to_string(), to_unit.to_string()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::constants::default_conversions;

    fn default_table() -> ConversionTable {
        ConversionTable::seeded(&default_conversions())
    }

    #[test]
    fn test_identity_conversion() {
        let table = ConversionTable::new();
        assert_eq!(table.convert(3.5, "box", "box"), 3.5);
        assert!(table.unresolved().is_empty());
    }

    #[test]
    fn test_direct_and_inverse() {
        let table = default_table();
        assert!((table.convert(2.0, "kg", "g") - 2000.0).abs() < 1e-9);
        assert!((table.convert(500.0, "g", "kg") - 0.5).abs() < 1e-9);
        assert!((table.convert(3.0, "dozen", "pcs") - 36.0).abs() < 1e-9);
        assert!((table.convert(6.0, "pcs", "dozen") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_pair_passes_through_and_is_recorded() {
        let table = default_table();
        assert_eq!(table.convert(4.0, "kg", "ml"), 4.0);
        assert_eq!(table.convert(1.0, "kg", "ml"), 1.0);
        assert_eq!(
            table.unresolved(),
            vec![("kg".to_string(), "ml".to_string())]
        );

        table.clear_unresolved();
        assert!(table.unresolved().is_empty());
    }

    #[test]
    fn test_unresolved_pair_recorded_once() {
        let table = default_table();
        assert!(table.record_unresolved("jar", "g"));
        assert!(!table.record_unresolved("jar", "g"));
        assert!(table.record_unresolved("g", "jar"));

        for _ in 0..3 {
            table.convert(2.0, "jar", "g");
        }
        assert_eq!(table.unresolved().len(), 2);

        table.clear_unresolved();
        assert!(table.record_unresolved("jar", "g"));
    }

    #[test]
    fn test_convert_strict_errors_on_unknown_pair() {
        let table = default_table();
        assert!(table.convert_strict(1.0, "L", "ml").is_ok());
        match table.convert_strict(1.0, "jar", "g") {
            Err(CostError::UnresolvedConversion { from, to }) => {
                assert_eq!(from, "jar");
                assert_eq!(to, "g");
            }
            other => panic!("expected UnresolvedConversion, got {:?}", other),
        }
    }

    #[test]
    fn test_add_rejects_invalid_entries() {
        let mut table = default_table();
        let before = table.len();

        assert!(table
            .add_conversion(UnitConversion::new("kg", "kg", 1.0))
            .is_err());
        assert!(table
            .add_conversion(UnitConversion::new("box", "pcs", 0.0))
            .is_err());
        assert!(table
            .add_conversion(UnitConversion::new("box", "pcs", -2.0))
            .is_err());
        assert!(table
            .add_conversion(UnitConversion::new("kg", "g", 999.0))
            .is_err());

        assert_eq!(table.len(), before);
        assert!((table.convert(1.0, "kg", "g") - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_pair_is_a_distinct_entry() {
        let mut table = default_table();
        table
            .add_conversion(UnitConversion::new("g", "kg", 0.001))
            .unwrap();
        // Direct entry wins over the inverse of kg->g
        assert!((table.convert(250.0, "g", "kg") - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_remove_by_index() {
        let mut table = default_table();
        let removed = table.remove_conversion(0).unwrap();
        assert!(removed.matches("kg", "g"));
        assert_eq!(table.len(), 2);

        match table.remove_conversion(5) {
            Err(CostError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 5);
                assert_eq!(len, 2);
            }
            other => panic!("expected IndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_from_entries_skips_duplicates() {
        let user = vec![
            UnitConversion::new("kg", "g", 1.0),
            UnitConversion::new("box", "pcs", 24.0),
            UnitConversion::new("can", "can", 1.0),
        ];
        let table = ConversionTable::from_entries(&default_conversions(), &user);

        assert_eq!(table.len(), 4);
        assert!((table.convert(1.0, "kg", "g") - 1000.0).abs() < 1e-9);
        assert!((table.convert(2.0, "box", "pcs") - 48.0).abs() < 1e-9);
    }
}
