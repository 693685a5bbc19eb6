use serde::{Deserialize, Serialize};

/// A registered conversion between two units.
///
/// Asserts that `1 from_unit == factor to_unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub from_unit: String,
    pub to_unit: String,
    pub factor: f64,
}

impl UnitConversion {
    pub fn new(from_unit: impl Into<String>, to_unit: impl Into<String>, factor: f64) -> Self {
        Self {
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            factor,
        }
    }

    /// True when this entry covers the ordered pair `(from, to)`.
    #[inline]
    pub fn matches(&self, from: &str, to: &str) -> bool {
        self.from_unit == from && self.to_unit == to
    }

    /// Checks the entry on its own, without looking at other entries.
    pub fn validation_error(&self) -> Option<String> {
        if self.from_unit.trim().is_empty() || self.to_unit.trim().is_empty() {
            return Some("Units must not be empty".to_string());
        }
        if self.from_unit == self.to_unit {
            return Some("From and To units must be different".to_string());
        }
        if !self.factor.is_finite() || self.factor <= 0.0 {
            return Some("Conversion factor must be greater than 0".to_string());
        }
        None
    }
}

impl std::fmt::Display for UnitConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "1 {} = {} {}", self.from_unit, self.factor, self.to_unit)
    }
}
