use crate::models::UnitConversion;

/// Seed conversion dataset: `(from_unit, to_unit, factor)`.
///
/// Immutable; user-added entries are merged on top of it by `ConversionTable`.
pub const DEFAULT_CONVERSIONS: &[(&str, &str, f64)] = &[
    ("kg", "g", 1000.0),
    ("L", "ml", 1000.0),
    ("dozen", "pcs", 12.0),
];

/// Units offered when picking a unit interactively.
pub const UNIT_OPTIONS: &[&str] = &[
    "kg", "g", "L", "ml", "pcs", "dozen", "box", "bottle", "jar", "can", "pack", "each",
];

/// Default stock unit for new inventory items.
pub const DEFAULT_UNIT: &str = "pcs";

/// Stock at or below this level is reported as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 10.0;

/// Absolute tolerance for float comparisons in reports.
pub const FLOAT_EPSILON: f64 = 1e-9;

// ─────────────────────────────────────────────────────────────────────────────
// Profitability bands (margin percent lower bounds)
// ─────────────────────────────────────────────────────────────────────────────

pub const MARGIN_EXCELLENT: f64 = 70.0;
pub const MARGIN_GOOD: f64 = 50.0;
pub const MARGIN_AVERAGE: f64 = 30.0;

/// Seed dataset as owned entries.
pub fn default_conversions() -> Vec<UnitConversion> {
    DEFAULT_CONVERSIONS
        .iter()
        .map(|&(from, to, factor)| UnitConversion::new(from, to, factor))
        .collect()
}
