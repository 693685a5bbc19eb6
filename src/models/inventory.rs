use serde::{Deserialize, Serialize};

use crate::models::UnitConversion;
use crate::units::constants::{default_conversions, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_UNIT};

/// A stocked ingredient that recipes draw from.
///
/// `cost_per_unit` is priced in `unit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,

    pub name: String,

    pub unit: String,

    #[serde(default)]
    pub cost_per_unit: f64,

    #[serde(default)]
    pub current_stock: f64,
}

impl InventoryItem {
    /// Non-negative cost and stock.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && self.cost_per_unit.is_finite()
            && self.cost_per_unit >= 0.0
            && self.current_stock.is_finite()
            && self.current_stock >= 0.0
    }

    /// Value of the stock on hand.
    #[inline]
    pub fn stock_value(&self) -> f64 {
        self.cost_per_unit * self.current_stock
    }

    /// Canonical key for name lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Restaurant-wide inventory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySettings {
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: f64,

    #[serde(default = "default_unit")]
    pub default_unit: String,

    /// Full conversion table; falls back to the seed dataset when missing.
    #[serde(default = "default_conversions")]
    pub unit_conversions: Vec<UnitConversion>,
}

fn default_low_stock_threshold() -> f64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            default_unit: default_unit(),
            unit_conversions: default_conversions(),
        }
    }
}
