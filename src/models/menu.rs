use serde::{Deserialize, Serialize};

use crate::costing::CostCalculator;
use crate::error::Result;
use crate::models::InventoryItem;

/// A quantity of one inventory item consumed by a single portion of a menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientLine {
    pub inventory_item_id: String,

    /// Display copy of the inventory item's name.
    #[serde(default)]
    pub name: String,

    pub quantity: f64,

    pub unit: String,

    #[serde(default)]
    pub is_optional: bool,

    /// Missing when the inventory link is stale; costed as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<f64>,

    /// Unit `cost_per_unit` is priced in. Defaults to `unit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_unit: Option<String>,
}

impl IngredientLine {
    /// New line for an inventory item: one unit of the item's own unit.
    pub fn from_inventory(item: &InventoryItem) -> Self {
        Self {
            inventory_item_id: item.id.clone(),
            name: item.name.clone(),
            quantity: 1.0,
            unit: item.unit.clone(),
            is_optional: false,
            cost_per_unit: Some(item.cost_per_unit),
            cost_unit: Some(item.unit.clone()),
        }
    }

    /// Cost per unit, treating a missing value as 0.
    #[inline]
    pub fn unit_cost(&self) -> f64 {
        self.cost_per_unit.unwrap_or(0.0)
    }

    /// `quantity * cost_per_unit` with no unit conversion.
    #[inline]
    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_cost()
    }

    /// Unit the cost is priced in.
    pub fn pricing_unit(&self) -> &str {
        self.cost_unit.as_deref().unwrap_or(&self.unit)
    }

    /// Checks quantity and cost, without looking at inventory.
    pub fn validation_error(&self) -> Option<String> {
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Some(format!(
                "Quantity of {} must be greater than 0 (got {})",
                self.display_name(),
                self.quantity
            ));
        }
        if let Some(cost) = self.cost_per_unit {
            if !cost.is_finite() || cost < 0.0 {
                return Some(format!(
                    "Cost of {} must be 0 or more (got {})",
                    self.display_name(),
                    cost
                ));
            }
        }
        None
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.inventory_item_id
        } else {
            &self.name
        }
    }
}

/// A sellable dish and its recipe.
///
/// Cost and margin are methods, never stored fields, so they always reflect the
/// current price and ingredient list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub category: String,

    pub price: f64,

    #[serde(default = "default_available")]
    pub available: bool,

    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            price,
            available: true,
            ingredients: Vec::new(),
        }
    }

    /// Ingredient cost with each line converted into its pricing unit.
    pub fn cost_price(&self, calculator: &CostCalculator<'_>) -> Result<f64> {
        Ok(calculator.summarize(self.price, &self.ingredients)?.total_cost)
    }

    /// Margin of the current price over the converted ingredient cost.
    pub fn profit_margin_percent(&self, calculator: &CostCalculator<'_>) -> Result<f64> {
        Ok(calculator
            .summarize(self.price, &self.ingredients)?
            .margin_percent)
    }

    /// True if any line references the given inventory item.
    pub fn uses_inventory_item(&self, inventory_item_id: &str) -> bool {
        self.ingredients
            .iter()
            .any(|line| line.inventory_item_id == inventory_item_id)
    }

    /// Canonical key for name lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::CostingConfig;
    use crate::units::{default_conversions, ConversionTable};

    fn line(quantity: f64, cost: Option<f64>) -> IngredientLine {
        IngredientLine {
            inventory_item_id: "inv".to_string(),
            name: "Thing".to_string(),
            quantity,
            unit: "pcs".to_string(),
            is_optional: false,
            cost_per_unit: cost,
            cost_unit: None,
        }
    }

    #[test]
    fn test_derived_fields_follow_price_edits() {
        let table = ConversionTable::new();
        let calc = CostCalculator::new(&table, CostingConfig::default());
        let mut item = MenuItem::new("m1", "Toast", 10.0);
        item.ingredients = vec![line(2.0, Some(1.5)), line(1.0, Some(3.0))];

        assert!((item.cost_price(&calc).unwrap() - 6.0).abs() < 1e-9);
        assert!((item.profit_margin_percent(&calc).unwrap() - 40.0).abs() < 1e-9);

        item.price = 12.0;
        assert!((item.profit_margin_percent(&calc).unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_derived_fields_convert_into_pricing_unit() {
        let table = ConversionTable::seeded(&default_conversions());
        let calc = CostCalculator::new(&table, CostingConfig::default());
        let mut item = MenuItem::new("m1", "Pancakes", 9.0);
        // 200 g of flour priced at 2.0 per kg
        item.ingredients = vec![IngredientLine {
            unit: "g".to_string(),
            quantity: 200.0,
            cost_unit: Some("kg".to_string()),
            ..line(1.0, Some(2.0))
        }];

        let cost = item.cost_price(&calc).unwrap();
        assert!((cost - 0.4).abs() < 1e-9);

        let summary = calc.summarize(item.price, &item.ingredients).unwrap();
        assert!((item.profit_margin_percent(&calc).unwrap() - summary.margin_percent).abs() < 1e-9);
        assert!((summary.margin_percent - 95.555_555_555).abs() < 1e-6);
    }

    #[test]
    fn test_line_validation() {
        assert!(line(1.0, Some(0.0)).validation_error().is_none());
        assert!(line(1.0, None).validation_error().is_none());
        assert!(line(0.0, Some(1.0)).validation_error().is_some());
        assert!(line(-4.0, Some(1.0)).validation_error().is_some());
        assert!(line(f64::INFINITY, Some(1.0)).validation_error().is_some());
        assert!(line(1.0, Some(-0.25)).validation_error().is_some());
    }

    #[test]
    fn test_missing_cost_is_zero() {
        let l = line(4.0, None);
        assert_eq!(l.subtotal(), 0.0);
        assert_eq!(l.pricing_unit(), "pcs");
    }

    #[test]
    fn test_derived_fields_not_serialized() {
        let mut item = MenuItem::new("m1", "Toast", 10.0);
        item.ingredients.push(line(1.0, Some(2.0)));
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("cost_price"));
        assert!(!json.contains("margin"));
    }
}
