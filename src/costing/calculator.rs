use serde::Serialize;

use crate::costing::calculations::{
    compute_margin, food_cost_percent, profit_per_unit, ProfitabilityCategory,
};
use crate::error::{CostError, Result};
use crate::models::IngredientLine;
use crate::units::ConversionTable;

/// Options for recipe costing.
#[derive(Debug, Clone, Default)]
pub struct CostingConfig {
    /// Fail on unknown unit pairs instead of costing the raw quantity.
    pub strict_units: bool,
}

/// Derived cost figures for one recipe at one price.
#[derive(Debug, Clone, Serialize)]
pub struct CostSummary {
    pub price: f64,
    pub total_cost: f64,
    /// Cost with optional lines left out.
    pub required_cost: f64,
    pub margin_percent: f64,
    pub food_cost_percent: f64,
    pub profit_per_unit: f64,
    pub category: ProfitabilityCategory,
    /// `(line unit, pricing unit)` pairs costed without a conversion.
    pub unresolved: Vec<(String, String)>,
}

impl CostSummary {
    pub fn has_unresolved_units(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

/// Costs ingredient lines, normalizing each quantity into the unit its cost is priced in.
pub struct CostCalculator<'a> {
    table: &'a ConversionTable,
    config: CostingConfig,
}

impl<'a> CostCalculator<'a> {
    pub fn new(table: &'a ConversionTable, config: CostingConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &ConversionTable {
        self.table
    }

    /// Line quantity expressed in the line's pricing unit.
    pub fn normalized_quantity(&self, line: &IngredientLine) -> Result<f64> {
        let to_unit = line.pricing_unit();
        if self.config.strict_units {
            self.table.convert_strict(line.quantity, &line.unit, to_unit)
        } else {
            Ok(self.table.convert(line.quantity, &line.unit, to_unit))
        }
    }

    /// Cost of one line after unit normalization.
    pub fn line_cost(&self, line: &IngredientLine) -> Result<f64> {
        Ok(self.normalized_quantity(line)? * line.unit_cost())
    }

    /// Total cost of all lines.
    pub fn total_cost(&self, ingredients: &[IngredientLine]) -> Result<f64> {
        ingredients.iter().map(|line| self.line_cost(line)).sum()
    }

    /// Full cost breakdown for a recipe sold at `price`.
    ///
    /// Fails with [`CostError::Validation`] on a line with a non-positive quantity or
    /// a negative cost.
    pub fn summarize(&self, price: f64, ingredients: &[IngredientLine]) -> Result<CostSummary> {
        let mut total_cost = 0.0;
        let mut required_cost = 0.0;
        let mut unresolved: Vec<(String, String)> = Vec::new();

        for line in ingredients {
            if let Some(reason) = line.validation_error() {
                return Err(CostError::Validation(reason));
            }

            let to_unit = line.pricing_unit();
            let quantity = match self.table.resolve(&line.unit, to_unit) {
                Some(multiplier) => line.quantity * multiplier,
                None if self.config.strict_units => {
                    return Err(CostError::UnresolvedConversion {
                        from: line.unit.clone(),
                        to: to_unit.to_string(),
                    });
                }
                None => {
                    self.table.pass_through(&line.unit, to_unit);
                    let pair = (line.unit.clone(), to_unit.to_string());
                    if !unresolved.contains(&pair) {
                        unresolved.push(pair);
                    }
                    line.quantity
                }
            };

            let cost = quantity * line.unit_cost();
            total_cost += cost;
            if !line.is_optional {
                required_cost += cost;
            }
        }

        let margin_percent = compute_margin(price, total_cost);

        Ok(CostSummary {
            price,
            total_cost,
            required_cost,
            margin_percent,
            food_cost_percent: food_cost_percent(price, total_cost),
            profit_per_unit: profit_per_unit(price, total_cost),
            category: ProfitabilityCategory::from_margin(margin_percent),
            unresolved,
        })
    }
}
