use serde::Serialize;

use crate::models::IngredientLine;
use crate::units::constants::{MARGIN_AVERAGE, MARGIN_EXCELLENT, MARGIN_GOOD};

/// Total ingredient cost: sum of `quantity * cost_per_unit`.
///
/// Lines with no cost are counted as 0.
pub fn compute_cost(ingredients: &[IngredientLine]) -> f64 {
    ingredients.iter().map(IngredientLine::subtotal).sum()
}

/// Profit margin percent of `price` over `cost`.
///
/// Returns 0 when `price <= 0`. Negative values mean the cost exceeds the price.
pub fn compute_margin(price: f64, cost: f64) -> f64 {
    if price <= 0.0 {
        return 0.0;
    }
    (price - cost) / price * 100.0
}

/// Share of the price spent on ingredients, in percent.
pub fn food_cost_percent(price: f64, cost: f64) -> f64 {
    if price <= 0.0 {
        return 0.0;
    }
    cost / price * 100.0
}

/// Money left per portion after ingredient cost.
#[inline]
pub fn profit_per_unit(price: f64, cost: f64) -> f64 {
    price - cost
}

/// Coarse profitability band for a margin percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfitabilityCategory {
    Excellent,
    Good,
    Average,
    Low,
}

impl ProfitabilityCategory {
    pub fn from_margin(margin_percent: f64) -> Self {
        if margin_percent >= MARGIN_EXCELLENT {
            Self::Excellent
        } else if margin_percent >= MARGIN_GOOD {
            Self::Good
        } else if margin_percent >= MARGIN_AVERAGE {
            Self::Average
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for ProfitabilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
