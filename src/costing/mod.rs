pub mod calculations;
pub mod calculator;
pub mod editor;

pub use calculations::{
    compute_cost, compute_margin, food_cost_percent, profit_per_unit, ProfitabilityCategory,
};
pub use calculator::{CostCalculator, CostSummary, CostingConfig};
pub use editor::RecipeEditor;
