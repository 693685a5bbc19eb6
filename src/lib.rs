pub mod cli;
pub mod costing;
pub mod error;
pub mod interface;
pub mod models;
pub mod report;
pub mod state;
pub mod units;

pub use costing::{compute_cost, compute_margin, CostCalculator, CostSummary, CostingConfig};
pub use error::{CostError, Result};
pub use models::{IngredientLine, InventoryItem, MenuItem, UnitConversion};
pub use units::ConversionTable;
