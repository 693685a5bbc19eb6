pub mod output;

use serde::Serialize;

use crate::costing::{CostSummary, CostingConfig};
use crate::error::Result;
use crate::state::KitchenStateManager;

/// One menu item's line in the cost report.
#[derive(Debug, Clone, Serialize)]
pub struct MenuCostRow {
    pub name: String,
    pub category: String,
    pub ingredient_count: usize,
    pub servings_available: Option<u64>,
    pub summary: CostSummary,
}

/// Cost every menu item against current inventory, sorted by name.
pub fn build_cost_report(
    manager: &KitchenStateManager,
    config: &CostingConfig,
) -> Result<Vec<MenuCostRow>> {
    manager
        .menu_items()
        .into_iter()
        .map(|item| -> Result<MenuCostRow> {
            Ok(MenuCostRow {
                name: item.name.clone(),
                category: item.category.clone(),
                ingredient_count: item.ingredients.len(),
                servings_available: manager.servings_available(item),
                summary: manager.summarize(item, config.clone())?.summary,
            })
        })
        .collect()
}

pub use output::write_csv;
