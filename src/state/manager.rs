use serde::Serialize;
use tracing::{debug, info};

use crate::costing::{CostCalculator, CostSummary, CostingConfig};
use crate::error::{CostError, Result};
use crate::models::{InventoryItem, InventorySettings, MenuItem, UnitConversion};
use crate::state::persistence::KitchenState;
use crate::units::constants::FLOAT_EPSILON;
use crate::units::ConversionTable;

/// How much of one inventory item the whole menu uses per portion.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryUsage {
    pub inventory_item_id: String,
    pub name: String,
    pub unit: String,
    /// Names of menu items whose recipe uses this item.
    pub used_in: Vec<String>,
    /// One portion of each menu item, summed, in the inventory item's unit.
    pub total_quantity: f64,
}

/// A menu item with its ingredient costs refreshed from inventory, and its summary.
#[derive(Debug, Clone)]
pub struct CostedItem {
    pub item: MenuItem,
    pub summary: CostSummary,
    /// Lines whose inventory item no longer exists.
    pub stale: usize,
}

/// In-memory kitchen state: inventory, menu, and the conversion table.
pub struct KitchenStateManager {
    inventory: Vec<InventoryItem>,
    menu: Vec<MenuItem>,
    settings: InventorySettings,
    conversions: ConversionTable,
}

impl KitchenStateManager {
    /// Build a manager from loaded state.
    pub fn new(state: KitchenState) -> Self {
        let conversions = ConversionTable::from_entries(&state.settings.unit_conversions, &[]);
        let mut manager = Self {
            inventory: state.inventory,
            menu: state.menu,
            settings: state.settings,
            conversions,
        };
        // Invalid persisted entries were dropped by the table
        manager.sync_conversions();
        manager
    }

    pub fn settings(&self) -> &InventorySettings {
        &self.settings
    }

    pub fn conversions(&self) -> &ConversionTable {
        &self.conversions
    }

    /// Register a conversion and record it in the settings.
    pub fn add_conversion(&mut self, entry: UnitConversion) -> Result<()> {
        self.conversions.add_conversion(entry)?;
        self.sync_conversions();
        Ok(())
    }

    /// Remove a conversion by position and record it in the settings.
    pub fn remove_conversion(&mut self, index: usize) -> Result<UnitConversion> {
        let removed = self.conversions.remove_conversion(index)?;
        self.sync_conversions();
        Ok(removed)
    }

    /// Find an inventory item by id or case-insensitive name.
    pub fn get_inventory(&self, name_or_id: &str) -> Option<&InventoryItem> {
        let key = name_or_id.to_lowercase();
        self.inventory
            .iter()
            .find(|item| item.id == name_or_id)
            .or_else(|| self.inventory.iter().find(|item| item.key() == key))
    }

    /// Find a menu item by id or case-insensitive name.
    pub fn get_menu_item(&self, name_or_id: &str) -> Option<&MenuItem> {
        self.menu_index(name_or_id).map(|idx| &self.menu[idx])
    }

    /// All inventory items, sorted by name.
    pub fn inventory_items(&self) -> Vec<&InventoryItem> {
        let mut items: Vec<&InventoryItem> = self.inventory.iter().collect();
        items.sort_by_key(|item| item.key());
        items
    }

    /// All menu items, sorted by name.
    pub fn menu_items(&self) -> Vec<&MenuItem> {
        let mut items: Vec<&MenuItem> = self.menu.iter().collect();
        items.sort_by_key(|item| item.key());
        items
    }

    /// Insert a menu item, replacing any item with the same id.
    pub fn upsert_menu_item(&mut self, item: MenuItem) {
        match self.menu.iter().position(|m| m.id == item.id) {
            Some(idx) => self.menu[idx] = item,
            None => self.menu.push(item),
        }
    }

    /// Delete a menu item together with all of its ingredient links.
    pub fn delete_menu_item(&mut self, name_or_id: &str) -> Result<MenuItem> {
        let idx = self
            .menu_index(name_or_id)
            .ok_or_else(|| CostError::NotFound(name_or_id.to_string()))?;
        let removed = self.menu.remove(idx);
        info!(
            item = %removed.name,
            links = removed.ingredients.len(),
            "menu item deleted with its ingredient links"
        );
        Ok(removed)
    }

    /// Delete an inventory item. Refused while any recipe still uses it.
    pub fn delete_inventory_item(&mut self, name_or_id: &str) -> Result<InventoryItem> {
        let item = self
            .get_inventory(name_or_id)
            .ok_or_else(|| CostError::NotFound(name_or_id.to_string()))?;
        let id = item.id.clone();

        let count = self
            .menu
            .iter()
            .filter(|m| m.uses_inventory_item(&id))
            .count();
        if count > 0 {
            return Err(CostError::InUse {
                name: item.name.clone(),
                count,
            });
        }

        let idx = self
            .inventory
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CostError::NotFound(name_or_id.to_string()))?;
        let removed = self.inventory.remove(idx);
        info!(item = %removed.name, "inventory item deleted");
        Ok(removed)
    }

    /// Copy current names and costs from inventory into a menu item's lines.
    ///
    /// Lines whose inventory item no longer exists keep their quantity but lose their
    /// cost. Returns the number of stale lines.
    pub fn refresh_ingredient_costs(&self, item: &mut MenuItem) -> usize {
        let mut stale = 0;
        for line in item.ingredients.iter_mut() {
            match self.inventory.iter().find(|i| i.id == line.inventory_item_id) {
                Some(inv) => {
                    line.name = inv.name.clone();
                    line.cost_per_unit = Some(inv.cost_per_unit);
                    line.cost_unit = Some(inv.unit.clone());
                }
                None => {
                    debug!(
                        item = %item.name,
                        inventory_item_id = %line.inventory_item_id,
                        "ingredient references missing inventory item"
                    );
                    line.cost_per_unit = None;
                    stale += 1;
                }
            }
        }
        stale
    }

    /// Calculator over this kitchen's conversion table.
    pub fn calculator(&self, config: CostingConfig) -> CostCalculator<'_> {
        CostCalculator::new(&self.conversions, config)
    }

    /// Cost a menu item using current inventory costs.
    ///
    /// Refreshes a copy of the item once; the copy, its summary and the stale line
    /// count are returned together.
    pub fn summarize(&self, item: &MenuItem, config: CostingConfig) -> Result<CostedItem> {
        let mut current = item.clone();
        let stale = self.refresh_ingredient_costs(&mut current);
        let summary = self
            .calculator(config)
            .summarize(current.price, &current.ingredients)?;
        Ok(CostedItem {
            item: current,
            summary,
            stale,
        })
    }

    /// Per-portion usage of each inventory item across all menu recipes.
    pub fn inventory_usage(&self) -> Vec<InventoryUsage> {
        let mut usage: Vec<InventoryUsage> = Vec::new();

        for menu_item in self.menu_items() {
            for line in &menu_item.ingredients {
                let inv = self
                    .inventory
                    .iter()
                    .find(|i| i.id == line.inventory_item_id);
                let unit = inv.map(|i| i.unit.clone()).unwrap_or_else(|| line.unit.clone());
                let quantity = self.conversions.convert(line.quantity, &line.unit, &unit);

                match usage
                    .iter_mut()
                    .find(|u| u.inventory_item_id == line.inventory_item_id)
                {
                    Some(entry) => {
                        if !entry.used_in.contains(&menu_item.name) {
                            entry.used_in.push(menu_item.name.clone());
                        }
                        entry.total_quantity += quantity;
                    }
                    None => usage.push(InventoryUsage {
                        inventory_item_id: line.inventory_item_id.clone(),
                        name: inv
                            .map(|i| i.name.clone())
                            .unwrap_or_else(|| "Unknown".to_string()),
                        unit,
                        used_in: vec![menu_item.name.clone()],
                        total_quantity: quantity,
                    }),
                }
            }
        }

        usage.sort_by_key(|u| u.name.to_lowercase());
        usage
    }

    /// Inventory items at or below the threshold.
    pub fn low_stock_items(&self, threshold: f64) -> Vec<&InventoryItem> {
        self.inventory_items()
            .into_iter()
            .filter(|item| item.current_stock <= threshold)
            .collect()
    }

    /// Whole portions of a menu item that current stock can cover.
    ///
    /// Optional lines are ignored. Returns `None` when no required line limits the count.
    /// A line whose inventory item is missing limits the count to 0.
    pub fn servings_available(&self, item: &MenuItem) -> Option<u64> {
        let mut limit: Option<f64> = None;

        for line in item.ingredients.iter().filter(|l| !l.is_optional) {
            let portions = match self
                .inventory
                .iter()
                .find(|i| i.id == line.inventory_item_id)
            {
                Some(inv) => {
                    let needed = self.conversions.convert(line.quantity, &line.unit, &inv.unit);
                    if needed <= FLOAT_EPSILON {
                        continue;
                    }
                    (inv.current_stock / needed + FLOAT_EPSILON).floor().max(0.0)
                }
                None => 0.0,
            };
            limit = Some(limit.map_or(portions, |l: f64| l.min(portions)));
        }

        limit.map(|l| l as u64)
    }

    /// Snapshot for persistence.
    pub fn to_state(&self) -> KitchenState {
        KitchenState {
            inventory: self.inventory.clone(),
            menu: self.menu.clone(),
            settings: self.settings.clone(),
        }
    }

    pub fn inventory_len(&self) -> usize {
        self.inventory.len()
    }

    pub fn menu_len(&self) -> usize {
        self.menu.len()
    }

    fn menu_index(&self, name_or_id: &str) -> Option<usize> {
        let key = name_or_id.to_lowercase();
        self.menu
            .iter()
            .position(|m| m.id == name_or_id)
            .or_else(|| self.menu.iter().position(|m| m.key() == key))
    }

    fn sync_conversions(&mut self) {
        self.settings.unit_conversions = self.conversions.entries().to_vec();
    }
}
