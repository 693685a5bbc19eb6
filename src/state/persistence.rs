use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CostError, Result};
use crate::models::{InventoryItem, InventorySettings, MenuItem};

/// On-disk kitchen state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitchenState {
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,

    #[serde(default)]
    pub menu: Vec<MenuItem>,

    #[serde(default)]
    pub settings: InventorySettings,
}

/// Load kitchen state from a JSON file.
///
/// Deduplicates inventory and menu items by id (last occurrence wins, first position kept).
/// Fails with [`CostError::Validation`] if an item has a negative or non-finite cost,
/// stock, price or ingredient quantity.
pub fn load_state<P: AsRef<Path>>(path: P) -> Result<KitchenState> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let mut state: KitchenState = serde_json::from_str(&content)?;

    state.inventory = dedup_by_id(state.inventory, |item| item.id.clone());
    state.menu = dedup_by_id(state.menu, |item| item.id.clone());

    validate_state(&state)?;

    info!(
        path = %path.display(),
        inventory = state.inventory.len(),
        menu = state.menu.len(),
        "kitchen state loaded"
    );
    Ok(state)
}

/// Save kitchen state to a JSON file.
///
/// Deduplicates by id before saving. Derived cost fields are never written.
pub fn save_state<P: AsRef<Path>>(path: P, state: &KitchenState) -> Result<()> {
    let path = path.as_ref();
    let deduped = KitchenState {
        inventory: dedup_by_id(state.inventory.clone(), |item| item.id.clone()),
        menu: dedup_by_id(state.menu.clone(), |item| item.id.clone()),
        settings: state.settings.clone(),
    };

    let json = serde_json::to_string_pretty(&deduped)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "kitchen state saved");
    Ok(())
}

fn validate_state(state: &KitchenState) -> Result<()> {
    if let Some(item) = state.inventory.iter().find(|item| !item.is_valid()) {
        return Err(CostError::Validation(format!(
            "Inventory item '{}' has invalid cost {} or stock {}",
            item.name, item.cost_per_unit, item.current_stock
        )));
    }

    for item in &state.menu {
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(CostError::Validation(format!(
                "Menu item '{}' has invalid price {}",
                item.name, item.price
            )));
        }
        if let Some(reason) = item.ingredients.iter().find_map(|l| l.validation_error()) {
            return Err(CostError::Validation(format!("Menu item '{}': {}", item.name, reason)));
        }
    }
    Ok(())
}

fn dedup_by_id<T, F>(items: Vec<T>, id: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let key = id(&item);
        match out.iter().position(|existing| id(existing) == key) {
            Some(idx) => out[idx] = item,
            None => out.push(item),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "inventory": [
            {"id": "inv-flour", "name": "Flour", "unit": "kg", "cost_per_unit": 1.2, "current_stock": 20},
            {"id": "inv-egg", "name": "Egg", "unit": "pcs", "cost_per_unit": 0.3, "current_stock": 60}
        ],
        "menu": [
            {"id": "m-pancakes", "name": "Pancakes", "price": 8.5, "ingredients": [
                {"inventory_item_id": "inv-flour", "quantity": 200, "unit": "g", "cost_per_unit": 1.2, "cost_unit": "kg"},
                {"inventory_item_id": "inv-egg", "quantity": 2, "unit": "pcs", "cost_per_unit": 0.3}
            ]}
        ]
    }"#;

    #[test]
    fn test_load_and_save_roundtrip() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let state = load_state(file.path()).unwrap();
        assert_eq!(state.inventory.len(), 2);
        assert_eq!(state.menu.len(), 1);
        assert_eq!(state.menu[0].ingredients.len(), 2);
        // Missing settings fall back to the seed conversions
        assert_eq!(state.settings.unit_conversions.len(), 3);

        let out_file = NamedTempFile::new().unwrap();
        save_state(out_file.path(), &state).unwrap();

        let reloaded = load_state(out_file.path()).unwrap();
        assert_eq!(reloaded.inventory.len(), 2);
        assert_eq!(reloaded.menu[0].name, "Pancakes");
        assert_eq!(reloaded.menu[0].ingredients[0].cost_unit.as_deref(), Some("kg"));

        let raw = std::fs::read_to_string(out_file.path()).unwrap();
        assert!(!raw.contains("margin"));
    }

    fn load_str(json: &str) -> Result<KitchenState> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        load_state(file.path())
    }

    #[test]
    fn test_load_rejects_invalid_ingredient_quantity() {
        let json = SAMPLE.replace(r#""quantity": 2,"#, r#""quantity": -4,"#);
        assert!(matches!(load_str(&json), Err(CostError::Validation(_))));

        let json = SAMPLE.replace(r#""quantity": 2,"#, r#""quantity": 0,"#);
        assert!(matches!(load_str(&json), Err(CostError::Validation(_))));
    }

    #[test]
    fn test_load_rejects_negative_costs() {
        let json = SAMPLE.replace(
            r#""cost_per_unit": 0.3, "current_stock""#,
            r#""cost_per_unit": -0.25, "current_stock""#,
        );
        assert!(matches!(load_str(&json), Err(CostError::Validation(_))));

        let json = SAMPLE.replace(r#""cost_per_unit": 0.3}"#, r#""cost_per_unit": -0.25}"#);
        assert!(matches!(load_str(&json), Err(CostError::Validation(_))));

        let json = SAMPLE.replace(r#""price": 8.5"#, r#""price": -1"#);
        assert!(matches!(load_str(&json), Err(CostError::Validation(_))));

        let json = SAMPLE.replace(r#""current_stock": 60"#, r#""current_stock": -1"#);
        assert!(matches!(load_str(&json), Err(CostError::Validation(_))));
    }

    #[test]
    fn test_deduplication() {
        let json = r#"{
            "inventory": [
                {"id": "inv-1", "name": "Salt", "unit": "g", "cost_per_unit": 0.01, "current_stock": 500},
                {"id": "inv-2", "name": "Pepper", "unit": "g", "cost_per_unit": 0.05, "current_stock": 100},
                {"id": "inv-1", "name": "Salt", "unit": "g", "cost_per_unit": 0.02, "current_stock": 900}
            ]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let state = load_state(file.path()).unwrap();
        assert_eq!(state.inventory.len(), 2);
        // Last occurrence wins, first position kept
        assert_eq!(state.inventory[0].id, "inv-1");
        assert!((state.inventory[0].current_stock - 900.0).abs() < 1e-9);
    }
}
