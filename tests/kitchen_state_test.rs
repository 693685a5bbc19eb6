use std::io::Write;

use menu_costing_rs::costing::{CostingConfig, RecipeEditor};
use menu_costing_rs::error::CostError;
use menu_costing_rs::models::UnitConversion;
use menu_costing_rs::report::{build_cost_report, write_csv};
use menu_costing_rs::state::{load_state, save_state, KitchenStateManager};
use tempfile::NamedTempFile;

const KITCHEN: &str = r#"{
    "inventory": [
        {"id": "inv-flour", "name": "Flour", "unit": "kg", "cost_per_unit": 2.0, "current_stock": 5},
        {"id": "inv-egg", "name": "Egg", "unit": "pcs", "cost_per_unit": 0.25, "current_stock": 30},
        {"id": "inv-milk", "name": "Milk", "unit": "L", "cost_per_unit": 1.5, "current_stock": 8},
        {"id": "inv-syrup", "name": "Maple Syrup", "unit": "bottle", "cost_per_unit": 9.0, "current_stock": 3}
    ],
    "menu": [
        {"id": "m-pancakes", "name": "Pancakes", "category": "Breakfast", "price": 9.0, "ingredients": [
            {"inventory_item_id": "inv-flour", "quantity": 200, "unit": "g"},
            {"inventory_item_id": "inv-egg", "quantity": 2, "unit": "pcs"},
            {"inventory_item_id": "inv-milk", "quantity": 300, "unit": "ml"}
        ]},
        {"id": "m-omelette", "name": "Omelette", "category": "Breakfast", "price": 7.5, "ingredients": [
            {"inventory_item_id": "inv-egg", "quantity": 3, "unit": "pcs"}
        ]}
    ],
    "settings": {"low_stock_threshold": 5}
}"#;

fn kitchen_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(KITCHEN.as_bytes()).unwrap();
    file
}

#[test]
fn test_cost_report_uses_inventory_costs() {
    let file = kitchen_file();
    let manager = KitchenStateManager::new(load_state(file.path()).unwrap());

    let rows = build_cost_report(&manager, &CostingConfig::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Omelette");

    // 0.2 kg * 2.0 + 2 * 0.25 + 0.3 L * 1.5
    let pancakes = &rows[1].summary;
    assert!((pancakes.total_cost - 1.35).abs() < 1e-9);
    assert!((pancakes.margin_percent - 85.0).abs() < 1e-9);
    assert_eq!(rows[1].servings_available, Some(15));
}

#[test]
fn test_edit_session_then_save_and_reload() {
    let file = kitchen_file();
    let mut manager = KitchenStateManager::new(load_state(file.path()).unwrap());

    let mut item = manager.get_menu_item("pancakes").cloned().unwrap();
    manager.refresh_ingredient_costs(&mut item);

    let edited = {
        let syrup = manager.get_inventory("maple syrup").cloned().unwrap();
        let mut editor =
            RecipeEditor::new(item, manager.calculator(CostingConfig::default())).unwrap();
        editor.add_ingredient(&syrup).unwrap();
        editor.update_quantity("inv-syrup", 0.1).unwrap();
        editor.toggle_optional("inv-syrup").unwrap();
        assert!(editor.update_quantity("inv-egg", -1.0).is_err());

        assert!((editor.summary().total_cost - 2.25).abs() < 1e-9);
        assert!((editor.summary().required_cost - 1.35).abs() < 1e-9);
        editor.into_menu_item()
    };

    manager.upsert_menu_item(edited);
    save_state(file.path(), &manager.to_state()).unwrap();

    let reloaded = KitchenStateManager::new(load_state(file.path()).unwrap());
    let pancakes = reloaded.get_menu_item("Pancakes").unwrap();
    assert_eq!(pancakes.ingredients.len(), 4);
    assert!(pancakes.ingredients[3].is_optional);
    assert_eq!(reloaded.menu_len(), 2);
}

#[test]
fn test_conversions_persist() {
    let file = kitchen_file();
    let mut manager = KitchenStateManager::new(load_state(file.path()).unwrap());
    manager
        .add_conversion(UnitConversion::new("bottle", "ml", 750.0))
        .unwrap();
    save_state(file.path(), &manager.to_state()).unwrap();

    let reloaded = KitchenStateManager::new(load_state(file.path()).unwrap());
    assert_eq!(reloaded.conversions().len(), 4);
    assert!((reloaded.conversions().convert(1500.0, "ml", "bottle") - 2.0).abs() < 1e-9);
}

#[test]
fn test_delete_rules() {
    let file = kitchen_file();
    let mut manager = KitchenStateManager::new(load_state(file.path()).unwrap());

    assert!(matches!(
        manager.delete_inventory_item("Flour"),
        Err(CostError::InUse { count: 1, .. })
    ));
    assert!(matches!(
        manager.delete_menu_item("Waffles"),
        Err(CostError::NotFound(_))
    ));

    let removed = manager.delete_menu_item("Pancakes").unwrap();
    assert_eq!(removed.ingredients.len(), 3);
    manager.delete_inventory_item("Flour").unwrap();
    assert_eq!(manager.inventory_len(), 3);
}

#[test]
fn test_strict_units_fail_report() {
    let json = KITCHEN.replace(r#""unit": "ml"}"#, r#""unit": "cup"}"#);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    let manager = KitchenStateManager::new(load_state(file.path()).unwrap());

    let relaxed = build_cost_report(&manager, &CostingConfig::default()).unwrap();
    assert_eq!(
        relaxed[1].summary.unresolved,
        vec![("cup".to_string(), "L".to_string())]
    );

    let strict = build_cost_report(&manager, &CostingConfig { strict_units: true });
    assert!(matches!(strict, Err(CostError::UnresolvedConversion { .. })));
}

#[test]
fn test_export_csv() {
    let file = kitchen_file();
    let manager = KitchenStateManager::new(load_state(file.path()).unwrap());
    let rows = build_cost_report(&manager, &CostingConfig::default()).unwrap();

    let out = NamedTempFile::new().unwrap();
    write_csv(&rows, out.path()).unwrap();

    let content = std::fs::read_to_string(out.path()).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("Pancakes,Breakfast,3,9.00,1.3500"));
}
