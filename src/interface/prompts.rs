use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;
use tracing::debug;

use crate::costing::RecipeEditor;
use crate::error::{CostError, Result};
use crate::interface::render::display_recipe;
use crate::models::InventoryItem;
use crate::units::UNIT_OPTIONS;

/// Minimum similarity for a fuzzy name match.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Prompt for a positive quantity.
pub fn prompt_quantity(name: &str, current: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(format!("Quantity of {} per portion", name))
        .default(current.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| CostError::InvalidInput("Invalid number".to_string()))
}

/// Prompt for a selling price.
pub fn prompt_price(current: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt("Selling price")
        .default(format!("{:.2}", current))
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| CostError::InvalidInput("Invalid number".to_string()))
}

/// Prompt for a unit from the standard list.
pub fn prompt_unit(current: &str) -> Result<String> {
    let default = UNIT_OPTIONS
        .iter()
        .position(|u| *u == current)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Unit")
        .items(UNIT_OPTIONS)
        .default(default)
        .interact()?;

    Ok(UNIT_OPTIONS[selection].to_string())
}

/// Prompt for an inventory item by name with fuzzy matching.
///
/// Returns `None` when the user gives up or nothing matches.
pub fn prompt_inventory_item<'a>(inventory: &[&'a InventoryItem]) -> Result<Option<&'a InventoryItem>> {
    let input: String = Input::new()
        .with_prompt("Ingredient name (Enter to cancel)")
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Ok(None);
    }

    // Exact match first (case-insensitive)
    if let Some(item) = inventory.iter().find(|i| i.key() == input) {
        return Ok(Some(*item));
    }

    let mut candidates: Vec<(&InventoryItem, f64)> = inventory
        .iter()
        .map(|i| (*i, jaro_winkler(&i.key(), &input)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    debug!(query = %input, matches = candidates.len(), "fuzzy ingredient lookup");

    match candidates.len() {
        0 => {
            println!("No inventory item matches '{}'", input);
            Ok(None)
        }
        1 => {
            let item = candidates[0].0;
            let confirm = prompt_yes_no(&format!("Did you mean '{}'?", item.name), true)?;
            Ok(confirm.then_some(item))
        }
        _ => {
            let options: Vec<&InventoryItem> = candidates.iter().take(5).map(|(i, _)| *i).collect();
            let mut labels: Vec<String> = options
                .iter()
                .map(|i| format!("{} ({}, ${:.2}/{})", i.name, i.current_stock, i.cost_per_unit, i.unit))
                .collect();
            labels.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&labels)
                .default(0)
                .interact()?;

            Ok(options.get(selection).copied())
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Pick one of the recipe's lines; returns its inventory item id.
fn select_ingredient(editor: &RecipeEditor<'_>) -> Result<Option<String>> {
    if editor.ingredients().is_empty() {
        println!("The recipe has no ingredients yet.");
        return Ok(None);
    }

    let labels: Vec<String> = editor
        .ingredients()
        .iter()
        .map(|l| format!("{} ({} {})", l.name, l.quantity, l.unit))
        .collect();

    let selection = Select::new()
        .with_prompt("Ingredient")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(editor
        .ingredients()
        .get(selection)
        .map(|l| l.inventory_item_id.clone()))
}

const ACTIONS: &[&str] = &[
    "Add ingredient",
    "Change quantity",
    "Change unit",
    "Toggle optional",
    "Remove ingredient",
    "Set price",
    "Done",
];

/// Interactive recipe editing loop.
///
/// Rejected edits are reported and the loop continues with the prior state.
pub fn run_recipe_editor(editor: &mut RecipeEditor<'_>, inventory: &[&InventoryItem]) -> Result<()> {
    loop {
        display_recipe(editor.item(), editor.summary());

        let action = Select::new()
            .with_prompt("What next?")
            .items(ACTIONS)
            .default(0)
            .interact()?;

        let outcome = match action {
            0 => match prompt_inventory_item(inventory)? {
                Some(item) => editor.add_ingredient(item),
                None => Ok(()),
            },
            1 => match select_ingredient(editor)? {
                Some(id) => {
                    let (name, current) = editor
                        .ingredients()
                        .iter()
                        .find(|l| l.inventory_item_id == id)
                        .map(|l| (l.name.clone(), l.quantity))
                        .unwrap_or_default();
                    prompt_quantity(&name, current).and_then(|q| editor.update_quantity(&id, q))
                }
                None => Ok(()),
            },
            2 => match select_ingredient(editor)? {
                Some(id) => {
                    let current = editor
                        .ingredients()
                        .iter()
                        .find(|l| l.inventory_item_id == id)
                        .map(|l| l.unit.clone())
                        .unwrap_or_default();
                    let unit = prompt_unit(&current)?;
                    editor.update_unit(&id, &unit)
                }
                None => Ok(()),
            },
            3 => match select_ingredient(editor)? {
                Some(id) => editor.toggle_optional(&id),
                None => Ok(()),
            },
            4 => match select_ingredient(editor)? {
                Some(id) => editor.remove_ingredient(&id).map(|_| ()),
                None => Ok(()),
            },
            5 => prompt_price(editor.item().price).and_then(|p| editor.set_price(p)),
            _ => return Ok(()),
        };

        match outcome {
            Ok(()) => {}
            Err(CostError::Prompt(e)) => return Err(CostError::Prompt(e)),
            Err(e) => println!("Rejected: {}", e),
        }
    }
}
