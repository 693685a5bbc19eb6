use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use menu_costing_rs::cli::{Cli, Command, ConversionAction};
use menu_costing_rs::costing::{CostingConfig, RecipeEditor};
use menu_costing_rs::error::{CostError, Result};
use menu_costing_rs::interface::{
    display_conversions, display_cost_report, display_inventory_list, display_recipe,
    display_usage, prompt_yes_no, run_recipe_editor,
};
use menu_costing_rs::models::UnitConversion;
use menu_costing_rs::report::{build_cost_report, write_csv};
use menu_costing_rs::state::{load_state, save_state, KitchenState, KitchenStateManager};
use menu_costing_rs::units::{default_conversions, ConversionTable};

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();
    let config = CostingConfig {
        strict_units: cli.strict_units,
    };
    let path = Path::new(&cli.file);

    match command {
        Command::Cost { item } => cmd_cost(path, item.as_deref(), &config),
        Command::Edit { name } => cmd_edit(path, &name, &config),
        Command::Conversions { action } => cmd_conversions(path, action),
        Command::Convert { quantity, from, to } => cmd_convert(path, quantity, &from, &to, &config),
        Command::Usage => cmd_usage(path),
        Command::LowStock { threshold } => cmd_low_stock(path, threshold),
        Command::Servings { name } => cmd_servings(path, &name),
        Command::DeleteItem { name } => cmd_delete_item(path, &name),
        Command::DeleteInventory { name } => cmd_delete_inventory(path, &name),
        Command::Export { path: out } => cmd_export(path, &out, &config),
    }
}

/// Load the state file, or `None` after telling the user it is missing.
fn load_manager(path: &Path) -> Result<Option<KitchenStateManager>> {
    if !path.exists() {
        eprintln!("Kitchen state file not found: {}", path.display());
        eprintln!("Create one with \"inventory\", \"menu\" and optional \"settings\" arrays.");
        return Ok(None);
    }
    Ok(Some(KitchenStateManager::new(load_state(path)?)))
}

/// Show costs for one item or the whole menu.
fn cmd_cost(path: &Path, item: Option<&str>, config: &CostingConfig) -> Result<()> {
    let Some(manager) = load_manager(path)? else {
        return Ok(());
    };

    match item {
        Some(name) => {
            let menu_item = manager
                .get_menu_item(name)
                .ok_or_else(|| CostError::NotFound(name.to_string()))?;
            let costed = manager.summarize(menu_item, config.clone())?;

            display_recipe(&costed.item, &costed.summary);
            if costed.stale > 0 {
                println!(
                    "{} ingredient(s) reference missing inventory items.",
                    costed.stale
                );
            }
        }
        None => {
            let rows = build_cost_report(&manager, config)?;
            display_cost_report(&rows);
        }
    }

    Ok(())
}

/// Edit a recipe interactively and optionally save it.
fn cmd_edit(path: &Path, name: &str, config: &CostingConfig) -> Result<()> {
    let Some(mut manager) = load_manager(path)? else {
        return Ok(());
    };

    let mut item = manager
        .get_menu_item(name)
        .cloned()
        .ok_or_else(|| CostError::NotFound(name.to_string()))?;
    manager.refresh_ingredient_costs(&mut item);

    let edited = {
        let inventory = manager.inventory_items();
        let mut editor = RecipeEditor::new(item, manager.calculator(config.clone()))?;
        run_recipe_editor(&mut editor, &inventory)?;
        editor.into_menu_item()
    };

    if prompt_yes_no("Save recipe?", true)? {
        manager.upsert_menu_item(edited);
        save_state(path, &manager.to_state())?;
        println!("Kitchen state saved.");
    }

    Ok(())
}

/// List, add or remove unit conversions.
fn cmd_conversions(path: &Path, action: ConversionAction) -> Result<()> {
    if !path.exists() && !matches!(action, ConversionAction::List) {
        eprintln!("Kitchen state file not found: {}", path.display());
        return Ok(());
    }

    let mut manager = if path.exists() {
        KitchenStateManager::new(load_state(path)?)
    } else {
        KitchenStateManager::new(KitchenState::default())
    };

    match action {
        ConversionAction::List => {
            display_conversions(manager.conversions());
            return Ok(());
        }
        ConversionAction::Add { from, to, factor } => {
            let entry = UnitConversion::new(from, to, factor);
            let label = entry.to_string();
            manager.add_conversion(entry)?;
            println!("Added: {}", label);
        }
        ConversionAction::Remove { index } => {
            let removed = manager.remove_conversion(index)?;
            println!("Removed: {}", removed);
        }
    }

    save_state(path, &manager.to_state())?;
    println!("Kitchen state saved.");
    Ok(())
}

/// Convert a quantity using the kitchen's table, or the seed table without a state file.
fn cmd_convert(
    path: &Path,
    quantity: f64,
    from: &str,
    to: &str,
    config: &CostingConfig,
) -> Result<()> {
    let table = if path.exists() {
        let manager = KitchenStateManager::new(load_state(path)?);
        manager.conversions().clone()
    } else {
        ConversionTable::seeded(&default_conversions())
    };

    let converted = if config.strict_units {
        table.convert_strict(quantity, from, to)?
    } else {
        table.convert(quantity, from, to)
    };

    println!("{} {} = {} {}", quantity, from, converted, to);
    if !table.unresolved().is_empty() {
        println!("(no conversion registered; quantity passed through unchanged)");
    }
    Ok(())
}

fn cmd_usage(path: &Path) -> Result<()> {
    let Some(manager) = load_manager(path)? else {
        return Ok(());
    };
    display_usage(&manager.inventory_usage());
    Ok(())
}

fn cmd_low_stock(path: &Path, threshold: Option<f64>) -> Result<()> {
    let Some(manager) = load_manager(path)? else {
        return Ok(());
    };
    let threshold = threshold.unwrap_or(manager.settings().low_stock_threshold);
    let items = manager.low_stock_items(threshold);
    display_inventory_list(&items, &format!("Low stock (<= {})", threshold));
    Ok(())
}

fn cmd_servings(path: &Path, name: &str) -> Result<()> {
    let Some(manager) = load_manager(path)? else {
        return Ok(());
    };
    let item = manager
        .get_menu_item(name)
        .ok_or_else(|| CostError::NotFound(name.to_string()))?;

    match manager.servings_available(item) {
        Some(n) => println!("{}: {} portion(s) available from current stock.", item.name, n),
        None => println!("{}: no required ingredients limit the portions.", item.name),
    }
    Ok(())
}

fn cmd_delete_item(path: &Path, name: &str) -> Result<()> {
    let Some(mut manager) = load_manager(path)? else {
        return Ok(());
    };
    let removed = manager.delete_menu_item(name)?;
    println!(
        "Deleted {} and {} ingredient link(s).",
        removed.name,
        removed.ingredients.len()
    );
    save_state(path, &manager.to_state())?;
    println!("Kitchen state saved.");
    Ok(())
}

fn cmd_delete_inventory(path: &Path, name: &str) -> Result<()> {
    let Some(mut manager) = load_manager(path)? else {
        return Ok(());
    };
    let removed = manager.delete_inventory_item(name)?;
    println!("Deleted {}.", removed.name);
    save_state(path, &manager.to_state())?;
    println!("Kitchen state saved.");
    Ok(())
}

fn cmd_export(path: &Path, out: &Path, config: &CostingConfig) -> Result<()> {
    let Some(manager) = load_manager(path)? else {
        return Ok(());
    };
    let rows = build_cost_report(&manager, config)?;
    write_csv(&rows, out)?;
    println!("Wrote {} menu item(s) to {}", rows.len(), out.display());
    Ok(())
}
