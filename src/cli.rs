use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// MenuCosting — unit conversions, recipe costs, and profit margins for a restaurant kitchen.
#[derive(Parser, Debug)]
#[command(name = "menu_costing")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the kitchen state JSON file.
    #[arg(short, long, global = true, default_value = "kitchen_state.json")]
    pub file: String,

    /// Fail on unit pairs with no registered conversion instead of costing them as-is.
    #[arg(long, global = true)]
    pub strict_units: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the cost breakdown for one menu item, or a summary of the whole menu.
    Cost {
        /// Menu item name or id.
        #[arg(long)]
        item: Option<String>,
    },

    /// Interactively edit a menu item's recipe and price.
    Edit {
        /// Menu item name or id.
        name: String,
    },

    /// Manage unit conversions.
    Conversions {
        #[command(subcommand)]
        action: ConversionAction,
    },

    /// Convert a quantity between units.
    Convert {
        quantity: f64,
        from: String,
        to: String,
    },

    /// Show how much of each inventory item the menu recipes use.
    Usage,

    /// List inventory items at or below the low-stock threshold.
    LowStock {
        /// Override the threshold from the settings.
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show how many portions of a menu item current stock covers.
    Servings {
        /// Menu item name or id.
        name: String,
    },

    /// Delete a menu item and its ingredient links.
    DeleteItem {
        /// Menu item name or id.
        name: String,
    },

    /// Delete an inventory item that no recipe uses.
    DeleteInventory {
        /// Inventory item name or id.
        name: String,
    },

    /// Export the menu cost report as CSV.
    Export {
        /// Output CSV file.
        #[arg(default_value = "menu_costs.csv")]
        path: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConversionAction {
    /// List registered conversions with their positions.
    List,

    /// Register `1 <from> = <factor> <to>`.
    Add { from: String, to: String, factor: f64 },

    /// Remove the conversion at a position shown by `list`.
    Remove { index: usize },
}

impl Default for Command {
    fn default() -> Self {
        Command::Cost { item: None }
    }
}
