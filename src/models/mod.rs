mod conversion;
mod inventory;
mod menu;

pub use conversion::UnitConversion;
pub use inventory::{InventoryItem, InventorySettings};
pub use menu::{IngredientLine, MenuItem};
