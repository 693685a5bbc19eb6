mod manager;
mod persistence;

pub use manager::{CostedItem, InventoryUsage, KitchenStateManager};
pub use persistence::{load_state, save_state, KitchenState};
