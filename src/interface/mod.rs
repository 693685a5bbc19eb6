pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_inventory_item, prompt_price, prompt_quantity, prompt_unit, prompt_yes_no,
    run_recipe_editor,
};
pub use render::{
    display_conversions, display_cost_report, display_cost_summary, display_inventory_list,
    display_recipe, display_usage,
};
