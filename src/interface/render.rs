use crate::costing::CostSummary;
use crate::models::{InventoryItem, MenuItem};
use crate::report::MenuCostRow;
use crate::state::InventoryUsage;
use crate::units::ConversionTable;

/// Display a recipe with per-line costs and the cost summary.
pub fn display_recipe(item: &MenuItem, summary: &CostSummary) {
    println!();
    println!("=== {} ===", item.name);
    println!();

    if item.ingredients.is_empty() {
        println!("  No ingredients added yet.");
    } else {
        let width = item
            .ingredients
            .iter()
            .map(|l| l.name.len())
            .max()
            .unwrap_or(10);

        for (i, line) in item.ingredients.iter().enumerate() {
            let cost = match line.cost_per_unit {
                Some(c) => format!("${:.2}/{}", c, line.pricing_unit()),
                None => "no cost".to_string(),
            };
            let optional = if line.is_optional { "  (optional)" } else { "" };
            println!(
                "{:>3}. {:<width$} {:>8} {:<6} @ {}{}",
                i + 1,
                line.name,
                line.quantity,
                line.unit,
                cost,
                optional,
                width = width
            );
        }
    }

    display_cost_summary(summary);
}

/// Display the derived cost figures.
pub fn display_cost_summary(summary: &CostSummary) {
    println!();
    println!("--- Cost ---");
    println!("Total cost price:  ${:.2}", summary.total_cost);
    if (summary.total_cost - summary.required_cost).abs() > f64::EPSILON {
        println!("Without optionals: ${:.2}", summary.required_cost);
    }
    println!("Selling price:     ${:.2}", summary.price);
    println!(
        "Profit margin:     {:.1}% ({})",
        summary.margin_percent, summary.category
    );
    println!("Food cost:         {:.1}%", summary.food_cost_percent);
    println!("Profit per unit:   ${:.2}", summary.profit_per_unit);

    if summary.margin_percent < 0.0 {
        println!("Warning: ingredient cost exceeds the selling price.");
    }
    for (from, to) in &summary.unresolved {
        println!(
            "Warning: no conversion from '{}' to '{}'; quantity costed as-is.",
            from, to
        );
    }
    println!();
}

/// Display the cost report for the whole menu.
pub fn display_cost_report(rows: &[MenuCostRow]) {
    if rows.is_empty() {
        println!("No menu items.");
        return;
    }

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(10);

    println!();
    println!("=== Menu Costs ({} items) ===", rows.len());
    println!();

    for row in rows {
        let s = &row.summary;
        let servings = row
            .servings_available
            .map(|n| format!("{} portions", n))
            .unwrap_or_else(|| "unlimited".to_string());
        let flag = if s.has_unresolved_units() { " *" } else { "" };

        println!(
            "  {:<width$}  price ${:>7.2}  cost ${:>7.2}  margin {:>6.1}%  {:<9} {}{}",
            row.name,
            s.price,
            s.total_cost,
            s.margin_percent,
            s.category.label(),
            servings,
            flag,
            width = width
        );
    }

    if rows.iter().any(|r| r.summary.has_unresolved_units()) {
        println!();
        println!("  * costed with at least one unconverted unit");
    }
    println!();
}

/// Display the conversion table with positions for removal.
pub fn display_conversions(table: &ConversionTable) {
    if table.is_empty() {
        println!("No unit conversions registered.");
        return;
    }

    println!();
    println!("=== Unit Conversions ===");
    println!();
    for (i, conv) in table.entries().iter().enumerate() {
        println!("  [{}] {}", i, conv);
    }
    println!();
}

/// Display per-portion inventory usage across the menu.
pub fn display_usage(usage: &[InventoryUsage]) {
    if usage.is_empty() {
        println!("No recipes reference inventory items.");
        return;
    }

    println!();
    println!("=== Inventory Usage (per portion of each dish) ===");
    println!();
    for u in usage {
        println!(
            "  {} - {:.3} {} across {} item(s): {}",
            u.name,
            u.total_quantity,
            u.unit,
            u.used_in.len(),
            u.used_in.join(", ")
        );
    }
    println!();
}

/// Display a simple list of inventory items.
pub fn display_inventory_list(items: &[&InventoryItem], title: &str) {
    if items.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, items.len());
    println!();

    for item in items {
        println!(
            "  {} - {} {} in stock, ${:.2}/{} (value ${:.2})",
            item.name,
            item.current_stock,
            item.unit,
            item.cost_per_unit,
            item.unit,
            item.stock_value()
        );
    }

    println!();
}
