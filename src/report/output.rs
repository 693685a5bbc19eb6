use std::path::Path;

use crate::error::Result;
use crate::report::MenuCostRow;

/// Write the cost report to a CSV file.
pub fn write_csv(rows: &[MenuCostRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "name",
        "category",
        "ingredients",
        "price",
        "total_cost",
        "required_cost",
        "margin_percent",
        "food_cost_percent",
        "profit_per_unit",
        "profitability",
        "servings_available",
        "unresolved_units",
    ])?;

    for row in rows {
        let s = &row.summary;
        let unresolved = s
            .unresolved
            .iter()
            .map(|(from, to)| format!("{}->{}", from, to))
            .collect::<Vec<_>>()
            .join(";");

        wtr.write_record([
            row.name.clone(),
            row.category.clone(),
            row.ingredient_count.to_string(),
            format!("{:.2}", s.price),
            format!("{:.4}", s.total_cost),
            format!("{:.4}", s.required_cost),
            format!("{:.1}", s.margin_percent),
            format!("{:.1}", s.food_cost_percent),
            format!("{:.2}", s.profit_per_unit),
            s.category.to_string(),
            row.servings_available
                .map(|n| n.to_string())
                .unwrap_or_default(),
            unresolved,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
