use tracing::debug;

use crate::costing::calculator::{CostCalculator, CostSummary};
use crate::error::{CostError, Result};
use crate::models::{IngredientLine, InventoryItem, MenuItem};

/// Editing session for one menu item's price and recipe.
///
/// Every accepted edit recomputes the cost summary. A rejected edit leaves both the
/// item and the summary as they were.
pub struct RecipeEditor<'a> {
    item: MenuItem,
    calculator: CostCalculator<'a>,
    summary: CostSummary,
}

impl<'a> RecipeEditor<'a> {
    pub fn new(item: MenuItem, calculator: CostCalculator<'a>) -> Result<Self> {
        validate_price(item.price)?;
        let summary = calculator.summarize(item.price, &item.ingredients)?;
        Ok(Self {
            item,
            calculator,
            summary,
        })
    }

    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    pub fn ingredients(&self) -> &[IngredientLine] {
        &self.item.ingredients
    }

    /// Cost summary for the current price and ingredient list.
    pub fn summary(&self) -> &CostSummary {
        &self.summary
    }

    /// Add an inventory item to the recipe with quantity 1 in its own unit.
    pub fn add_ingredient(&mut self, inventory_item: &InventoryItem) -> Result<()> {
        if self.item.uses_inventory_item(&inventory_item.id) {
            return Err(CostError::Validation(format!(
                "{} is already added to the recipe",
                inventory_item.name
            )));
        }
        let line = IngredientLine::from_inventory(inventory_item);
        self.apply(|item| {
            item.ingredients.push(line);
            Ok(())
        })
    }

    /// Change the quantity of a line. The quantity must be positive.
    pub fn update_quantity(&mut self, inventory_item_id: &str, quantity: f64) -> Result<()> {
        validate_quantity(quantity)?;
        self.apply(|item| {
            line_mut(item, inventory_item_id)?.quantity = quantity;
            Ok(())
        })
    }

    /// Change the unit a line's quantity is measured in.
    pub fn update_unit(&mut self, inventory_item_id: &str, unit: &str) -> Result<()> {
        if unit.trim().is_empty() {
            return Err(CostError::Validation("Unit must not be empty".to_string()));
        }
        let unit = unit.to_string();
        self.apply(|item| {
            line_mut(item, inventory_item_id)?.unit = unit;
            Ok(())
        })
    }

    /// Flip a line's optional flag.
    pub fn toggle_optional(&mut self, inventory_item_id: &str) -> Result<()> {
        self.apply(|item| {
            let line = line_mut(item, inventory_item_id)?;
            line.is_optional = !line.is_optional;
            Ok(())
        })
    }

    /// Remove a line from the recipe and return it.
    pub fn remove_ingredient(&mut self, inventory_item_id: &str) -> Result<IngredientLine> {
        let index = self
            .item
            .ingredients
            .iter()
            .position(|line| line.inventory_item_id == inventory_item_id)
            .ok_or_else(|| CostError::NotFound(inventory_item_id.to_string()))?;

        let removed = self.item.ingredients[index].clone();
        self.apply(|item| {
            item.ingredients.remove(index);
            Ok(())
        })?;
        Ok(removed)
    }

    /// Change the selling price. The price must be zero or more.
    pub fn set_price(&mut self, price: f64) -> Result<()> {
        validate_price(price)?;
        self.apply(|item| {
            item.price = price;
            Ok(())
        })
    }

    /// Finish the session and hand back the edited item.
    pub fn into_menu_item(self) -> MenuItem {
        self.item
    }

    /// Apply an edit to a copy of the item and commit only if it can be costed.
    fn apply<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut MenuItem) -> Result<()>,
    {
        let mut candidate = self.item.clone();
        edit(&mut candidate)?;
        let summary = self
            .calculator
            .summarize(candidate.price, &candidate.ingredients)?;

        debug!(
            item = %candidate.name,
            cost = summary.total_cost,
            margin = summary.margin_percent,
            "recipe recomputed"
        );

        self.item = candidate;
        self.summary = summary;
        Ok(())
    }
}

fn line_mut<'m>(item: &'m mut MenuItem, inventory_item_id: &str) -> Result<&'m mut IngredientLine> {
    item.ingredients
        .iter_mut()
        .find(|line| line.inventory_item_id == inventory_item_id)
        .ok_or_else(|| CostError::NotFound(inventory_item_id.to_string()))
}

fn validate_quantity(quantity: f64) -> Result<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(CostError::Validation(format!(
            "Quantity must be greater than 0 (got {})",
            quantity
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CostError::Validation(format!(
            "Price must be 0 or more (got {})",
            price
        )));
    }
    Ok(())
}
