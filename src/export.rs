use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

use crate::meal_plan::MealPlanObject;

const CATEGORY_COL: &str = "Category";
const ITEM_COL: &str = "Item";

/// Writes one `Category,Item` row per grocery item, standard categories first.
pub fn write_grocery_csv<W: Write>(plan: &MealPlanObject, writer: W) -> Result<usize> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record([CATEGORY_COL, ITEM_COL])?;

    let mut rows = 0;
    for (category, items) in plan.grocery_items() {
        for item in items {
            wtr.write_record([category, item.as_str()])
                .with_context(|| format!("Failed to write grocery row for '{}'", item))?;
            rows += 1;
        }
    }
    wtr.flush()?;
    Ok(rows)
}

pub fn export_grocery_csv(plan: &MealPlanObject, csv_path: &Path) -> Result<usize> {
    let file = std::fs::File::create(csv_path)
        .with_context(|| format!("Failed to create grocery CSV file at {:?}", csv_path))?;
    write_grocery_csv(plan, file)
}
