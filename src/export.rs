use crate::error::GroceryError;
use crate::model::{Ingredient, ShoppingList};
use chrono::{DateTime, TimeZone};
use log::info;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// One category as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySection {
    pub title: String,
    pub lines: Vec<String>,
}

/// A shopping list ready for display, with summary totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub dishes: Vec<String>,
    pub sections: Vec<DisplaySection>,
    pub total_items: usize,
    pub category_count: usize,
}

/// `"name (quantity)"`, or just the name when no quantity is known
pub fn item_line(item: &Ingredient) -> String {
    match item.quantity.as_deref().map(str::trim) {
        Some(quantity) if !quantity.is_empty() => format!("{} ({})", item.name, quantity),
        _ => item.name.clone(),
    }
}

pub fn render(list: &ShoppingList) -> DisplayModel {
    let sections: Vec<DisplaySection> = list
        .sections
        .iter()
        .map(|section| DisplaySection {
            title: section.category.display_name().to_string(),
            lines: section.items.iter().map(item_line).collect(),
        })
        .collect();

    DisplayModel {
        dishes: list.dishes.clone(),
        category_count: sections.len(),
        total_items: list.total_items(),
        sections,
    }
}

/// Plain-text export: a header per category, one bullet per item and a
/// blank line between categories. An empty list exports as an empty string.
pub fn export_text(list: &ShoppingList) -> String {
    render(list)
        .sections
        .iter()
        .map(|section| {
            let mut block = format!("{}\n", section.title);
            for line in &section.lines {
                block.push_str(&format!("• {}\n", line));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Download name for an export taken at `at`, e.g. `shopping_list_20240305_1407.txt`
pub fn export_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("shopping_list_{}.txt", at.format("%Y%m%d_%H%M"))
}

/// Write the plain-text export to `path`
pub async fn write_export(list: &ShoppingList, path: &Path) -> Result<(), GroceryError> {
    tokio::fs::write(path, export_text(list)).await?;
    info!("Shopping list saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::merge;
    use crate::model::Source;
    use chrono::Utc;

    fn ai(raws: &[&str]) -> Vec<Ingredient> {
        raws.iter()
            .map(|r| Ingredient::from_raw(*r, Source::Ai))
            .collect()
    }

    #[test]
    fn test_pancakes_export() {
        let list = merge(&ai(&["1 cup flour", "2 eggs", "1 cup milk"]), &[]);

        let text = export_text(&list);
        assert_eq!(
            text,
            "Dairy & Eggs\n• eggs (2)\n• milk (1 cup)\n\nPantry Staples\n• flour (1 cup)\n"
        );
    }

    #[test]
    fn test_render_totals() {
        let list = merge(&ai(&["2 chicken breasts", "kale", "salt", "1 lb salmon"]), &[])
            .with_dishes(vec!["Dinner".to_string()]);

        let model = render(&list);
        assert_eq!(model.total_items, 4);
        assert_eq!(model.category_count, 3);
        assert_eq!(model.dishes, vec!["Dinner"]);
        assert_eq!(model.sections[0].title, "Produce");
        assert_eq!(model.sections[0].lines, vec!["kale"]);
        assert_eq!(
            model.sections[1].lines,
            vec!["chicken breasts (2)", "salmon (1 lb)"]
        );
    }

    #[test]
    fn test_empty_list_exports_nothing() {
        let list = ShoppingList::default();
        assert_eq!(export_text(&list), "");
        assert_eq!(render(&list).category_count, 0);
    }

    #[test]
    fn test_display_model_serializes() {
        let list = merge(&ai(&["1 cup rice"]), &[]);
        let json = serde_json::to_value(render(&list)).unwrap();
        assert_eq!(json["sections"][0]["title"], "Pantry Staples");
        assert_eq!(json["sections"][0]["lines"][0], "rice (1 cup)");
        assert_eq!(json["total_items"], 1);
    }

    #[test]
    fn test_export_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 59).unwrap();
        assert_eq!(export_file_name(&at), "shopping_list_20240305_1407.txt");
    }

    #[tokio::test]
    async fn test_write_export() {
        let list = merge(&ai(&["3 apples"]), &[]);
        let path = std::env::temp_dir().join(format!("grocery_export_{}.txt", std::process::id()));

        write_export(&list, &path).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "Produce\n• apples (3)\n");
        let _ = tokio::fs::remove_file(&path).await;
    }
}
