use crate::model::{DishRequest, Preferences};

/// The system prompt used for generating a dish's shopping list.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
pub const SHOPPING_LIST_PROMPT: &str = include_str!("prompt.txt");

/// Build the user message for one dish, including servings and dietary restrictions.
pub fn build_user_prompt(dish: &DishRequest, preferences: &Preferences) -> String {
    let mut prompt = format!(
        "Dish: \"{}\"\nServings: {}",
        dish.name(),
        preferences.servings
    );

    let restrictions: Vec<&str> = preferences
        .dietary_restrictions
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();

    if !restrictions.is_empty() {
        prompt.push_str(&format!("\nDietary restrictions: {}", restrictions.join(", ")));
    }

    prompt
}
