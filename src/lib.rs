pub mod builder;
pub mod classifier;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod merger;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod providers;
pub mod video;

use std::sync::Arc;

use log::debug;

// Re-export commonly used types
pub use builder::{GroceryList, Provider, ShoppingListBuilder};
pub use collector::{parse_ingredient_response, CollectedRecipe, RecipeCollector};
pub use config::AppConfig;
pub use error::GroceryError;
pub use export::{export_file_name, export_text, render, DisplayModel, DisplaySection};
pub use merger::{merge, merge_with_policy, MergePolicy};
pub use model::{
    Category, DishRequest, Ingredient, Preferences, ShoppingList, ShoppingSection, Source,
    VideoInfo,
};
pub use pipeline::{generate, DishFailure, GenerationResult};

/// Generate a shopping list for the given dishes using `config.toml` and the environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = grocery_list::generate_shopping_list(&["Pancakes", "Omelette"]).await?;
/// print!("{}", grocery_list::export_text(&result.list));
/// # Ok(())
/// # }
/// ```
pub async fn generate_shopping_list(dishes: &[&str]) -> Result<GenerationResult, GroceryError> {
    GroceryList::builder().dishes(dishes.iter().copied()).build().await
}

/// Run the pipeline with an already validated configuration
pub async fn generate_with_config(
    config: &AppConfig,
    dishes: Vec<DishRequest>,
    preferences: Preferences,
    use_video: bool,
) -> Result<GenerationResult, GroceryError> {
    let collector = RecipeCollector::from_config(config, preferences, use_video)?;
    debug!(
        "Collector ready (video: {}) for {} dishes",
        collector.has_video(),
        dishes.len()
    );
    Ok(generate(Arc::new(collector), dishes, config.merge.prefer).await)
}
