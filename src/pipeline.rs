use crate::collector::{CollectedRecipe, RecipeCollector};
use crate::merger::{merge_with_policy, MergePolicy};
use crate::model::{DishRequest, Ingredient, ShoppingList, VideoInfo};
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;

const MAX_INSTRUCTIONS: usize = 15;

/// A dish whose ingredients could not be generated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishFailure {
    pub dish: String,
    pub message: String,
}

/// Outcome of one shopping-list run
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationResult {
    pub list: ShoppingList,
    pub failures: Vec<DishFailure>,
    pub tutorials: Vec<VideoInfo>,
    pub instructions: Vec<String>,
}

impl GenerationResult {
    /// Combine per-dish results, in dish order, into one list
    pub fn from_recipes(recipes: Vec<CollectedRecipe>, policy: MergePolicy) -> Self {
        let mut ai: Vec<Ingredient> = Vec::new();
        let mut video: Vec<Ingredient> = Vec::new();
        let mut dishes = Vec::new();
        let mut failures = Vec::new();
        let mut tutorials: Vec<VideoInfo> = Vec::new();
        let mut instructions: Vec<String> = Vec::new();

        for recipe in recipes {
            if let Some(message) = recipe.ai_error {
                failures.push(DishFailure {
                    dish: recipe.dish.clone(),
                    message,
                });
            }

            ai.extend(recipe.ai_ingredients);
            video.extend(recipe.video_ingredients);

            // Without a readable transcript the top search hit still links a tutorial
            let watched: Vec<VideoInfo> = if recipe.tutorials.is_empty() {
                recipe.video.into_iter().collect()
            } else {
                recipe.tutorials
            };
            for tutorial in watched {
                if !tutorials.iter().any(|t| t.video_id == tutorial.video_id) {
                    tutorials.push(tutorial);
                }
            }

            for step in recipe.instructions {
                if instructions.len() < MAX_INSTRUCTIONS && !instructions.contains(&step) {
                    instructions.push(step);
                }
            }

            dishes.push(recipe.dish);
        }

        let list = merge_with_policy(&ai, &video, policy).with_dishes(dishes);
        info!(
            "Shopping list has {} items in {} categories",
            list.total_items(),
            list.sections.len()
        );

        GenerationResult {
            list,
            failures,
            tutorials,
            instructions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Collect every dish concurrently and merge the results.
///
/// Results are combined in the order the dishes were given, regardless of
/// which finished first. A failed dish is reported in `failures` and does not
/// affect the others.
pub async fn generate(
    collector: Arc<RecipeCollector>,
    dishes: Vec<DishRequest>,
    policy: MergePolicy,
) -> GenerationResult {
    let mut tasks = JoinSet::new();
    for (position, dish) in dishes.iter().cloned().enumerate() {
        let collector = Arc::clone(&collector);
        tasks.spawn(async move { (position, collector.collect(&dish).await) });
    }

    let mut slots: Vec<Option<CollectedRecipe>> = vec![None; dishes.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((position, recipe)) => slots[position] = Some(recipe),
            Err(e) => error!("Dish task failed: {}", e),
        }
    }

    let recipes = slots
        .into_iter()
        .zip(dishes)
        .map(|(slot, dish)| {
            slot.unwrap_or_else(|| {
                warn!("No result for '{}'", dish);
                CollectedRecipe {
                    dish: dish.name().to_string(),
                    ai_error: Some("Dish processing was interrupted".to_string()),
                    ..CollectedRecipe::default()
                }
            })
        })
        .collect();

    GenerationResult::from_recipes(recipes, policy)
}
