use crate::config::AppConfig;
use crate::error::GroceryError;
use crate::model::{DishRequest, Ingredient, Preferences, Source, VideoInfo};
use crate::providers::{build_user_prompt, FallbackProvider, LlmProvider, SHOPPING_LIST_PROMPT};
use crate::video::{extract_ingredients, extract_instructions, YouTubeClient};
use log::{debug, info, warn};
use serde_json::Value;

/// Everything gathered for one dish before merging
#[derive(Debug, Clone, Default)]
pub struct CollectedRecipe {
    pub dish: String,
    pub ai_ingredients: Vec<Ingredient>,
    pub video_ingredients: Vec<Ingredient>,
    /// The tutorial whose transcript was read, else the top search hit
    pub video: Option<VideoInfo>,
    /// Tutorials whose transcripts contributed ingredients or steps
    pub tutorials: Vec<VideoInfo>,
    pub instructions: Vec<String>,
    /// Why the LLM produced no ingredients, if it failed
    pub ai_error: Option<String>,
}

#[derive(Default)]
struct VideoData {
    ingredients: Vec<Ingredient>,
    video: Option<VideoInfo>,
    tutorials: Vec<VideoInfo>,
    instructions: Vec<String>,
}

/// Gathers AI and video ingredients for dishes
pub struct RecipeCollector {
    llm: Box<dyn LlmProvider>,
    video: Option<YouTubeClient>,
    preferences: Preferences,
    transcripts_per_dish: usize,
}

impl RecipeCollector {
    pub fn new(llm: Box<dyn LlmProvider>, preferences: Preferences) -> Self {
        RecipeCollector {
            llm,
            video: None,
            preferences,
            transcripts_per_dish: 3,
        }
    }

    pub fn with_video(mut self, client: YouTubeClient, transcripts_per_dish: usize) -> Self {
        self.video = Some(client);
        self.transcripts_per_dish = transcripts_per_dish;
        self
    }

    /// Build a collector from configuration. Video lookup is attached only when
    /// requested and a YouTube key is available.
    pub fn from_config(
        config: &AppConfig,
        preferences: Preferences,
        use_video: bool,
    ) -> Result<Self, GroceryError> {
        let llm = FallbackProvider::new(config)?;
        let collector = RecipeCollector::new(Box::new(llm), preferences);

        if !use_video {
            return Ok(collector);
        }

        Ok(match YouTubeClient::new(&config.video, config.timeout())? {
            Some(client) => collector.with_video(client, config.video.transcripts_per_dish),
            None => collector,
        })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    /// Collect ingredients, tutorials and steps for one dish.
    ///
    /// Never fails: an LLM failure is recorded in `ai_error` and video
    /// problems leave the video fields empty.
    pub async fn collect(&self, dish: &DishRequest) -> CollectedRecipe {
        info!("Collecting ingredients for '{}'", dish);

        let (ai_ingredients, ai_error) = match self.ai_ingredients(dish).await {
            Ok(items) => (items, None),
            Err(e) => {
                warn!("No AI ingredients for '{}': {}", dish, e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        let video = self.video_data(dish).await;

        CollectedRecipe {
            dish: dish.name().to_string(),
            ai_ingredients,
            video_ingredients: video.ingredients,
            video: video.video,
            tutorials: video.tutorials,
            instructions: video.instructions,
            ai_error,
        }
    }

    async fn ai_ingredients(&self, dish: &DishRequest) -> Result<Vec<Ingredient>, GroceryError> {
        let user_prompt = build_user_prompt(dish, &self.preferences);
        let reply = self.llm.complete(SHOPPING_LIST_PROMPT, &user_prompt).await?;

        let items = parse_ingredient_response(&reply);
        if items.is_empty() {
            return Err(GroceryError::LlmError(format!(
                "{} returned no ingredients",
                self.llm.provider_name()
            )));
        }

        debug!("{} AI ingredients for '{}'", items.len(), dish);
        Ok(items)
    }

    async fn video_data(&self, dish: &DishRequest) -> VideoData {
        let Some(client) = &self.video else {
            return VideoData::default();
        };

        let tutorials = match client.search_recipe_videos(dish.name()).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!("Video search failed for '{}': {}", dish, e);
                return VideoData::default();
            }
        };

        let mut data = VideoData::default();
        for video in tutorials.iter().take(self.transcripts_per_dish) {
            let transcript = match client.transcript(&video.video_id).await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    debug!("No transcript for video {}", video.video_id);
                    continue;
                }
                Err(e) => {
                    debug!("Transcript unavailable for {}: {}", video.video_id, e);
                    continue;
                }
            };

            data.ingredients.extend(
                extract_ingredients(&transcript)
                    .into_iter()
                    .map(|raw| Ingredient::from_raw(raw, Source::Video)),
            );
            for step in extract_instructions(&transcript) {
                if !data.instructions.contains(&step) {
                    data.instructions.push(step);
                }
            }
            data.tutorials.push(video.clone());
        }

        data.video = data
            .tutorials
            .first()
            .or_else(|| tutorials.first())
            .cloned();
        debug!(
            "{} video ingredients for '{}' from {} of {} tutorials",
            data.ingredients.len(),
            dish,
            data.tutorials.len(),
            tutorials.len()
        );
        data
    }
}

/// Parse an LLM reply into ingredients, tolerating the shapes models tend to produce.
///
/// Accepts `{"ingredients": [...]}`, an object of category arrays, or a bare
/// array, whose entries are strings or `{name, quantity}` objects. Anything
/// that is not JSON is read as one ingredient per line. Category hints in the
/// reply are ignored.
pub fn parse_ingredient_response(text: &str) -> Vec<Ingredient> {
    let body = strip_code_fence(text);

    let value = serde_json::from_str::<Value>(body).ok().or_else(|| {
        let start = body.find(['{', '['])?;
        let end = body.rfind(['}', ']'])?;
        if end <= start {
            return None;
        }
        serde_json::from_str::<Value>(&body[start..=end]).ok()
    });

    match value {
        Some(value) => entries_from_json(&value),
        None => entries_from_lines(body),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.split_once('\n') {
        // Drop the language tag line
        Some((_, body)) => body,
        // ```json {...}``` on one line
        None => match rest.split_once(char::is_whitespace) {
            Some((tag, body))
                if tag.chars().all(|c| c.is_ascii_alphanumeric())
                    && body.trim_start().starts_with(['{', '[']) =>
            {
                body
            }
            _ => rest,
        },
    };
    rest.trim_end().trim_end_matches("```").trim()
}

fn entries_from_json(value: &Value) -> Vec<Ingredient> {
    match value {
        Value::Array(entries) => entries.iter().filter_map(entry_to_ingredient).collect(),
        Value::Object(map) => match map.get("ingredients") {
            Some(inner) => entries_from_json(inner),
            // {"Produce": [...], "Dairy": [...]}, in reply order
            None => map
                .values()
                .filter_map(Value::as_array)
                .flatten()
                .filter_map(entry_to_ingredient)
                .collect(),
        },
        Value::String(s) => entries_from_lines(s),
        _ => Vec::new(),
    }
}

fn entry_to_ingredient(entry: &Value) -> Option<Ingredient> {
    match entry {
        Value::String(s) if !s.trim().is_empty() => {
            Some(Ingredient::from_raw(s.trim(), Source::Ai))
        }
        Value::Object(map) => {
            let name = map
                .get("name")
                .or_else(|| map.get("item"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|n| !n.is_empty())?;
            let item = Ingredient::from_raw(name, Source::Ai);
            Some(match map.get("quantity").or_else(|| map.get("amount")) {
                Some(Value::String(q)) => item.with_quantity(q.as_str()),
                Some(Value::Number(n)) => item.with_quantity(n.to_string()),
                _ => item,
            })
        }
        _ => None,
    }
}

fn entries_from_lines(text: &str) -> Vec<Ingredient> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .map(|line| Ingredient::from_raw(line, Source::Ai))
        .collect()
}

/// Remove bullets and `1.` / `1)` numbering, leaving amounts like `1 cup` alone
fn strip_list_marker(line: &str) -> &str {
    let line = line
        .trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '·'))
        .trim_start();

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(after) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return after.trim();
        }
    }
    line.trim()
}
