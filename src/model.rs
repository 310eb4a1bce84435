use serde::{Deserialize, Serialize};
use std::fmt;

/// Grocery-aisle grouping for an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Produce,
    #[serde(rename = "Meat & Seafood")]
    MeatSeafood,
    #[serde(rename = "Dairy & Eggs")]
    DairyEggs,
    #[serde(rename = "Pantry Staples")]
    Pantry,
    Bakery,
    Condiments,
    Frozen,
    Other,
}

impl Category {
    /// Order in which categories are shown and exported
    pub const DISPLAY_ORDER: [Category; 8] = [
        Category::Produce,
        Category::MeatSeafood,
        Category::DairyEggs,
        Category::Pantry,
        Category::Bakery,
        Category::Condiments,
        Category::Frozen,
        Category::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::MeatSeafood => "Meat & Seafood",
            Category::DairyEggs => "Dairy & Eggs",
            Category::Pantry => "Pantry Staples",
            Category::Bakery => "Bakery",
            Category::Condiments => "Condiments",
            Category::Frozen => "Frozen",
            Category::Other => "Other",
        }
    }

    fn rank(&self) -> usize {
        Self::DISPLAY_ORDER
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::DISPLAY_ORDER.len())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Where an ingredient came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Ai,
    Video,
}

/// A single shopping-list line item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    /// Text as received from the source
    pub raw: String,
    /// Lowercase, unit and quantity stripped; the dedup key
    pub name: String,
    pub quantity: Option<String>,
    pub category: Category,
    pub source: Source,
}

impl Ingredient {
    /// Create an unprocessed ingredient. Name and category are filled in by the merger.
    pub fn from_raw(raw: impl Into<String>, source: Source) -> Self {
        Ingredient {
            raw: raw.into(),
            name: String::new(),
            quantity: None,
            category: Category::Other,
            source,
        }
    }

    /// Attach a quantity reported separately from the ingredient text
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        let quantity = quantity.into();
        let trimmed = quantity.trim();
        self.quantity = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn has_quantity(&self) -> bool {
        self.quantity.as_deref().is_some_and(|q| !q.trim().is_empty())
    }
}

/// One category of a shopping list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingSection {
    pub category: Category,
    pub items: Vec<Ingredient>,
}

/// A categorized, deduplicated shopping list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShoppingList {
    pub dishes: Vec<String>,
    pub sections: Vec<ShoppingSection>,
}

impl ShoppingList {
    /// Build a list from sections, dropping empty ones and sorting by display order
    pub fn from_sections(mut sections: Vec<ShoppingSection>) -> Self {
        sections.retain(|s| !s.items.is_empty());
        sections.sort_by_key(|s| s.category.rank());
        ShoppingList {
            dishes: Vec::new(),
            sections,
        }
    }

    pub fn with_dishes(mut self, dishes: Vec<String>) -> Self {
        self.dishes = dishes;
        self
    }

    pub fn get(&self, category: Category) -> Option<&[Ingredient]> {
        self.sections
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.items.as_slice())
    }

    pub fn find(&self, name: &str) -> Option<&Ingredient> {
        self.items().find(|i| i.name == name)
    }

    pub fn items(&self) -> impl Iterator<Item = &Ingredient> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.sections.iter().map(|s| s.category).collect()
    }

    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A user-entered dish name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishRequest {
    name: String,
}

impl DishRequest {
    /// Returns `None` for blank input
    pub fn new(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(DishRequest {
                name: trimmed.to_string(),
            })
        }
    }

    /// Split form input into one request per non-blank line
    pub fn parse_lines(input: &str) -> Vec<Self> {
        input.lines().filter_map(DishRequest::new).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A cooking tutorial found for a dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub description: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
}

impl VideoInfo {
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }
}

/// User preferences fed into the LLM prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub servings: u8,
    pub dietary_restrictions: Vec<String>,
}

impl Preferences {
    pub const MIN_SERVINGS: u8 = 1;
    pub const MAX_SERVINGS: u8 = 10;

    pub fn with_servings(mut self, servings: u8) -> Self {
        self.servings = servings.clamp(Self::MIN_SERVINGS, Self::MAX_SERVINGS);
        self
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            servings: 4,
            dietary_restrictions: Vec::new(),
        }
    }
}
