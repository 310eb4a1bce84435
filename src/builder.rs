use std::time::Duration;

use log::debug;

use crate::config::{AppConfig, ProviderConfig};
use crate::model::{DishRequest, Preferences};
use crate::pipeline::GenerationResult;
use crate::{generate_with_config, GroceryError};

/// LLM backend selectable from the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Groq,
    OpenAI,
    Anthropic,
    Ollama,
}

impl Provider {
    /// Look up a provider by its factory name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "groq" => Some(Provider::Groq),
            "openai" => Some(Provider::OpenAI),
            "anthropic" => Some(Provider::Anthropic),
            "ollama" => Some(Provider::Ollama),
            _ => None,
        }
    }

    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Ollama => "ollama",
        }
    }
}

/// Builder for configuring and running a shopping-list generation
#[derive(Debug, Default)]
pub struct ShoppingListBuilder {
    dishes: Vec<DishRequest>,
    preferences: Preferences,
    use_video: Option<bool>,
    provider: Option<Provider>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    config: Option<AppConfig>,
}

impl ShoppingListBuilder {
    /// Add a dish. Blank names are ignored.
    ///
    /// # Example
    /// ```
    /// use grocery_list::GroceryList;
    ///
    /// let builder = GroceryList::builder()
    ///     .dish("Spaghetti Carbonara")
    ///     .dish("Caesar Salad");
    /// ```
    pub fn dish(mut self, name: &str) -> Self {
        self.dishes.extend(DishRequest::new(name));
        self
    }

    /// Add several dishes at once
    pub fn dishes<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.dishes
            .extend(names.into_iter().filter_map(DishRequest::new));
        self
    }

    /// Add dishes from multi-line text, one dish per non-blank line
    ///
    /// # Example
    /// ```
    /// use grocery_list::GroceryList;
    ///
    /// let builder = GroceryList::builder().text("Pancakes\n\nOmelette\n");
    /// ```
    pub fn text(mut self, input: &str) -> Self {
        self.dishes.extend(DishRequest::parse_lines(input));
        self
    }

    /// Number of people to shop for, clamped to 1..=10
    pub fn servings(mut self, servings: u8) -> Self {
        self.preferences = self.preferences.with_servings(servings);
        self
    }

    /// Add a dietary restriction such as "vegetarian" or "gluten-free"
    pub fn dietary_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.preferences.dietary_restrictions.push(restriction.into());
        self
    }

    /// Enable or disable YouTube transcript lookup (enabled by default)
    pub fn use_video(mut self, enabled: bool) -> Self {
        self.use_video = Some(enabled);
        self
    }

    /// Set the LLM provider
    ///
    /// # Example
    /// ```
    /// use grocery_list::{GroceryList, Provider};
    ///
    /// let builder = GroceryList::builder()
    ///     .dish("Chili")
    ///     .provider(Provider::Anthropic);
    /// ```
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the LLM provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the LLM provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a timeout for HTTP requests, rounded up to whole seconds
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Use an explicit configuration instead of loading `config.toml` and the environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Resolve the configuration with builder overrides applied
    fn resolve_config(&mut self) -> Result<AppConfig, GroceryError> {
        let mut config = match self.config.take() {
            Some(config) => config,
            None => AppConfig::load()?,
        };

        if let Some(provider) = self.provider {
            config.default_provider = provider.as_str().to_string();
            config.fallback.enabled = false;
        }

        let provider_name = config.default_provider.clone();
        if self.api_key.is_some() || self.model.is_some() {
            let entry = config
                .providers
                .entry(provider_name.clone())
                .or_insert_with(|| ProviderConfig::for_provider(&provider_name));
            if let Some(key) = self.api_key.take() {
                entry.api_key = Some(key);
            }
            if let Some(model) = self.model.take() {
                entry.model = model;
            }
        } else if !config.providers.contains_key(&provider_name) && self.provider.is_some() {
            config.providers.insert(
                provider_name.clone(),
                ProviderConfig::for_provider(&provider_name),
            );
        }

        if let Some(timeout) = self.timeout {
            let partial = u64::from(timeout.subsec_nanos() > 0);
            config.timeout = timeout.as_secs().saturating_add(partial).max(1);
        }

        Ok(config)
    }

    /// Build and run the generation
    ///
    /// # Errors
    /// Returns `GroceryError` if:
    /// - No dish was given
    /// - Configuration cannot be loaded
    /// - The LLM provider has no API key
    ///
    /// Per-dish LLM failures are not errors; they are reported in
    /// [`GenerationResult::failures`].
    ///
    /// # Example
    /// ```no_run
    /// # use grocery_list::GroceryList;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = GroceryList::builder()
    ///     .dish("Pancakes")
    ///     .servings(2)
    ///     .build()
    ///     .await?;
    /// println!("{} items", result.list.total_items());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(mut self) -> Result<GenerationResult, GroceryError> {
        if self.dishes.is_empty() {
            return Err(GroceryError::BuilderError(
                "No dishes specified. Use .dish(), .dishes() or .text()".to_string(),
            ));
        }

        let config = self.resolve_config()?;
        config.validate()?;

        let use_video = self.use_video.unwrap_or(true);
        debug!(
            "Generating for {} dishes with provider '{}' (video: {})",
            self.dishes.len(),
            config.default_provider,
            use_video
        );

        generate_with_config(&config, self.dishes, self.preferences, use_video).await
    }
}

/// Main entry point for the builder API
pub struct GroceryList;

impl GroceryList {
    /// Creates a new builder for generating a shopping list
    ///
    /// # Example
    /// ```
    /// use grocery_list::GroceryList;
    ///
    /// let builder = GroceryList::builder();
    /// ```
    pub fn builder() -> ShoppingListBuilder {
        ShoppingListBuilder::default()
    }
}
