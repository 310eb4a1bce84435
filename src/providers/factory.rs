use crate::config::{AppConfig, ProviderConfig};
use crate::error::GroceryError;
use crate::providers::{
    AnthropicProvider, GroqProvider, LlmProvider, OllamaProvider, OpenAIProvider,
};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, GroceryError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(GroceryError::ConfigError(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "groq" => Ok(Box::new(GroqProvider::new(config, timeout)?)),
            "openai" => Ok(Box::new(OpenAIProvider::new(config, timeout)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config, timeout)?)),
            "ollama" => Ok(Box::new(OllamaProvider::new(config, timeout)?)),
            _ => Err(GroceryError::ConfigError(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(config: &AppConfig) -> Result<Box<dyn LlmProvider>, GroceryError> {
        let provider_name = &config.default_provider;
        let provider_config = config.providers.get(provider_name).ok_or_else(|| {
            GroceryError::ConfigError(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        Self::create(provider_name, provider_config, config.timeout())
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["groq", "openai", "anthropic", "ollama"]
    }
}
