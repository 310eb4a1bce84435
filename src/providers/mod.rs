mod anthropic;
mod factory;
mod fallback;
mod groq;
mod ollama;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use groq::GroqProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_user_prompt, SHOPPING_LIST_PROMPT};

use crate::error::GroceryError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Unified trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "groq", "anthropic")
    fn provider_name(&self) -> &str;

    /// Send a system and user prompt, returning the model's text reply
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, GroceryError>;
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, GroceryError> {
    Ok(Client::builder().timeout(timeout).build()?)
}
