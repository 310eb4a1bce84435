use crate::error::GroceryError;
use crate::merger::MergePolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used for ingredient generation
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// YouTube recipe lookup
    #[serde(default)]
    pub video: VideoConfig,
    /// Duplicate resolution
    #[serde(default)]
    pub merge: MergeConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for a specific LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "llama3-8b-8192", "gpt-4o-mini"); empty means the
    /// provider's default model
    #[serde(default)]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Configuration for provider fallback and retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of attempts per provider before moving on
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Delay between retries in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Configuration for the YouTube recipe lookup
#[derive(Debug, Deserialize, Clone)]
pub struct VideoConfig {
    /// Whether video lookup is used when a key is available
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// YouTube Data API key (falls back to YOUTUBE_API_KEY)
    pub api_key: Option<String>,
    /// Number of search results requested per dish
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Number of transcripts read per dish
    #[serde(default = "default_transcripts_per_dish")]
    pub transcripts_per_dish: usize,
    /// Override for the Data API base URL
    pub api_base_url: Option<String>,
    /// Override for the timed-text base URL
    pub transcript_base_url: Option<String>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            max_results: default_max_results(),
            transcripts_per_dish: default_transcripts_per_dish(),
            api_base_url: None,
            transcript_base_url: None,
        }
    }
}

impl VideoConfig {
    /// API key from config, then the environment. `None` disables video features.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key_or(std::env::var("YOUTUBE_API_KEY").ok())
    }

    /// API key from config, then `fallback`, ignoring blank values
    pub(crate) fn api_key_or(&self, fallback: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(fallback)
            .filter(|k| !k.trim().is_empty())
    }
}

/// Configuration for merging AI and video ingredients
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MergeConfig {
    #[serde(default)]
    pub prefer: MergePolicy,
}

// Default value functions
fn default_provider() -> String {
    "groq".to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert("groq".to_string(), ProviderConfig::for_provider("groq"));
    providers
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_max_results() -> u32 {
    5
}

fn default_transcripts_per_dish() -> usize {
    3
}

fn default_timeout() -> u64 {
    30
}

/// Environment variable consulted for a provider's key when the config has none
pub fn api_key_env_var(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "groq" => Some("GROQ_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        _ => None,
    }
}

/// Model used when a provider is selected without configuration
pub fn default_model(provider_name: &str) -> &'static str {
    match provider_name {
        "openai" => "gpt-4o-mini",
        "anthropic" => "claude-3-5-haiku-latest",
        "ollama" => "llama3",
        _ => "llama3-8b-8192",
    }
}

impl ProviderConfig {
    /// Default settings for a provider that has no entry in the config file
    pub fn for_provider(provider_name: &str) -> Self {
        ProviderConfig {
            enabled: true,
            model: default_model(provider_name).to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: default_providers(),
            fallback: FallbackConfig::default(),
            video: VideoConfig::default(),
            merge: MergeConfig::default(),
            timeout: default_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with GROCERY__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: GROCERY__PROVIDERS__GROQ__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Give providers configured without a model their default one
    fn fill_provider_defaults(&mut self) {
        for (name, provider) in self.providers.iter_mut() {
            if provider.model.trim().is_empty() {
                provider.model = default_model(name).to_string();
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Check that the default provider can be constructed.
    ///
    /// A missing LLM key is fatal; a missing video key only disables video features.
    pub fn validate(&self) -> Result<(), GroceryError> {
        let provider = self.providers.get(&self.default_provider).ok_or_else(|| {
            GroceryError::ConfigError(format!(
                "Default provider '{}' not found in configuration",
                self.default_provider
            ))
        })?;

        if !provider.enabled {
            return Err(GroceryError::ConfigError(format!(
                "Provider '{}' is not enabled in configuration",
                self.default_provider
            )));
        }

        if let Some(var) = api_key_env_var(&self.default_provider) {
            let has_key = provider
                .api_key
                .as_deref()
                .is_some_and(|k| !k.trim().is_empty())
                || std::env::var(var).is_ok_and(|k| !k.trim().is_empty());
            if !has_key {
                return Err(GroceryError::ConfigError(format!(
                    "{} environment variable is required",
                    var
                )));
            }
        }

        Ok(())
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_with_env(environment())
}

fn environment() -> Environment {
    // Use double underscore for nested: GROCERY__PROVIDERS__GROQ__API_KEY
    Environment::with_prefix("GROCERY")
        .separator("__")
        .try_parsing(true)
}

fn load_with_env(env: Environment) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Keeps the groq entry when only some of its keys are overridden
        .set_default("providers.groq.model", default_model("groq"))?
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(env)
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;
    config.fill_provider_defaults();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "test-model".to_string(),
            temperature: 0.2,
            max_tokens: 2000,
            api_key: api_key.map(String::from),
            base_url: None,
        }
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "groq");
        assert_eq!(config.providers["groq"].model, "llama3-8b-8192");
        assert_eq!(config.providers["groq"].temperature, 0.2);
        assert_eq!(config.video.max_results, 5);
        assert_eq!(config.merge.prefer, MergePolicy::PreferAi);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_fallback_config_default() {
        let fallback = FallbackConfig::default();
        assert!(!fallback.enabled);
        assert!(fallback.order.is_empty());
        assert_eq!(fallback.retry_attempts, 3);
        assert_eq!(fallback.retry_delay_ms, 1000);
    }

    #[test]
    fn test_validate_accepts_configured_key() {
        let mut config = AppConfig::default();
        config
            .providers
            .insert("groq".to_string(), provider(Some("gsk-test")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_default() {
        let config = AppConfig {
            default_provider: "nope".to_string(),
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_validate_rejects_disabled_provider() {
        let mut config = AppConfig::default();
        let mut groq = provider(Some("gsk-test"));
        groq.enabled = false;
        config.providers.insert("groq".to_string(), groq);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not enabled"));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let mut config = AppConfig {
            default_provider: "ollama".to_string(),
            ..AppConfig::default()
        };
        config.providers.insert("ollama".to_string(), provider(None));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_defaults_by_name() {
        assert_eq!(ProviderConfig::for_provider("openai").model, "gpt-4o-mini");
        assert_eq!(ProviderConfig::for_provider("ollama").model, "llama3");
        assert_eq!(ProviderConfig::for_provider("groq").temperature, 0.2);
    }

    #[test]
    fn test_env_key_alone_loads_provider() {
        let vars = HashMap::from([
            (
                "GROCERY__PROVIDERS__GROQ__API_KEY".to_string(),
                "gsk-env".to_string(),
            ),
            (
                "GROCERY__PROVIDERS__OPENAI__API_KEY".to_string(),
                "sk-env".to_string(),
            ),
        ]);

        let config = load_with_env(environment().source(Some(vars))).unwrap();
        let groq = &config.providers["groq"];
        assert_eq!(groq.api_key.as_deref(), Some("gsk-env"));
        assert_eq!(groq.model, "llama3-8b-8192");
        assert!(groq.enabled);
        assert_eq!(config.providers["openai"].model, "gpt-4o-mini");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_video_key_counts_as_missing() {
        let video = VideoConfig {
            api_key: Some("  ".to_string()),
            ..VideoConfig::default()
        };
        assert_eq!(video.api_key_or(None), None);
        assert_eq!(
            video.api_key_or(Some("yt-env".to_string())).as_deref(),
            Some("yt-env")
        );
    }

    #[test]
    fn test_video_key_from_config() {
        let video = VideoConfig {
            api_key: Some("yt-key".to_string()),
            ..VideoConfig::default()
        };
        assert_eq!(video.resolved_api_key().as_deref(), Some("yt-key"));
    }

    #[test]
    fn test_merge_policy_from_toml() {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                "[merge]\nprefer = \"video\"\n[video]\nmax_results = 2\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.merge.prefer, MergePolicy::PreferVideo);
        assert_eq!(config.video.max_results, 2);
        assert!(config.providers.contains_key("groq"));
    }
}
