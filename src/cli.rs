use clap::Parser;
use std::path::PathBuf;

use crate::builder::Provider;
use crate::model::Preferences;

/// Build a categorized grocery list for the dishes you plan to cook
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dish names; read from --file or stdin when omitted
    pub dishes: Vec<String>,

    /// Text file with one dish per line
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Number of people to shop for
    #[arg(
        short,
        long = "serving-size",
        default_value_t = 4,
        value_parser = clap::value_parser!(u8)
            .range(i64::from(Preferences::MIN_SERVINGS)..=i64::from(Preferences::MAX_SERVINGS))
    )]
    pub servings: u8,

    /// Dietary restriction, repeatable (e.g. --diet vegetarian --diet gluten-free)
    #[arg(short, long = "diet")]
    pub diet: Vec<String>,

    /// Skip YouTube transcript lookup
    #[arg(long)]
    pub no_video: bool,

    /// LLM provider overriding the configured default
    #[arg(short, long, value_parser = ["groq", "openai", "anthropic", "ollama"])]
    pub provider: Option<String>,

    /// Model name for the provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// Write the plain-text list to this path
    #[arg(short, long, conflicts_with = "export")]
    pub output: Option<PathBuf>,

    /// Write the plain-text list to a timestamped file in the current directory
    #[arg(long)]
    pub export: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn provider(&self) -> Option<Provider> {
        self.provider.as_deref().and_then(Provider::from_name)
    }

    /// Dishes given as arguments plus those read from `extra` input, in order
    pub fn dish_lines(&self, extra: Option<&str>) -> String {
        let mut lines = self.dishes.join("\n");
        if let Some(extra) = extra {
            if !lines.is_empty() {
                lines.push('\n');
            }
            lines.push_str(extra);
        }
        lines
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
