mod transcript;
mod youtube;

pub use transcript::{extract_ingredients, extract_instructions};
pub use youtube::{parse_timed_text, YouTubeClient};
