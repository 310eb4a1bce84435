//! Best-effort recipe data from spoken transcripts.
//!
//! Nothing here fails: a transcript with no recognizable ingredients or
//! steps simply yields empty lists.

use crate::normalizer::{is_glued_amount, is_number, is_unit};

const INGREDIENT_MARKERS: &[&str] = &["ingredients:"];
const INSTRUCTION_MARKERS: &[&str] = &["instructions:", "directions:", "method:", "steps:"];

const SMALL_AMOUNTS: &[&str] = &["pinch", "dash", "handful"];
const PREP_WORDS: &[&str] = &["chopped", "diced", "sliced", "minced", "grated"];

/// Words that end an ingredient name in running speech
const CONNECTIVES: &[&str] = &[
    "and", "then", "to", "into", "with", "in", "for", "until", "or", "but", "so", "we", "you",
    "i", "it", "that", "this", "on", "at",
];

const SEQUENCE_WORDS: &[&str] = &["first", "then", "next", "after", "now", "finally"];
const COOKING_VERBS: &[&str] = &[
    "heat", "cook", "add", "mix", "stir", "pour", "place", "put", "season", "serve", "preheat",
    "boil", "simmer", "sauté", "saute", "fry", "bake", "roast", "grill",
];

const MAX_NAME_WORDS: usize = 4;
const MAX_INSTRUCTIONS: usize = 10;

/// Pull ingredient lines out of a transcript
pub fn extract_ingredients(transcript: &str) -> Vec<String> {
    let mut found = section_lines(transcript, INGREDIENT_MARKERS, INSTRUCTION_MARKERS);
    found.extend(amount_phrases(transcript));

    dedup(
        found
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| (4..100).contains(&line.chars().count())),
    )
}

/// Pull cooking steps out of a transcript, at most ten
pub fn extract_instructions(transcript: &str) -> Vec<String> {
    let mut found = section_lines(transcript, INSTRUCTION_MARKERS, INGREDIENT_MARKERS);

    // Caption segments break mid-sentence, so sentences are read across lines
    let flattened = transcript.split_whitespace().collect::<Vec<_>>().join(" ");
    found.extend(
        flattened
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| s.chars().count() > 10 && is_instruction(s))
            .map(String::from),
    );

    let mut steps = dedup(found.into_iter());
    steps.truncate(MAX_INSTRUCTIONS);
    steps
}

/// Lines following a start marker until a blank line or an end marker.
/// Text after the marker on its own line is split on commas.
fn section_lines(text: &str, start_markers: &[&str], end_markers: &[&str]) -> Vec<String> {
    let mut lines = text.lines();
    let mut found = Vec::new();

    let inline = loop {
        let Some(line) = lines.next() else {
            return found;
        };
        let lowered = line.to_lowercase();
        if let Some(pos) = start_markers.iter().find_map(|m| {
            lowered.find(m).map(|p| p + m.len())
        }) {
            // Lowercasing can shift byte offsets for non-ASCII text
            break lowered.get(pos..).unwrap_or("").to_string();
        }
    };

    found.extend(
        inline
            .split(',')
            .map(strip_bullet)
            .filter(|item| !item.is_empty())
            .map(String::from),
    );

    for line in lines {
        let lowered = line.to_lowercase();
        if line.trim().is_empty() || end_markers.iter().any(|m| lowered.contains(m)) {
            break;
        }
        let item = strip_bullet(line);
        if !item.is_empty() {
            found.push(item.to_string());
        }
    }

    found
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '·') || c.is_whitespace())
        .trim()
}

/// A transcript word with its punctuation stripped
struct Token<'a> {
    text: &'a str,
    word: String,
    /// Followed by sentence punctuation or a line break
    ends_clause: bool,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for line in text.lines() {
        let mut words = line.split_whitespace().peekable();
        while let Some(raw) = words.next() {
            let text = bare(raw);
            let ends_clause =
                words.peek().is_none() || raw.ends_with(['.', ',', '!', '?', ';', ':']);
            tokens.push(Token {
                text,
                word: text.to_lowercase(),
                ends_clause,
            });
        }
    }
    tokens
}

/// Amount-led phrases spoken in running text, such as "2 cups of flour"
fn amount_phrases(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut found = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let word = tokens[i].word.as_str();
        let next = tokens.get(i + 1).map(|t| t.word.as_str()).unwrap_or("");

        let amount_end = if is_number(word) && is_unit(next) && !tokens[i + 1].ends_clause {
            Some(i + 2)
        } else if is_glued_amount(word) && !tokens[i].ends_clause {
            Some(i + 1)
        } else if matches!(word, "a" | "an")
            && SMALL_AMOUNTS.contains(&next)
            && tokens.get(i + 2).map(|t| t.word.as_str()) == Some("of")
        {
            Some(i + 2)
        } else {
            None
        };

        let phrase = match amount_end {
            Some(end) => amount_phrase(&tokens, i, end),
            None if is_number(word) => prepped_phrase(&tokens, i),
            None => None,
        };

        match phrase {
            Some((text, next_index)) => {
                found.push(text);
                i = next_index;
            }
            None => i += 1,
        }
    }

    found
}

/// `<amount> [of] <name words>`
fn amount_phrase(tokens: &[Token], start: usize, amount_end: usize) -> Option<(String, usize)> {
    let mut name_start = amount_end;
    if tokens.get(name_start).map(|t| t.word.as_str()) == Some("of") {
        name_start += 1;
    }

    let name_end = name_words_end(tokens, name_start);
    if name_end == name_start {
        return None;
    }

    let mut parts: Vec<&str> = tokens[start..amount_end].iter().map(|t| t.text).collect();
    if name_start > amount_end {
        parts.push("of");
    }
    parts.extend(tokens[name_start..name_end].iter().map(|t| t.text));
    Some((parts.join(" "), name_end))
}

/// `<number> <up to three words> <prep word>`, like "2 onions chopped"
fn prepped_phrase(tokens: &[Token], start: usize) -> Option<(String, usize)> {
    let limit = (start + 5).min(tokens.len());
    let prep = (start + 2..limit).find(|&k| PREP_WORDS.contains(&tokens[k].word.as_str()))?;

    if tokens[start + 1..prep].iter().any(|t| {
        t.word.is_empty() || CONNECTIVES.contains(&t.word.as_str()) || t.ends_clause
    }) {
        return None;
    }

    let parts: Vec<&str> = tokens[start..=prep].iter().map(|t| t.text).collect();
    Some((parts.join(" "), prep + 1))
}

/// Index just past the name words starting at `from`
fn name_words_end(tokens: &[Token], from: usize) -> usize {
    let mut end = from;
    while end < tokens.len() && end - from < MAX_NAME_WORDS {
        let token = &tokens[end];
        let word = token.word.as_str();
        if word.is_empty() || CONNECTIVES.contains(&word) || is_number(word) {
            break;
        }
        end += 1;
        if token.ends_clause {
            break;
        }
    }
    end
}

/// Token without surrounding punctuation
fn bare(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && !"/½¼¾⅓⅔".contains(c))
}

fn is_instruction(sentence: &str) -> bool {
    sentence
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .any(|w| SEQUENCE_WORDS.contains(&w.as_str()) || COOKING_VERBS.contains(&w.as_str()))
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
