//! Ingredient text cleanup.
//!
//! Turns free-form ingredient lines such as `"2 cups Shredded Cheddar Cheese"`
//! into a lowercase name usable as a dedup key, splitting off the leading
//! quantity so it can be shown next to the name later.

/// Units recognized in front of an ingredient name
const UNITS: &[&str] = &[
    "cup", "cups", "c", "tablespoon", "tablespoons", "tbsp", "tbs", "tbsps", "teaspoon",
    "teaspoons", "tsp", "tsps", "ounce", "ounces", "oz", "pound", "pounds", "lb", "lbs", "gram",
    "grams", "g", "kilogram", "kilograms", "kg", "milliliter", "milliliters", "ml", "liter",
    "liters", "litre", "litres", "l", "pint", "pints", "quart", "quarts", "gallon", "gallons",
    "pinch", "pinches", "dash", "dashes", "handful", "handfuls", "clove", "cloves", "piece",
    "pieces", "slice", "slices", "can", "cans", "package", "packages", "pkg", "bunch", "bunches",
    "stick", "sticks", "sprig", "sprigs", "head", "heads", "jar", "jars",
];

/// Units that double as food words ("head lettuce", "cloves"), stripped only
/// when something marks them as a measure
const FOOD_WORD_UNITS: &[&str] = &[
    "clove", "cloves", "piece", "pieces", "slice", "slices", "can", "cans", "bunch", "bunches",
    "stick", "sticks", "head", "heads", "jar", "jars",
];

/// Size words kept as part of the quantity when they follow a number
const SIZES: &[&str] = &["large", "medium", "small"];

const ARTICLES: &[&str] = &["a", "an"];

const UNICODE_FRACTIONS: &[char] = &['¼', '½', '¾', '⅓', '⅔', '⅛', '⅜', '⅝', '⅞'];

/// An ingredient line split into its name and leading amount
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedIngredient {
    /// Normalized name, empty when nothing food-like remains
    pub name: String,
    /// Leading amount such as `"2 cups"`, if one was present
    pub quantity: Option<String>,
}

/// Normalize a raw ingredient string into its dedup key.
///
/// Returns an empty string when nothing recognizable remains; callers must
/// discard such results.
pub fn normalize(raw: &str) -> String {
    parse(raw).name
}

/// Split a raw ingredient string into normalized name and quantity
pub fn parse(raw: &str) -> ParsedIngredient {
    let lowered = strip_parentheticals(&raw.to_lowercase());
    let tokens: Vec<&str> = lowered
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '·') || c.is_whitespace())
        .split_whitespace()
        .collect();

    let mut quantity: Vec<&str> = Vec::new();
    let mut article_seen = false;
    let mut last_was_unit = false;
    let mut last_was_number = false;
    let mut idx = 0;

    while idx < tokens.len() {
        let token = tokens[idx];
        let next = tokens.get(idx + 1).copied();

        if idx == 0 && ARTICLES.contains(&token) && next.is_some() {
            article_seen = true;
        } else if is_number(token) {
            quantity.push(token);
            last_was_number = true;
            last_was_unit = false;
        } else if is_glued_amount(token) {
            quantity.push(token);
            last_was_number = false;
            last_was_unit = true;
        } else if is_unit(token)
            && (last_was_number
                || next.is_some()
                    && (!is_food_word_unit(token)
                        || !quantity.is_empty()
                        || article_seen
                        || next == Some("of")))
        {
            quantity.push(token);
            last_was_number = false;
            last_was_unit = true;
        } else if token == "of" && last_was_unit {
            last_was_unit = false;
        } else if SIZES.contains(&token) && last_was_number && next.is_some() {
            quantity.push(token);
            last_was_number = false;
        } else {
            break;
        }
        idx += 1;
    }

    let name = clean_name(&tokens[idx..].join(" "));
    let quantity = if quantity.is_empty() {
        None
    } else {
        Some(quantity.join(" "))
    };

    ParsedIngredient { name, quantity }
}

fn clean_name(text: &str) -> String {
    let trimmed = text
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(|c: char| !c.is_alphanumeric());
    if !trimmed.chars().any(char::is_alphabetic) {
        return String::new();
    }
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `( ... )` asides, including nested and unbalanced ones
fn strip_parentheticals(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(' ');
            }
            ')' if depth > 0 => depth -= 1,
            ')' => out.push(' '),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Whether a token is a recognized cooking unit
pub(crate) fn is_unit(token: &str) -> bool {
    UNITS.contains(&token.trim_end_matches('.'))
}

fn is_food_word_unit(token: &str) -> bool {
    FOOD_WORD_UNITS.contains(&token.trim_end_matches('.'))
}

/// Digits, decimals, fractions and ranges: `2`, `1.5`, `1/2`, `1-2`, `1½`
pub(crate) fn is_number(token: &str) -> bool {
    let has_digit = token
        .chars()
        .any(|c| c.is_ascii_digit() || UNICODE_FRACTIONS.contains(&c));
    has_digit && token.chars().all(is_number_char)
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | '–') || UNICODE_FRACTIONS.contains(&c)
}

/// A number with its unit attached, like `200g` or `2cups`
pub(crate) fn is_glued_amount(token: &str) -> bool {
    match token.char_indices().find(|(_, c)| !is_number_char(*c)) {
        Some((split, _)) if split > 0 => is_number(&token[..split]) && is_unit(&token[split..]),
        _ => false,
    }
}
