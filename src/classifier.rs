use crate::model::Category;

/// Ordered keyword rules; the first rule with a matching keyword wins.
///
/// Specific groups come before broad ones so that "soy sauce" lands in
/// Condiments, "chicken stock" in Pantry Staples and "ice cream" in Frozen.
const RULES: &[(&[&str], Category)] = &[
    (
        &[
            "frozen", "ice cream", "sorbet", "frozen vegetables", "frozen fruit", "frozen pizza",
            "frozen peas",
        ],
        Category::Frozen,
    ),
    (
        &[
            "ketchup", "mustard", "mayo", "mayonnaise", "hot sauce", "soy sauce", "worcestershire",
            "sriracha", "relish", "salsa", "bbq sauce", "barbecue sauce", "fish sauce",
            "oyster sauce", "hoisin", "dressing", "pesto",
        ],
        Category::Condiments,
    ),
    (
        &[
            "salt", "black pepper", "peppercorn", "stock", "broth", "bouillon", "powder",
            "baking soda", "baking powder", "yeast", "extract", "spice", "seasoning",
            "peanut butter", "coconut milk", "cornstarch", "paprika", "cumin", "oregano",
            "cinnamon", "nutmeg",
        ],
        Category::Pantry,
    ),
    (
        &[
            "bread", "roll", "bagel", "croissant", "tortilla", "bun", "baguette", "pita", "naan",
            "breadcrumbs", "croutons",
        ],
        Category::Bakery,
    ),
    (
        &[
            "chicken", "beef", "pork", "fish", "salmon", "shrimp", "prawn", "turkey", "bacon",
            "ground beef", "sausage", "lamb", "ham", "pancetta", "guanciale", "prosciutto", "tuna",
            "cod", "steak", "mince", "anchovy", "anchovies", "crab", "duck",
        ],
        Category::MeatSeafood,
    ),
    (
        &[
            "milk", "cheese", "butter", "yogurt", "yoghurt", "cream", "sour cream", "egg",
            "mozzarella", "parmesan", "cheddar", "ricotta", "feta", "buttermilk", "half and half",
            "pecorino", "mascarpone",
        ],
        Category::DairyEggs,
    ),
    (
        &[
            "onion", "garlic", "tomato", "carrot", "celery", "pepper", "lettuce", "spinach",
            "broccoli", "mushroom", "lemon", "lime", "apple", "banana", "potato", "herb", "kale",
            "cucumber", "zucchini", "avocado", "cilantro", "parsley", "basil", "ginger",
            "scallion", "shallot", "cabbage", "berry", "berries", "strawberry", "strawberries",
            "blueberry", "blueberries", "romaine", "corn", "peas", "eggplant", "jalapeno",
            "jalapeño", "chili", "chile", "orange", "mint", "thyme", "rosemary", "leek",
        ],
        Category::Produce,
    ),
    (
        &[
            "flour", "sugar", "oil", "olive oil", "vinegar", "pasta", "spaghetti", "noodle",
            "rice", "bean", "lentil", "chickpea", "sauce", "honey", "syrup", "maple syrup", "oat",
            "oats", "cocoa", "chocolate", "chocolate chips", "nut", "almond", "walnut", "pecan",
            "cereal", "quinoa", "couscous",
        ],
        Category::Pantry,
    ),
];

/// Map a normalized ingredient name to its grocery category.
///
/// Falls back to [`Category::Other`] when no keyword matches.
pub fn classify(normalized_name: &str) -> Category {
    let words: Vec<&str> = normalized_name
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return Category::Other;
    }

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| contains_phrase(&words, k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

/// True when the keyword's words occur consecutively in `words`
fn contains_phrase(words: &[&str], keyword: &str) -> bool {
    let phrase: Vec<&str> = keyword.split_whitespace().collect();
    if phrase.is_empty() || phrase.len() > words.len() {
        return false;
    }
    words
        .windows(phrase.len())
        .any(|window| window.iter().zip(&phrase).all(|(w, k)| word_matches(w, k)))
}

fn word_matches(word: &str, keyword: &str) -> bool {
    if word == keyword {
        return true;
    }
    match word.strip_prefix(keyword) {
        Some("s") | Some("es") => true,
        _ => false,
    }
}
