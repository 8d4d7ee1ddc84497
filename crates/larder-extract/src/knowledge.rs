//! Static knowledge tables.
//!
//! Three tables drive extraction:
//! - [`INGREDIENTS`]: known ingredient name → storage category → implied allergens
//! - [`ALLERGENS`]: allergen → keywords found in free text, plus severity/category
//! - [`FALSE_POSITIVES`]: keyword → phrases that suppress it (`milk` in `coconut milk`)
//!
//! Plus [`STOP_WORDS`], the cooking methods and filler words dropped from
//! labeled ingredient lists.

use larder_core::enums::{IngredientCategory, Severity};

#[derive(Debug, Clone, Copy)]
pub struct IngredientEntry {
    pub name: &'static str,
    pub category: IngredientCategory,
    pub allergens: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct AllergenEntry {
    pub name: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub keywords: &'static [&'static str],
}

const fn ing(
    name: &'static str,
    category: IngredientCategory,
    allergens: &'static [&'static str],
) -> IngredientEntry {
    IngredientEntry {
        name,
        category,
        allergens,
    }
}

use IngredientCategory::{Dairy, DryGoods, Meat, Other, Produce, Seafood};

pub const MILK: &str = "milk";
pub const EGGS: &str = "eggs";
pub const FISH: &str = "fish";
pub const SHELLFISH: &str = "shellfish";
pub const PEANUTS: &str = "peanuts";
pub const TREE_NUTS: &str = "tree nuts";
pub const WHEAT: &str = "wheat";
pub const GLUTEN: &str = "gluten";
pub const SOY: &str = "soy";
pub const SESAME: &str = "sesame";
pub const MUSTARD: &str = "mustard";
pub const CELERY: &str = "celery";

pub static ALLERGENS: &[AllergenEntry] = &[
    AllergenEntry {
        name: MILK,
        category: "dairy",
        severity: Severity::Medium,
        keywords: &[
            "milk", "cheese", "butter", "cream", "yogurt", "yoghurt", "dairy", "whey", "casein",
            "ghee", "parmesan", "mozzarella", "cheddar", "ricotta", "feta", "buttermilk",
        ],
    },
    AllergenEntry {
        name: EGGS,
        category: "egg",
        severity: Severity::Medium,
        keywords: &["egg", "eggs", "mayonnaise", "mayo", "aioli", "meringue"],
    },
    AllergenEntry {
        name: FISH,
        category: "seafood",
        severity: Severity::High,
        keywords: &[
            "fish", "salmon", "tuna", "cod", "halibut", "trout", "tilapia", "anchovy", "anchovies",
            "sardine", "sardines", "mackerel", "haddock", "snapper", "bass",
        ],
    },
    AllergenEntry {
        name: SHELLFISH,
        category: "seafood",
        severity: Severity::High,
        keywords: &[
            "shellfish", "shrimp", "prawn", "prawns", "crab", "lobster", "scallop", "scallops",
            "clam", "clams", "mussel", "mussels", "oyster", "oysters", "crawfish",
        ],
    },
    AllergenEntry {
        name: PEANUTS,
        category: "legume",
        severity: Severity::High,
        keywords: &["peanut", "peanuts", "groundnut"],
    },
    AllergenEntry {
        name: TREE_NUTS,
        category: "nut",
        severity: Severity::High,
        keywords: &[
            "almond", "almonds", "walnut", "walnuts", "cashew", "cashews", "pecan", "pecans",
            "pistachio", "pistachios", "hazelnut", "hazelnuts", "macadamia", "tree nut",
            "tree nuts", "praline",
        ],
    },
    AllergenEntry {
        name: WHEAT,
        category: "grain",
        severity: Severity::Medium,
        keywords: &[
            "wheat", "flour", "bread", "breadcrumbs", "pasta", "noodles", "couscous", "semolina",
            "tortilla", "bun", "croutons",
        ],
    },
    AllergenEntry {
        name: GLUTEN,
        category: "grain",
        severity: Severity::Medium,
        keywords: &["gluten", "barley", "rye", "malt", "spelt", "seitan"],
    },
    AllergenEntry {
        name: SOY,
        category: "legume",
        severity: Severity::Medium,
        keywords: &["soy", "soya", "tofu", "edamame", "miso", "tempeh", "soy sauce"],
    },
    AllergenEntry {
        name: SESAME,
        category: "seed",
        severity: Severity::High,
        keywords: &["sesame", "tahini", "hummus"],
    },
    AllergenEntry {
        name: MUSTARD,
        category: "seed",
        severity: Severity::Medium,
        keywords: &["mustard", "dijon"],
    },
    AllergenEntry {
        name: CELERY,
        category: "vegetable",
        severity: Severity::Low,
        keywords: &["celery", "celeriac"],
    },
];

/// Keyword → phrases whose presence anywhere in the text suppresses that keyword.
pub static FALSE_POSITIVES: &[(&str, &[&str])] = &[
    (
        "milk",
        &[
            "coconut milk",
            "almond milk",
            "soy milk",
            "oat milk",
            "rice milk",
            "cashew milk",
        ],
    ),
    (
        "butter",
        &[
            "peanut butter",
            "almond butter",
            "cocoa butter",
            "apple butter",
            "shea butter",
            "nut butter",
        ],
    ),
    ("cream", &["cream of tartar", "coconut cream", "cream soda"]),
    ("cheese", &["vegan cheese", "cashew cheese"]),
    ("flour", &["rice flour", "almond flour", "coconut flour", "corn flour", "chickpea flour"]),
    ("noodles", &["rice noodles", "glass noodles"]),
    ("pasta", &["rice pasta", "chickpea pasta"]),
    ("gluten", &["gluten-free", "gluten free"]),
    ("wheat", &["buckwheat", "wheat-free", "wheat free"]),
    ("egg", &["eggplant", "egg-free", "egg free"]),
    ("fish", &["fish-free"]),
    ("oyster", &["oyster mushroom", "oyster mushrooms"]),
    ("oysters", &["oyster mushrooms"]),
    ("crab", &["crab apple", "crab apples"]),
    ("mayo", &["vegan mayo"]),
];

pub static INGREDIENTS: &[IngredientEntry] = &[
    // Produce
    ing("tomato", Produce, &[]),
    ing("onion", Produce, &[]),
    ing("red onion", Produce, &[]),
    ing("garlic", Produce, &[]),
    ing("lettuce", Produce, &[]),
    ing("romaine", Produce, &[]),
    ing("spinach", Produce, &[]),
    ing("kale", Produce, &[]),
    ing("arugula", Produce, &[]),
    ing("cucumber", Produce, &[]),
    ing("carrot", Produce, &[]),
    ing("potato", Produce, &[]),
    ing("sweet potato", Produce, &[]),
    ing("bell pepper", Produce, &[]),
    ing("pepper", Produce, &[]),
    ing("jalapeno", Produce, &[]),
    ing("mushroom", Produce, &[]),
    ing("oyster mushroom", Produce, &[]),
    ing("avocado", Produce, &[]),
    ing("lemon", Produce, &[]),
    ing("lime", Produce, &[]),
    ing("basil", Produce, &[]),
    ing("cilantro", Produce, &[]),
    ing("parsley", Produce, &[]),
    ing("mint", Produce, &[]),
    ing("herbs", Produce, &[]),
    ing("ginger", Produce, &[]),
    ing("scallion", Produce, &[]),
    ing("cabbage", Produce, &[]),
    ing("broccoli", Produce, &[]),
    ing("zucchini", Produce, &[]),
    ing("eggplant", Produce, &[]),
    ing("corn", Produce, &[]),
    ing("vegetables", Produce, &[]),
    ing("apple", Produce, &[]),
    ing("mango", Produce, &[]),
    ing("pineapple", Produce, &[]),
    ing("berries", Produce, &[]),
    ing("celery", Produce, &[CELERY]),
    // Dairy and eggs
    ing("milk", Dairy, &[MILK]),
    ing("butter", Dairy, &[MILK]),
    ing("cream", Dairy, &[MILK]),
    ing("sour cream", Dairy, &[MILK]),
    ing("cheese", Dairy, &[MILK]),
    ing("cheddar", Dairy, &[MILK]),
    ing("mozzarella", Dairy, &[MILK]),
    ing("parmesan", Dairy, &[MILK]),
    ing("feta", Dairy, &[MILK]),
    ing("ricotta", Dairy, &[MILK]),
    ing("yogurt", Dairy, &[MILK]),
    ing("egg", Dairy, &[EGGS]),
    ing("mayonnaise", Dairy, &[EGGS]),
    ing("aioli", Dairy, &[EGGS]),
    // Meat
    ing("chicken", Meat, &[]),
    ing("beef", Meat, &[]),
    ing("pork", Meat, &[]),
    ing("lamb", Meat, &[]),
    ing("bacon", Meat, &[]),
    ing("ham", Meat, &[]),
    ing("turkey", Meat, &[]),
    ing("sausage", Meat, &[]),
    ing("duck", Meat, &[]),
    // Seafood
    ing("salmon", Seafood, &[FISH]),
    ing("tuna", Seafood, &[FISH]),
    ing("cod", Seafood, &[FISH]),
    ing("halibut", Seafood, &[FISH]),
    ing("anchovy", Seafood, &[FISH]),
    ing("fish sauce", Seafood, &[FISH]),
    ing("shrimp", Seafood, &[SHELLFISH]),
    ing("prawn", Seafood, &[SHELLFISH]),
    ing("crab", Seafood, &[SHELLFISH]),
    ing("lobster", Seafood, &[SHELLFISH]),
    ing("scallop", Seafood, &[SHELLFISH]),
    ing("oyster sauce", Seafood, &[SHELLFISH]),
    // Dry goods
    ing("flour", DryGoods, &[WHEAT, GLUTEN]),
    ing("bread", DryGoods, &[WHEAT, GLUTEN]),
    ing("breadcrumbs", DryGoods, &[WHEAT, GLUTEN]),
    ing("pasta", DryGoods, &[WHEAT, GLUTEN]),
    ing("noodles", DryGoods, &[WHEAT, GLUTEN]),
    ing("rice noodles", DryGoods, &[]),
    ing("couscous", DryGoods, &[WHEAT, GLUTEN]),
    ing("tortilla", DryGoods, &[WHEAT]),
    ing("rice", DryGoods, &[]),
    ing("quinoa", DryGoods, &[]),
    ing("oats", DryGoods, &[]),
    ing("beans", DryGoods, &[]),
    ing("lentils", DryGoods, &[]),
    ing("chickpeas", DryGoods, &[]),
    ing("sugar", DryGoods, &[]),
    ing("salt", DryGoods, &[]),
    ing("black pepper", DryGoods, &[]),
    ing("curry powder", DryGoods, &[]),
    ing("cumin", DryGoods, &[]),
    ing("paprika", DryGoods, &[]),
    ing("cinnamon", DryGoods, &[]),
    ing("peanut", DryGoods, &[PEANUTS]),
    ing("peanut butter", DryGoods, &[PEANUTS]),
    ing("almond", DryGoods, &[TREE_NUTS]),
    ing("walnut", DryGoods, &[TREE_NUTS]),
    ing("cashew", DryGoods, &[TREE_NUTS]),
    ing("pecan", DryGoods, &[TREE_NUTS]),
    ing("pistachio", DryGoods, &[TREE_NUTS]),
    ing("sesame seeds", DryGoods, &[SESAME]),
    ing("tahini", DryGoods, &[SESAME]),
    ing("soy sauce", DryGoods, &[SOY, WHEAT]),
    ing("miso", DryGoods, &[SOY]),
    ing("mustard", DryGoods, &[MUSTARD]),
    ing("olive oil", DryGoods, &[]),
    ing("sesame oil", DryGoods, &[SESAME]),
    ing("vinegar", DryGoods, &[]),
    ing("honey", DryGoods, &[]),
    // Other
    ing("coconut milk", Other, &[]),
    ing("coconut cream", Other, &[]),
    ing("almond milk", Other, &[TREE_NUTS]),
    ing("oat milk", Other, &[]),
    ing("rice milk", Other, &[]),
    ing("soy milk", Other, &[SOY]),
    ing("tofu", Other, &[SOY]),
    ing("tempeh", Other, &[SOY]),
    ing("hummus", Other, &[SESAME]),
];

/// Words dropped from labeled ingredient lists: cooking methods and filler.
pub static STOP_WORDS: &[&str] = &[
    // Cooking methods
    "boiled", "fried", "grilled", "baked", "roasted", "steamed", "sauteed", "sautéed", "braised",
    "poached", "smoked", "seared", "toasted", "charred", "deep-fried", "pan-fried", "stir-fried",
    "chopped", "sliced", "diced", "minced", "shredded", "mashed", "whipped", "marinated",
    "pickled", "blended", "cooked", "raw", "crispy", "caramelized",
    // Filler
    "fresh", "freshly", "organic", "local", "locally", "sourced", "natural", "premium",
    "homemade", "house", "made", "with", "and", "the", "our", "your", "served", "topped",
    "tossed", "drizzled", "garnished", "finished", "side", "choice", "extra", "light",
    "lightly", "seasonal", "finely", "hand", "crafted", "style", "optional", "some", "plus",
    "ingredients", "ingredient", "contains", "includes", "prepared",
];

#[must_use]
pub fn allergen_entry(name: &str) -> Option<&'static AllergenEntry> {
    ALLERGENS.iter().find(|a| a.name == name)
}

#[must_use]
pub fn ingredient_entry(name: &str) -> Option<&'static IngredientEntry> {
    INGREDIENTS.iter().find(|i| i.name == name)
}

#[must_use]
pub fn false_positive_phrases(keyword: &str) -> &'static [&'static str] {
    FALSE_POSITIVES
        .iter()
        .find(|(k, _)| *k == keyword)
        .map_or(&[], |(_, phrases)| phrases)
}

#[must_use]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
