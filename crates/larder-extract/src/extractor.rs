//! Table-driven [`SignalExtractor`] implementation.

use std::sync::LazyLock;

use larder_core::results::ExtractionResult;
use regex::Regex;

use crate::knowledge::{
    self, ALLERGENS, AllergenEntry, IngredientEntry, false_positive_phrases, is_stop_word,
};
use crate::{AllergenFacts, IngredientFacts, SignalExtractor};

const BASE_CONFIDENCE: f64 = 0.5;
const PATTERN_BONUS: f64 = 0.3;
const INGREDIENT_BONUS: f64 = 0.2;
const ALLERGEN_BONUS: f64 = 0.1;

/// Minimum length of a kept token inside a labeled list.
const MIN_TOKEN_LEN: usize = 3;

/// Label patterns, tried in order. The capture runs to the end of the sentence.
static LABEL_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("ingredients:", r"(?i)\bingredients?\s*:\s*([^.\n]+)"),
        ("contains:", r"(?i)\bcontains\s*:\s*([^.\n]+)"),
        ("made with:", r"(?i)\bmade\s+with\s*:\s*([^.\n]+)"),
        ("includes:", r"(?i)\bincludes\s*:\s*([^.\n]+)"),
        ("with ", r"(?i)\bwith\s+([^.\n]+)"),
        ("prepared with:", r"(?i)\bprepared\s+with\s*:\s*([^.\n]+)"),
    ]
    .into_iter()
    .map(|(label, pattern)| (label, Regex::new(pattern).expect("label pattern is valid")))
    .collect()
});

static LIST_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[,;&/]|\band\b|\bor\b").expect("separator pattern is valid")
});

/// Extracts ingredient and allergen signals using the built-in knowledge tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSignalExtractor;

impl TextSignalExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Allergens whose keywords appear in `text` on word boundaries and are
    /// not suppressed by one of their false-positive phrases.
    #[must_use]
    pub fn detect_allergens(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        ALLERGENS
            .iter()
            .filter(|entry| allergen_mentioned(entry, &lower))
            .map(|entry| entry.name.to_string())
            .collect()
    }

    /// Known ingredients found by scanning every bigram, then every unigram.
    #[must_use]
    pub fn scan_known_ingredients(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut found = Vec::new();
        let mut i = 0;
        while i < words.len() {
            if let Some(next) = words.get(i + 1)
                && let Some(entry) = lookup_known(&format!("{} {next}", words[i]))
            {
                push_unique(&mut found, entry.name);
                i += 2;
                continue;
            }
            if let Some(entry) = lookup_known(words[i])
                && !suppressed_in(entry.name, &lower)
            {
                push_unique(&mut found, entry.name);
            }
            i += 1;
        }
        found
    }
}

impl SignalExtractor for TextSignalExtractor {
    fn extract(&self, text: &str) -> ExtractionResult {
        let labeled = LABEL_PATTERNS.iter().find_map(|(label, regex)| {
            regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|span| (*label, span.as_str()))
        });

        let (matched_pattern, ingredient_names) = match labeled {
            Some((label, span)) => (Some(label.to_string()), split_labeled_list(span)),
            None => (None, self.scan_known_ingredients(text)),
        };

        let mut allergen_names = self.detect_allergens(text);
        for ingredient in &ingredient_names {
            if let Some(facts) = self.ingredient_facts(ingredient) {
                for allergen in facts.allergens {
                    if !allergen_names.contains(&allergen) {
                        allergen_names.push(allergen);
                    }
                }
            }
        }

        let mut confidence = BASE_CONFIDENCE;
        if matched_pattern.is_some() {
            confidence += PATTERN_BONUS;
        }
        if !ingredient_names.is_empty() {
            confidence += INGREDIENT_BONUS;
        }
        if !allergen_names.is_empty() {
            confidence += ALLERGEN_BONUS;
        }

        tracing::trace!(
            pattern = ?matched_pattern,
            ingredients = ingredient_names.len(),
            allergens = allergen_names.len(),
            "extracted signals"
        );

        ExtractionResult {
            ingredient_names,
            allergen_names,
            confidence: confidence.min(1.0),
            matched_pattern,
        }
    }

    fn ingredient_facts(&self, name: &str) -> Option<IngredientFacts> {
        let lower = name.trim().to_lowercase();
        let entry = lookup_known(&lower).or_else(|| {
            let words: Vec<&str> = lower.split_whitespace().collect();
            words
                .windows(2)
                .find_map(|pair| lookup_known(&pair.join(" ")))
                .or_else(|| {
                    words
                        .iter()
                        .filter_map(|w| lookup_known(w))
                        .find(|entry| !suppressed_in(entry.name, &lower))
                })
        })?;

        Some(IngredientFacts {
            category: entry.category,
            allergens: entry.allergens.iter().map(ToString::to_string).collect(),
        })
    }

    fn allergen_facts(&self, name: &str) -> Option<AllergenFacts> {
        let lower = name.trim().to_lowercase();
        ALLERGENS
            .iter()
            .find(|a| a.name == lower)
            .or_else(|| ALLERGENS.iter().find(|a| a.keywords.contains(&lower.as_str())))
            .map(|entry| AllergenFacts {
                canonical_name: entry.name.to_string(),
                category: entry.category.to_string(),
                severity: entry.severity,
            })
    }
}

/// Split a labeled span into ingredient names.
///
/// Commas, semicolons, `and`, `or`, `&`, and `/` separate entries. Inside an
/// entry, stop words and short tokens are dropped and the rest is rejoined,
/// so `fresh coconut milk` stays a single name.
fn split_labeled_list(span: &str) -> Vec<String> {
    let mut names = Vec::new();
    for piece in LIST_SEPARATORS.split(span) {
        let kept: Vec<String> = piece
            .split_whitespace()
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
                    .to_lowercase()
            })
            .filter(|word| word.chars().count() >= MIN_TOKEN_LEN && !is_stop_word(word))
            .collect();
        if kept.is_empty() {
            continue;
        }
        let name = kept.join(" ");
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn allergen_mentioned(entry: &AllergenEntry, lower: &str) -> bool {
    entry.keywords.iter().any(|keyword| {
        contains_word(lower, keyword) && !suppressed_in(keyword, lower)
    })
}

/// `crab` inside `crab apple` is not crab.
fn suppressed_in(word: &str, lower: &str) -> bool {
    false_positive_phrases(word)
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// Exact lookup, then simple singular forms (`tomatoes` → `tomato`).
fn lookup_known(name: &str) -> Option<&'static IngredientEntry> {
    if let Some(entry) = knowledge::ingredient_entry(name) {
        return Some(entry);
    }
    singular_candidates(name)
        .into_iter()
        .find_map(|candidate| knowledge::ingredient_entry(&candidate))
}

fn singular_candidates(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(stem) = name.strip_suffix("ies") {
        out.push(format!("{stem}y"));
    }
    if let Some(stem) = name.strip_suffix("es") {
        out.push(stem.to_string());
    }
    if let Some(stem) = name.strip_suffix('s') {
        out.push(stem.to_string());
    }
    out
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}
